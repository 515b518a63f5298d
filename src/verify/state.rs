//! Correlation `state` codec.
//!
//! The landing page mints `"<requester>_<nonce>"` before redirecting to Epic and the
//! callback recovers the requester from it. The nonce is opaque and ignored on decode.
//! The value is a mention hint only; it carries no integrity protection.

use regex::Regex;
use std::fmt;
use thiserror::Error;
use ulid::Ulid;

pub const DELIMITER: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("malformed state")]
    Malformed,
}

/// Identity of the chat user that started the verification (a Discord user id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequesterId(String);

impl RequesterId {
    /// # Errors
    /// Returns [`StateError::Malformed`] if `raw` is not 1-64 of `[A-Za-z0-9.-]`.
    pub fn parse(raw: &str) -> Result<Self, StateError> {
        if valid_requester_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(StateError::Malformed)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn valid_requester_id(id: &str) -> bool {
    // no DELIMITER allowed, it separates the requester from the nonce
    Regex::new(r"^[A-Za-z0-9.\-]{1,64}$").map_or(false, |re| re.is_match(id))
}

/// Build the `state` value for `requester` with an explicit nonce.
#[must_use]
pub fn encode(requester: &RequesterId, nonce: &str) -> String {
    format!("{requester}{DELIMITER}{nonce}")
}

/// Build a fresh `state` value using a ULID nonce.
#[must_use]
pub fn mint(requester: &RequesterId) -> String {
    encode(requester, &Ulid::new().to_string())
}

/// Recover the requester from a `state` value.
///
/// # Errors
/// Returns [`StateError::Malformed`] when the delimiter is missing or the requester
/// segment is not a valid id.
pub fn decode(state: &str) -> Result<RequesterId, StateError> {
    let (requester, _nonce) = state.split_once(DELIMITER).ok_or(StateError::Malformed)?;
    RequesterId::parse(requester)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn round_trip_recovers_requester() {
        let ids = ["42", "123456789012345678", "a.b-c", &"9".repeat(64)];
        for id in ids {
            let requester = RequesterId::parse(id).unwrap();
            for nonce in ["", "x", "01HZX3ZQ7V8W9Y0ABCDEFGHJKM", "with_more_underscores"] {
                assert_eq!(decode(&encode(&requester, nonce)), Ok(requester.clone()));
            }
            assert_eq!(decode(&mint(&requester)), Ok(requester));
        }
    }

    #[test]
    fn encode_is_deterministic() {
        let requester = RequesterId::parse("42").unwrap();
        assert_eq!(encode(&requester, "n1"), "42_n1");
        assert_eq!(encode(&requester, "n1"), encode(&requester, "n1"));
    }

    #[test]
    fn mint_uses_fresh_nonces() {
        let requester = RequesterId::parse("42").unwrap();
        assert_ne!(mint(&requester), mint(&requester));
    }

    #[test]
    fn decode_rejects_malformed_values() {
        let long = format!("{}_nonce", "1".repeat(65));
        let cases = [
            "",
            "42",
            "_nonce",
            "4 2_nonce",
            "42\n_nonce",
            "<@42>_nonce",
            "Ünïcode_nonce",
            "😀_nonce",
            long.as_str(),
        ];
        for case in cases {
            assert_eq!(decode(case), Err(StateError::Malformed), "{case:?}");
        }
    }

    #[test]
    fn decode_is_total_over_arbitrary_strings() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let len = rng.gen_range(0..80);
            let input: String = (0..len)
                .map(|_| {
                    if rng.gen_bool(0.15) {
                        DELIMITER
                    } else {
                        char::from_u32(rng.gen_range(0..0x2_0000)).unwrap_or('?')
                    }
                })
                .collect();

            match decode(&input) {
                Ok(requester) => {
                    assert!(input.starts_with(&format!("{requester}{DELIMITER}")));
                    assert!(valid_requester_id(requester.as_str()));
                }
                Err(StateError::Malformed) => {}
            }
        }
    }
}
