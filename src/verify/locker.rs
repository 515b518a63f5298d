//! fortnite-api.com locker lookup.

use crate::verify::{
    VerifyError,
    pipeline::InventoryLookup,
    upstream::{Upstream, UpstreamOptions},
};
use anyhow::Result;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

pub const DEFAULT_LOCKER_URL: &str = "https://fortnite-api.com/v2/locker";

const RETRY_BASE_DELAY_MS: u64 = 250;

/// A single cosmetic. Only the display name is kept; a `null` name reads as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

impl Item {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Owned cosmetics grouped by category. Empty categories are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    pub outfits: Vec<Item>,
    pub back_blings: Vec<Item>,
    pub pickaxes: Vec<Item>,
}

impl InventorySnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty() && self.back_blings.is_empty() && self.pickaxes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outfits.len() + self.back_blings.len() + self.pickaxes.len()
    }
}

#[derive(Deserialize, Default)]
struct LockerData {
    #[serde(default)]
    outfits: Option<Vec<Item>>,
    #[serde(default)]
    backpacks: Option<Vec<Item>>,
    #[serde(default)]
    pickaxes: Option<Vec<Item>>,
}

impl From<LockerData> for InventorySnapshot {
    fn from(data: LockerData) -> Self {
        Self {
            outfits: data.outfits.unwrap_or_default(),
            back_blings: data.backpacks.unwrap_or_default(),
            pickaxes: data.pickaxes.unwrap_or_default(),
        }
    }
}

/// Parse a locker response body. Missing or `null` categories become empty.
///
/// # Errors
/// Returns an error if the body or its `data` member is not a JSON object, or if
/// a category is not a list of items.
pub fn parse_snapshot(body: &str) -> Result<InventorySnapshot, serde_json::Error> {
    // Derived struct visitors also accept sequences, so check the shape first.
    let Value::Object(mut envelope) = serde_json::from_str::<Value>(body)? else {
        return Err(serde_json::Error::custom("locker response is not a JSON object"));
    };

    match envelope.remove("data") {
        None | Some(Value::Null) => Ok(InventorySnapshot::default()),
        Some(data @ Value::Object(_)) => Ok(serde_json::from_value::<LockerData>(data)?.into()),
        Some(_) => Err(serde_json::Error::custom("locker data is not a JSON object")),
    }
}

#[derive(Debug)]
pub struct LockerClient {
    upstream: Upstream,
    url: String,
    api_key: SecretString,
    attempts: u32,
}

impl LockerClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        url: impl Into<String>,
        api_key: SecretString,
        options: &UpstreamOptions,
    ) -> Result<Self> {
        Ok(Self {
            upstream: Upstream::new(options)?,
            url: url.into(),
            api_key,
            attempts: 1,
        })
    }

    /// Allow up to `attempts` tries when the endpoint is unreachable.
    /// HTTP error statuses are never retried.
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    async fn lookup_once(&self, account_id: &str) -> Result<InventorySnapshot, VerifyError> {
        let _permit = self
            .upstream
            .acquire()
            .await
            .ok_or(VerifyError::LookupUnavailable)?;

        let response = self
            .upstream
            .client()
            .get(&self.url)
            .query(&[("accountId", account_id)])
            .header("Authorization", self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| {
                warn!("Locker request failed: {e}");
                VerifyError::LookupUnavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::LookupFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            warn!("Locker response could not be read: {e}");
            VerifyError::LookupUnavailable
        })?;

        parse_snapshot(&body).map_err(|e| {
            error!("Locker response has an unexpected shape: {e}");
            VerifyError::LookupFailed {
                status: status.as_u16(),
            }
        })
    }
}

impl InventoryLookup for LockerClient {
    #[instrument(skip(self))]
    async fn lookup(&self, account_id: &str) -> Result<InventorySnapshot, VerifyError> {
        let mut attempt = 1;
        loop {
            match self.lookup_once(account_id).await {
                Err(e) if e.is_transient() && attempt < self.attempts => {
                    let delay = backoff_delay(attempt);
                    warn!(attempt, ?delay, "Locker unreachable, backing off");
                    sleep(delay).await;
                    attempt += 1;
                }
                Ok(snapshot) => {
                    debug!(items = snapshot.len(), "Locker lookup succeeded");
                    return Ok(snapshot);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// Exponential backoff with 70-100% jitter.
fn backoff_delay(attempt: u32) -> Duration {
    let base = RETRY_BASE_DELAY_MS.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let factor = rand::thread_rng().gen_range(70..=100);
    Duration::from_millis(base.saturating_mul(factor) / 100)
}
