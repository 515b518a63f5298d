//! # Skincheck (Locker Verification Relay)
//!
//! `skincheck` proves that a player owns specific Fortnite cosmetics and
//! announces the result in a Discord channel.
//!
//! A chat user opens the landing page with their Discord id, consents on the
//! Epic Games login screen, and Epic redirects the browser to `/callback` with
//! a single-use authorization `code` and the `state` minted by the landing page.
//!
//! ## Callback Pipeline
//!
//! Every callback runs one independent, strictly ordered pipeline:
//!
//! 1. **Validate:** the code must be present and the `state` must decode to a
//!    requester id. Nothing leaves the process until both hold.
//! 2. **Exchange:** the code is traded for an access credential. Codes are
//!    single-use, so this call is never retried.
//! 3. **Lookup:** the account's locker is fetched. Missing categories are
//!    treated as empty, not as errors.
//! 4. **Dispatch:** a summary embed is posted to the configured channel.
//!
//! Any failure is terminal. Input errors surface as `400`, every upstream
//! failure as the same generic `500`; the precise reason is only logged.
//!
//! ## Correlation State
//!
//! `state` is `"<requester>_<nonce>"`. It only selects who gets mentioned in
//! the channel message and is not integrity protected.

pub mod api;
pub mod cli;
pub mod verify;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
