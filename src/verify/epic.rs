//! Epic Games account service: authorization-code exchange and consent links.

use crate::verify::{
    VerifyError,
    pipeline::TokenExchange,
    upstream::{Upstream, UpstreamOptions},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

pub const DEFAULT_TOKEN_URL: &str =
    "https://account-public-service-prod.ol.epicgames.com/account/api/oauth/token";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://www.epicgames.com/id/authorize";

const GRANT_TYPE: &str = "authorization_code";
const CONSENT_SCOPE: &str = "basic_profile";
const PROVIDER_ERROR_MAX_CHARS: usize = 120;

/// Client credentials of this application at Epic.
#[derive(Debug, Clone)]
pub struct EpicCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
}

/// Bearer token plus the account it belongs to.
#[derive(Debug, Clone)]
pub struct AccessCredential {
    pub access_token: SecretString,
    pub account_id: String,
    pub display_name: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    account_id: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Debug)]
pub struct EpicClient {
    upstream: Upstream,
    token_url: String,
    credentials: EpicCredentials,
}

impl EpicClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        token_url: impl Into<String>,
        credentials: EpicCredentials,
        options: &UpstreamOptions,
    ) -> Result<Self> {
        Ok(Self {
            upstream: Upstream::new(options)?,
            token_url: token_url.into(),
            credentials,
        })
    }
}

impl TokenExchange for EpicClient {
    // Authorization codes are single-use: exactly one POST, whatever happens.
    #[instrument(skip(self, code), fields(token_url = %self.token_url))]
    async fn exchange(&self, code: &str) -> Result<AccessCredential, VerifyError> {
        let _permit = self
            .upstream
            .acquire()
            .await
            .ok_or(VerifyError::TokenExchangeUnavailable)?;

        let form = [
            ("grant_type", GRANT_TYPE),
            ("code", code),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let response = self
            .upstream
            .client()
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(self.credentials.client_secret.expose_secret()),
            )
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!("Token exchange request failed: {e}");
                VerifyError::TokenExchangeUnavailable
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Token exchange response could not be read: {e}");
            VerifyError::TokenExchangeUnavailable
        })?;

        if !status.is_success() {
            return Err(VerifyError::TokenExchangeFailed {
                status: status.as_u16(),
                provider_error: provider_error(&body),
            });
        }

        let credential = parse_credential(status.as_u16(), &body)?;
        debug!(account_id = %credential.account_id, "Token exchange succeeded");

        Ok(credential)
    }
}

/// Parse a 2xx token response.
///
/// # Errors
/// Returns `TokenExchangeFailed` when the body is not JSON or lacks `access_token`
/// or `account_id`.
pub fn parse_credential(status: u16, body: &str) -> Result<AccessCredential, VerifyError> {
    let malformed = |what: &str| VerifyError::TokenExchangeFailed {
        status,
        provider_error: Some(what.to_string()),
    };

    let response: TokenResponse =
        serde_json::from_str(body).map_err(|_| malformed("invalid token response"))?;

    let access_token =
        non_blank(response.access_token).ok_or_else(|| malformed("missing access_token"))?;
    let account_id =
        non_blank(response.account_id).ok_or_else(|| malformed("missing account_id"))?;
    let display_name = non_blank(response.display_name).unwrap_or_else(|| account_id.clone());

    Ok(AccessCredential {
        access_token: SecretString::from(access_token),
        account_id,
        display_name,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Only the provider's error code is kept; messages may echo request data.
fn provider_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["errorCode", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| code.chars().take(PROVIDER_ERROR_MAX_CHARS).collect())
}

/// Builds the link that sends a browser to Epic's consent screen.
#[derive(Debug, Clone)]
pub struct ConsentLink {
    authorize_url: String,
    client_id: String,
    redirect_uri: String,
}

impl ConsentLink {
    #[must_use]
    pub fn new(
        authorize_url: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            authorize_url: authorize_url.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// # Errors
    /// Returns an error if the configured authorize URL is not a valid URL.
    pub fn url(&self, state: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.authorize_url,
            [
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("scope", CONSENT_SCOPE),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ],
        )
    }
}
