use axum::http::StatusCode;
use thiserror::Error;

pub const MISSING_CODE_MESSAGE: &str = "No code.";
pub const MALFORMED_STATE_MESSAGE: &str = "Invalid state.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Verification failed. Try again.";

/// Why a callback pipeline stopped.
///
/// Input errors are detected before any outbound call. Every other variant names
/// the upstream that failed and keeps the HTTP status it answered with, so logs stay
/// precise even though the browser only ever sees [`GENERIC_FAILURE_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("authorization code is missing")]
    MissingCode,
    #[error("state is missing or malformed")]
    MalformedState,
    #[error(
        "token exchange failed: status={status} provider_error={}",
        .provider_error.as_deref().unwrap_or("none")
    )]
    TokenExchangeFailed {
        status: u16,
        provider_error: Option<String>,
    },
    #[error("token exchange endpoint unreachable")]
    TokenExchangeUnavailable,
    #[error("locker lookup failed: status={status}")]
    LookupFailed { status: u16 },
    #[error("locker lookup endpoint unreachable")]
    LookupUnavailable,
    #[error("notification dispatch failed: status={status}")]
    DispatchFailed { status: u16 },
    #[error("notification endpoint unreachable")]
    DispatchUnavailable,
}

impl VerifyError {
    /// `true` for problems with the callback request itself.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::MissingCode | Self::MalformedState)
    }

    /// `true` for network-level failures (timeouts, DNS, resets).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::TokenExchangeUnavailable | Self::LookupUnavailable | Self::DispatchUnavailable
        )
    }

    /// Stable tag used as a structured log field.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingCode => "missing_code",
            Self::MalformedState => "malformed_state",
            Self::TokenExchangeFailed { .. } => "token_exchange_failed",
            Self::TokenExchangeUnavailable => "token_exchange_unavailable",
            Self::LookupFailed { .. } => "lookup_failed",
            Self::LookupUnavailable => "lookup_unavailable",
            Self::DispatchFailed { .. } => "dispatch_failed",
            Self::DispatchUnavailable => "dispatch_unavailable",
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        if self.is_input_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Text shown to the browser. Never includes upstream details.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MissingCode => MISSING_CODE_MESSAGE,
            Self::MalformedState => MALFORMED_STATE_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}
