//! The callback pipeline: validate, exchange, look up, dispatch.

use crate::verify::{
    AccessCredential, InventorySnapshot, VerificationNotice, VerifyError,
    state::{self, RequesterId},
};
use serde::Deserialize;
use std::future::Future;
use tracing::{Instrument, debug, error, info, info_span, warn};
use utoipa::IntoParams;

/// Trades a single-use authorization code for an access credential.
pub trait TokenExchange {
    fn exchange(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<AccessCredential, VerifyError>> + Send;
}

/// Fetches the cosmetics owned by an account.
pub trait InventoryLookup {
    fn lookup(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<InventorySnapshot, VerifyError>> + Send;
}

/// Delivers a verification notice to the destination channel.
pub trait NotificationDispatch {
    fn dispatch(
        &self,
        notice: &VerificationNotice,
    ) -> impl Future<Output = Result<(), VerifyError>> + Send;
}

/// Query parameters of the OAuth redirect.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackRequest {
    /// Single-use authorization code issued by Epic
    pub code: Option<String>,
    /// Correlation state minted by the landing page
    pub state: Option<String>,
}

impl CallbackRequest {
    #[must_use]
    pub fn new(code: Option<&str>, state: Option<&str>) -> Self {
        Self {
            code: code.map(str::to_string),
            state: state.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validating,
    Exchanging,
    LookingUp,
    Dispatching,
    Succeeded,
    Failed,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validating => "validating",
            Self::Exchanging => "exchanging",
            Self::LookingUp => "looking_up",
            Self::Dispatching => "dispatching",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Outcome of a pipeline that reached [`Stage::Succeeded`].
#[derive(Debug, Clone)]
pub struct Verified {
    pub account_id: String,
    pub notice: VerificationNotice,
}

/// Sequences the three upstream capabilities for one callback at a time.
///
/// The pipeline holds no per-request state, so one instance serves every
/// concurrent callback.
#[derive(Debug)]
pub struct Pipeline<X, L, D> {
    exchange: X,
    lookup: L,
    dispatch: D,
}

impl<X, L, D> Pipeline<X, L, D>
where
    X: TokenExchange + Sync,
    L: InventoryLookup + Sync,
    D: NotificationDispatch + Sync,
{
    pub const fn new(exchange: X, lookup: L, dispatch: D) -> Self {
        Self {
            exchange,
            lookup,
            dispatch,
        }
    }

    /// Run one callback to completion. Every error is terminal.
    ///
    /// # Errors
    /// Returns the [`VerifyError`] of the first stage that failed.
    pub async fn run(&self, request: CallbackRequest) -> Result<Verified, VerifyError> {
        let mut run = Run::default();
        let result = self.drive(&request, &mut run).instrument(info_span!("verify")).await;

        match &result {
            Ok(verified) => {
                run.advance(Stage::Succeeded);
                info!(
                    account_id = %verified.account_id,
                    requester = %verified.notice.requester,
                    "Verification succeeded"
                );
            }
            Err(err) => run.fail(err),
        }

        result
    }

    async fn drive(
        &self,
        request: &CallbackRequest,
        run: &mut Run,
    ) -> Result<Verified, VerifyError> {
        run.advance(Stage::Validating);
        let (code, requester) = validate(request)?;

        run.advance(Stage::Exchanging);
        let credential = self.exchange.exchange(code).await?;

        run.advance(Stage::LookingUp);
        let snapshot = self.lookup.lookup(&credential.account_id).await?;

        run.advance(Stage::Dispatching);
        let notice = VerificationNotice::new(requester, &credential.display_name, &snapshot);
        self.dispatch.dispatch(&notice).await?;

        Ok(Verified {
            account_id: credential.account_id,
            notice,
        })
    }
}

/// Check the callback inputs. Runs before any outbound call.
///
/// # Errors
/// `MissingCode` when the code is absent or blank, `MalformedState` when the state
/// is absent or does not decode.
pub fn validate(request: &CallbackRequest) -> Result<(&str, RequesterId), VerifyError> {
    let code = request
        .code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or(VerifyError::MissingCode)?;

    let requester = request
        .state
        .as_deref()
        .ok_or(VerifyError::MalformedState)
        .and_then(|raw| state::decode(raw).map_err(|_| VerifyError::MalformedState))?;

    Ok((code, requester))
}

// Stage bookkeeping for logs.
#[derive(Debug)]
struct Run {
    stage: Stage,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            stage: Stage::Received,
        }
    }
}

impl Run {
    fn advance(&mut self, next: Stage) {
        debug!(from = self.stage.as_str(), to = next.as_str(), "Pipeline stage");
        self.stage = next;
    }

    fn fail(&mut self, err: &VerifyError) {
        let stage = self.stage.as_str();
        if err.is_input_error() {
            warn!(stage, reason = err.reason(), "Callback rejected: {err}");
        } else {
            error!(stage, reason = err.reason(), "Verification failed: {err}");
        }
        self.stage = Stage::Failed;
    }
}
