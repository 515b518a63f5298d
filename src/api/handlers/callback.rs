use crate::{
    api::handlers::pages::SUCCESS_PAGE,
    verify::{CallbackRequest, Verifier, VerifyError},
};
use axum::{
    extract::{Extension, Query},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/callback",
    params(CallbackRequest),
    responses(
        (status = 200, description = "Locker verified and announced", body = String, content_type = "text/html"),
        (status = 400, description = "Missing code or malformed state", body = String, content_type = "text/plain"),
        (status = 500, description = "An upstream call failed", body = String, content_type = "text/plain"),
    ),
    tag = "verify",
)]
// OAuth redirect target
#[instrument(skip(verifier, query))]
pub async fn callback(
    verifier: Extension<Arc<Verifier>>,
    query: Option<Query<CallbackRequest>>,
) -> Response {
    let request = query.map(|Query(request)| request).unwrap_or_default();

    match verifier.run(request).await {
        Ok(_) => (StatusCode::OK, Html(SUCCESS_PAGE)).into_response(),
        Err(err) => failure_response(&err).into_response(),
    }
}

/// Browser-facing projection of a pipeline failure.
#[must_use]
pub fn failure_response(err: &VerifyError) -> impl IntoResponse {
    (
        err.status_code(),
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        err.public_message(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::body::to_bytes;

    async fn body_of(err: &VerifyError) -> Result<(StatusCode, String)> {
        let response = failure_response(err).into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, String::from_utf8(body.to_vec())?))
    }

    #[tokio::test]
    async fn missing_code_is_plain_bad_request() -> Result<()> {
        let (status, body) = body_of(&VerifyError::MissingCode).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "No code.");
        Ok(())
    }

    #[tokio::test]
    async fn upstream_detail_is_not_echoed() -> Result<()> {
        let err = VerifyError::TokenExchangeFailed {
            status: 400,
            provider_error: Some("errors.com.epicgames.account.oauth.invalid_grant".to_string()),
        };
        let (status, body) = body_of(&err).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Verification failed. Try again.");
        Ok(())
    }
}
