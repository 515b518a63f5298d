use crate::GIT_COMMIT_HASH;
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Health),
    ),
    tag = "health",
)]
/// Report name, version and build. `OPTIONS` gets the headers only.
pub async fn health(method: Method) -> impl IntoResponse {
    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let short_hash = health.commit.get(..7).unwrap_or_default();

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app| {
            let mut headers = HeaderMap::new();
            headers.insert("X-App", x_app);
            headers
        })
        .unwrap_or_else(|err| {
            debug!("Failed to parse X-App header: {err}");
            HeaderMap::new()
        });

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    (StatusCode::OK, headers, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::body::to_bytes;
    use serde_json::Value;

    #[tokio::test]
    async fn get_returns_build_info() -> Result<()> {
        let response = health(Method::GET).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let x_app = response
            .headers()
            .get("X-App")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        assert!(x_app.is_some_and(|value| value.starts_with("skincheck:")));

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let json: Value = serde_json::from_slice(&body)?;
        assert_eq!(json["name"], "skincheck");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    #[tokio::test]
    async fn options_has_empty_body() -> Result<()> {
        let response = health(Method::OPTIONS).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert!(body.is_empty());
        Ok(())
    }
}
