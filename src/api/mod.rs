use crate::verify::{ConsentLink, Verifier};
use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{Span, debug_span, error, info};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;

use handlers::{callback, health, root};

#[derive(OpenApi)]
#[openapi(
    paths(root::root, callback::callback, health::health),
    components(schemas(health::Health)),
    tags(
        (name = "verify", description = "OAuth callback and landing page"),
        (name = "health", description = "Service status"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the router with every route and the request-id/tracing layers.
#[must_use]
pub fn router(verifier: Arc<Verifier>, consent: Arc<ConsentLink>) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/callback", get(callback::callback))
        .route("/health", get(health::health).options(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(verifier))
                .layer(Extension(consent)),
        )
}

/// Serve until ctrl-c.
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn new(port: u16, verifier: Arc<Verifier>, consent: Arc<ConsentLink>) -> Result<()> {
    let app = router(verifier, consent);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {err}");
                std::future::pending::<()>().await;
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    // query strings carry the authorization code, so only the path is recorded
    debug_span!("http-request", path, request_id)
}
