use crate::{
    api::handlers::pages,
    verify::{ConsentLink, RequesterId, state},
};
use axum::{
    extract::{Extension, Query},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::IntoParams;

pub const INVALID_REQUESTER_MESSAGE: &str = "Invalid requester.";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LandingQuery {
    /// Discord user id to mention once verified
    pub requester: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    params(LandingQuery),
    responses(
        (status = 200, description = "Landing page", body = String, content_type = "text/html"),
        (status = 400, description = "Invalid requester id", body = String, content_type = "text/plain"),
    ),
    tag = "verify",
)]
// Mints the correlation state and links to Epic's consent screen.
#[instrument(skip(consent, query))]
pub async fn root(
    consent: Extension<Arc<ConsentLink>>,
    query: Option<Query<LandingQuery>>,
) -> Response {
    let requester = query
        .and_then(|Query(query)| query.requester)
        .filter(|requester| !requester.trim().is_empty());

    let Some(requester) = requester else {
        return Html(pages::landing_form()).into_response();
    };

    let Ok(requester) = RequesterId::parse(requester.trim()) else {
        debug!("Rejected requester id");
        return plain(StatusCode::BAD_REQUEST, INVALID_REQUESTER_MESSAGE);
    };

    match consent.url(&state::mint(&requester)) {
        Ok(url) => Html(pages::landing_consent(requester.as_str(), url.as_str())).into_response(),
        Err(err) => {
            error!("Invalid authorize URL: {err}");
            plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal error.")
        }
    }
}

fn plain(status: StatusCode, message: &'static str) -> Response {
    (status, [(CONTENT_TYPE, "text/plain; charset=utf-8")], message).into_response()
}
