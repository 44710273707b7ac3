//! Operational HTTP endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let hub = state.hub();
    let stats = hub.stats();
    let mut body = hub.metrics().render();
    body.push_str(&format!(
        "# TYPE ripple_users_connected gauge\nripple_users_connected {}\n",
        stats.users
    ));

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
