use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use contact_relay::intake::{
    contact_router, ContactService, Locale, Notice, RateLimitStore, ReplyBody,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_contact_routes<S>(service: Arc<ContactService<S>>) -> axum::Router
where
    S: RateLimitStore + 'static,
{
    let locale = service.locale();
    contact_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .fallback(move || not_found(locale))
}

pub(crate) async fn not_found(locale: Locale) -> (StatusCode, Json<ReplyBody>) {
    let reply = ReplyBody {
        success: false,
        message: Notice::NotFound.text(locale).to_string(),
        errors: None,
    };
    (StatusCode::NOT_FOUND, Json(reply))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
