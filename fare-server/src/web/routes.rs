//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;

use crate::quote::{quote_route, quote_trip};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/quote", post(quote_message))
        .route("/quote/route", post(quote_known_route))
        .route("/areas/resolve", get(resolve_area))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body manually so malformed input gets our error shape.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {e}"),
    })
}

/// Quote a free-text message.
async fn quote_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QuoteResponse>, AppError> {
    let req: QuoteRequest = parse_body(&body)?;

    let reply = quote_trip(&state.ctx, state.pricing.as_ref(), &req.message, &req.when).await;
    Ok(Json(QuoteResponse::from_reply(
        reply,
        &state.ctx.text().fare_disclaimer,
    )))
}

/// Quote a route whose endpoints are already known.
async fn quote_known_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QuoteResponse>, AppError> {
    let req: RouteQuoteRequest = parse_body(&body)?;

    let reply = quote_route(
        &state.ctx,
        state.pricing.as_ref(),
        &req.origin,
        &req.destination,
        &req.when,
    )
    .await;
    Ok(Json(QuoteResponse::from_reply(
        reply,
        &state.ctx.text().fare_disclaimer,
    )))
}

/// Resolve a free-text area mention.
async fn resolve_area(
    State(state): State<AppState>,
    Query(req): Query<AreaResolveRequest>,
) -> Json<AreaResolveResponse> {
    let area = state.ctx.areas().resolve_area(&req.q).map(str::to_string);
    Json(AreaResolveResponse { area })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        tracing::warn!(%status, %message, "request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
