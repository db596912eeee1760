//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use rates_types::{ErrorResponse, HealthResponse, RateError, RateRequest, RateResponse};

use crate::RateService;

/// Application state shared across handlers.
pub struct AppState {
    pub service: RateService,
}

/// Errors a handler can answer with.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be read as a `RateRequest`.
    BadRequest(String),
    Rate(RateError),
}

impl From<RateError> for ApiError {
    fn from(err: RateError) -> Self {
        ApiError::Rate(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(msg.clone(), StatusCode::BAD_REQUEST.as_u16()),
            ),
            ApiError::Rate(RateError::Validation(err)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(err.to_string(), StatusCode::BAD_REQUEST.as_u16()),
            ),
            ApiError::Rate(RateError::Aggregate(failure)) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::from_aggregate(failure, StatusCode::BAD_GATEWAY.as_u16()),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
        providers: state.service.aggregator().provider_names(),
    })
}

/// Resolve the rate of a currency pair, converting an amount if one is sent.
#[utoipa::path(
    post,
    path = "/v1/rate",
    tag = "rates",
    request_body = RateRequest,
    responses(
        (status = 200, description = "Rate resolved", body = RateResponse),
        (status = 400, description = "Malformed pair, amount or body", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded"),
        (status = 502, description = "No provider returned a usable rate", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, payload))]
pub async fn get_rate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> Result<Json<RateResponse>, ApiError> {
    let Json(req) = payload?;
    tracing::info!(currency_pair = %req.currency_pair, amount = ?req.amount, "Rate requested");

    let response = state.service.quote(req).await?;
    Ok(Json(response))
}
