//! OpenAPI document for the HTTP API.

use axum::Json;
use utoipa::OpenApi;

use rates_types::dto::{
    ErrorResponse, HealthResponse, ProviderFailureBody, RateRequest, RateResponse,
};

use crate::inbound::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rates API",
        description = "Resolves exchange rates by racing several upstream providers"
    ),
    paths(handlers::health, handlers::get_rate),
    components(schemas(
        RateRequest,
        RateResponse,
        ErrorResponse,
        ProviderFailureBody,
        HealthResponse
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "rates", description = "Exchange rate lookup and conversion")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_rate_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/rate"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
