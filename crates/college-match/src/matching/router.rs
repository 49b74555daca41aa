use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::filter::DistanceProvider;
use super::service::{MatchRequest, MatchService};

/// Router builder exposing the ranking and catalog endpoints.
pub fn match_router<D>(service: Arc<MatchService<D>>) -> Router
where
    D: DistanceProvider + 'static,
{
    Router::new()
        .route("/api/v1/matches", post(match_handler::<D>))
        .route("/api/v1/catalog/summary", get(summary_handler::<D>))
        .with_state(service)
}

pub(crate) async fn match_handler<D>(
    State(service): State<Arc<MatchService<D>>>,
    axum::Json(request): axum::Json<MatchRequest>,
) -> Response
where
    D: DistanceProvider + 'static,
{
    match service.rank(&request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) if error.is_validation() => {
            warn!(%error, "rejected ranking request");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn summary_handler<D>(State(service): State<Arc<MatchService<D>>>) -> Response
where
    D: DistanceProvider + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog_summary())).into_response()
}
