//! API handlers for search volume queries

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use trendscope_trends::{SearchVolumePoint, SearchVolumeRequest};

use crate::errors::ApiError;
use crate::server::AppState;

/// `POST /api/search_volumes`
///
/// Body fields: `terms`, `start_date`, `end_date`, `frequency`,
/// `geo_restriction` (`country`, `dma` or `region`) and
/// `geo_restriction_option`. Responds with `[{term, date, value}, ...]`.
///
/// # Errors
/// - `ApiError::BadRequest` - Body is not JSON or lacks a required field
/// - `ApiError::Trends` - Unknown geo restriction or upstream failure
pub async fn api_search_volumes(
    State(state): State<AppState>,
    payload: Result<Json<SearchVolumeRequest>, JsonRejection>,
) -> Result<Json<Vec<SearchVolumePoint>>, ApiError> {
    let Json(request) = payload?;
    let results = state.trends_service.search_volumes_for(request).await?;
    Ok(Json(results))
}
