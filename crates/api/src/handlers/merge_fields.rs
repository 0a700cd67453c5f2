//! Handler for the merge field registry.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use carddesk_db::repositories::MergeFieldRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/merge-fields
pub async fn list_merge_fields(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let fields = MergeFieldRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: fields }))
}
