//! Handlers for card format administration.
//!
//! Formats referenced by published versions are immutable by convention;
//! administrators deactivate formats instead of deleting them, so there
//! is no delete endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use carddesk_core::error::CoreError;
use carddesk_core::geometry::MIN_ELEMENT_SIZE_MM;
use carddesk_core::types::DbId;
use carddesk_db::models::card_format::{CreateCardFormat, UpdateCardFormat};
use carddesk_db::repositories::CardFormatRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query string for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub active_only: bool,
}

fn validate_dimensions(width_mm: f64, height_mm: f64) -> Result<(), CoreError> {
    if !width_mm.is_finite() || !height_mm.is_finite() {
        return Err(CoreError::Validation(
            "Card dimensions must be finite numbers".into(),
        ));
    }
    if width_mm < MIN_ELEMENT_SIZE_MM || height_mm < MIN_ELEMENT_SIZE_MM {
        return Err(CoreError::Validation(format!(
            "Card dimensions must be at least {MIN_ELEMENT_SIZE_MM}mm"
        )));
    }
    Ok(())
}

/// GET /api/v1/card-formats
pub async fn list_card_formats(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let formats = CardFormatRepo::list(&state.pool, query.active_only).await?;

    Ok(Json(DataResponse { data: formats }))
}

/// POST /api/v1/card-formats
pub async fn create_card_format(
    State(state): State<AppState>,
    Json(input): Json<CreateCardFormat>,
) -> AppResult<impl IntoResponse> {
    if input.code.trim().is_empty() {
        return Err(CoreError::Validation("Format code must not be empty".into()).into());
    }
    validate_dimensions(input.width_mm, input.height_mm)?;

    let format = CardFormatRepo::create(&state.pool, &input).await?;

    tracing::info!(format_id = format.id, code = %format.code, "Card format created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: format })))
}

/// GET /api/v1/card-formats/:id
pub async fn get_card_format(
    State(state): State<AppState>,
    Path(format_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let format = CardFormatRepo::find_by_id(&state.pool, format_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardFormat",
            id: format_id,
        }))?;

    Ok(Json(DataResponse { data: format }))
}

/// PATCH /api/v1/card-formats/:id
pub async fn update_card_format(
    State(state): State<AppState>,
    Path(format_id): Path<DbId>,
    Json(input): Json<UpdateCardFormat>,
) -> AppResult<impl IntoResponse> {
    let existing = CardFormatRepo::find_by_id(&state.pool, format_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardFormat",
            id: format_id,
        }))?;

    validate_dimensions(
        input.width_mm.unwrap_or(existing.width_mm),
        input.height_mm.unwrap_or(existing.height_mm),
    )?;

    let format = CardFormatRepo::update(&state.pool, format_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardFormat",
            id: format_id,
        }))?;

    tracing::info!(format_id, "Card format updated");

    Ok(Json(DataResponse { data: format }))
}
