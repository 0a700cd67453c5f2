//! Handlers for paper profile administration.
//!
//! Every save path runs the full slot layout against the owning card
//! format before touching the database, so a persisted profile always
//! tiles its declared grid within its declared sheet.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use carddesk_core::error::CoreError;
use carddesk_core::sheet::compute_slots;
use carddesk_core::types::DbId;
use carddesk_db::models::paper_profile::{CreatePaperProfile, PaperProfile, UpdatePaperProfile};
use carddesk_db::repositories::{CardFormatRepo, PaperProfileRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query string for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub card_format_id: Option<DbId>,
}

async fn fetch_profile(state: &AppState, profile_id: DbId) -> AppResult<PaperProfile> {
    PaperProfileRepo::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "PaperProfile",
                id: profile_id,
            })
        })
}

/// GET /api/v1/paper-profiles
pub async fn list_paper_profiles(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let profiles = match query.card_format_id {
        Some(format_id) => PaperProfileRepo::list_for_card_format(&state.pool, format_id).await?,
        None => PaperProfileRepo::list(&state.pool).await?,
    };

    Ok(Json(DataResponse { data: profiles }))
}

/// POST /api/v1/paper-profiles
pub async fn create_paper_profile(
    State(state): State<AppState>,
    Json(input): Json<CreatePaperProfile>,
) -> AppResult<impl IntoResponse> {
    let format = CardFormatRepo::find_by_id(&state.pool, input.card_format_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardFormat",
            id: input.card_format_id,
        }))?;

    // Rejects grids that do not fit the sheet before anything persists.
    compute_slots(&input.geometry(), &format.size())?;

    let profile = PaperProfileRepo::create(&state.pool, &input).await?;

    tracing::info!(
        profile_id = profile.id,
        card_format_id = profile.card_format_id,
        "Paper profile created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// GET /api/v1/paper-profiles/:id
pub async fn get_paper_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = fetch_profile(&state, profile_id).await?;

    Ok(Json(DataResponse { data: profile }))
}

/// PATCH /api/v1/paper-profiles/:id
pub async fn update_paper_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
    Json(input): Json<UpdatePaperProfile>,
) -> AppResult<impl IntoResponse> {
    let existing = fetch_profile(&state, profile_id).await?;

    let format = CardFormatRepo::find_by_id(&state.pool, existing.card_format_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardFormat",
            id: existing.card_format_id,
        }))?;

    // Validate the merged geometry, not just the changed fields.
    let mut merged = existing.geometry();
    if let Some(v) = input.sheet_width_mm {
        merged.sheet_width_mm = v;
    }
    if let Some(v) = input.sheet_height_mm {
        merged.sheet_height_mm = v;
    }
    if let Some(v) = input.margin_top_mm {
        merged.margin_top_mm = v;
    }
    if let Some(v) = input.margin_bottom_mm {
        merged.margin_bottom_mm = v;
    }
    if let Some(v) = input.margin_left_mm {
        merged.margin_left_mm = v;
    }
    if let Some(v) = input.margin_right_mm {
        merged.margin_right_mm = v;
    }
    if let Some(v) = input.horizontal_gap_mm {
        merged.horizontal_gap_mm = v;
    }
    if let Some(v) = input.vertical_gap_mm {
        merged.vertical_gap_mm = v;
    }
    if let Some(v) = input.grid_rows {
        merged.rows = v.max(0) as u32;
    }
    if let Some(v) = input.grid_columns {
        merged.columns = v.max(0) as u32;
    }
    if let Some(v) = input.slot_count {
        merged.slot_count = v.max(0) as u32;
    }
    compute_slots(&merged, &format.size())?;

    let profile = PaperProfileRepo::update(&state.pool, profile_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PaperProfile",
            id: profile_id,
        }))?;

    tracing::info!(profile_id, "Paper profile updated");

    Ok(Json(DataResponse { data: profile }))
}

/// DELETE /api/v1/paper-profiles/:id
pub async fn delete_paper_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PaperProfileRepo::delete(&state.pool, profile_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "PaperProfile",
            id: profile_id,
        }));
    }

    tracing::info!(profile_id, "Paper profile deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/paper-profiles/:id/slots
///
/// The computed slot rectangles for the profile, useful for layout
/// debugging and for clients drawing the sheet grid themselves.
pub async fn get_paper_profile_slots(
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = fetch_profile(&state, profile_id).await?;

    let format = CardFormatRepo::find_by_id(&state.pool, profile.card_format_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardFormat",
            id: profile.card_format_id,
        }))?;

    let slots = compute_slots(&profile.geometry(), &format.size())?;

    Ok(Json(DataResponse { data: slots }))
}
