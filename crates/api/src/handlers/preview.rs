//! Handlers for card and sheet previews.
//!
//! Previews never mutate anything: the stored payload is re-normalized,
//! resolved against the caller's context, and assembled into the preview
//! structures. The PDF variants hand the same structures to the
//! configured renderer.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use carddesk_core::design;
use carddesk_core::error::CoreError;
use carddesk_core::preview::{build_card_preview, build_sheet_preview, CardPreview, GuideParams};
use carddesk_core::sheet::{SheetGeometry, SlotSelection};
use carddesk_core::types::DbId;
use carddesk_core::versioning;
use carddesk_db::models::card_template_version::CardTemplateVersion;
use carddesk_db::repositories::{CardFormatRepo, CardTemplateVersionRepo, PaperProfileRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for card previews.
#[derive(Debug, Deserialize)]
pub struct CardPreviewRequest {
    pub version_id: DbId,
    #[serde(default)]
    pub context: HashMap<String, String>,
    pub guides: Option<GuideParams>,
}

/// Request body for sheet previews.
#[derive(Debug, Deserialize)]
pub struct SheetPreviewRequest {
    pub version_id: DbId,
    #[serde(default)]
    pub context: HashMap<String, String>,
    pub guides: Option<GuideParams>,
    /// Overrides the version's bound paper profile for this preview.
    pub paper_profile_id: Option<DbId>,
    pub slot_selection: Option<SlotSelection>,
}

// ---------------------------------------------------------------------------
// Assembly helpers
// ---------------------------------------------------------------------------

async fn assemble_card_preview(
    state: &AppState,
    version_id: DbId,
    context: HashMap<String, String>,
    guides: Option<GuideParams>,
) -> AppResult<(CardPreview, CardTemplateVersion)> {
    let version = CardTemplateVersionRepo::find_by_id(&state.pool, version_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardTemplateVersion",
            id: version_id,
        }))?;

    let format = CardFormatRepo::find_by_id(&state.pool, version.card_format_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardFormat",
            id: version.card_format_id,
        }))?;

    let payload = design::normalize(&version.design_payload);
    let preview = build_card_preview(
        &payload,
        format.summary(),
        context,
        guides.unwrap_or_default(),
    );

    Ok((preview, version))
}

/// Resolve the geometry a sheet preview should tile against: explicit
/// override first, then the version's bound profile, else none.
async fn resolve_sheet_geometry(
    state: &AppState,
    card_format_id: DbId,
    override_id: Option<DbId>,
    version_profile_id: Option<DbId>,
) -> AppResult<Option<SheetGeometry>> {
    let profile_id = match override_id.or(version_profile_id) {
        Some(id) => id,
        None => return Ok(None),
    };

    let profile = PaperProfileRepo::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PaperProfile",
            id: profile_id,
        }))?;
    versioning::check_profile_format(profile.card_format_id, card_format_id)?;

    Ok(Some(profile.geometry()))
}

async fn assemble_sheet_preview(
    state: &AppState,
    request: SheetPreviewRequest,
) -> AppResult<carddesk_core::preview::SheetPreview> {
    let (card_preview, version) =
        assemble_card_preview(state, request.version_id, request.context, request.guides).await?;

    let geometry = resolve_sheet_geometry(
        state,
        version.card_format_id,
        request.paper_profile_id,
        version.paper_profile_id,
    )
    .await?;

    let selection = request.slot_selection.unwrap_or(SlotSelection::Default);
    let preview = build_sheet_preview(card_preview, geometry, &selection)?;

    Ok(preview)
}

fn pdf_response(bytes: Vec<u8>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        bytes,
    )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/preview/card
pub async fn preview_card(
    State(state): State<AppState>,
    Json(request): Json<CardPreviewRequest>,
) -> AppResult<impl IntoResponse> {
    let (preview, _) =
        assemble_card_preview(&state, request.version_id, request.context, request.guides).await?;

    Ok(Json(DataResponse { data: preview }))
}

/// POST /api/v1/preview/sheet
pub async fn preview_sheet(
    State(state): State<AppState>,
    Json(request): Json<SheetPreviewRequest>,
) -> AppResult<impl IntoResponse> {
    let preview = assemble_sheet_preview(&state, request).await?;

    Ok(Json(DataResponse { data: preview }))
}

/// POST /api/v1/preview/card/pdf
pub async fn preview_card_pdf(
    State(state): State<AppState>,
    Json(request): Json<CardPreviewRequest>,
) -> AppResult<impl IntoResponse> {
    let (preview, _) =
        assemble_card_preview(&state, request.version_id, request.context, request.guides).await?;

    let bytes = state.renderer.render_card_pdf(&preview).await?;

    Ok(pdf_response(bytes))
}

/// POST /api/v1/preview/sheet/pdf
pub async fn preview_sheet_pdf(
    State(state): State<AppState>,
    Json(request): Json<SheetPreviewRequest>,
) -> AppResult<impl IntoResponse> {
    let preview = assemble_sheet_preview(&state, request).await?;

    let bytes = state.renderer.render_sheet_pdf(&preview).await?;

    Ok(pdf_response(bytes))
}
