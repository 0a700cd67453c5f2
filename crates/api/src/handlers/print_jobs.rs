//! Handlers for print jobs.
//!
//! Jobs start `created` and are driven to terminal states by the
//! external print worker through the status endpoints. Only published
//! versions are printable.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use carddesk_core::error::CoreError;
use carddesk_core::sheet::normalize_slot_selection;
use carddesk_core::types::DbId;
use carddesk_core::versioning::{self, VersionStatus};
use carddesk_db::models::print_job::{
    item_status, job_status, CreatePrintJob, PrintJob, PrintJobItem,
};
use carddesk_db::repositories::{CardTemplateVersionRepo, PaperProfileRepo, PrintJobRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query string for the job list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body for job and item status updates.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
    pub error_message: Option<String>,
}

/// A job together with its items.
#[derive(Debug, Serialize)]
pub struct PrintJobDetail {
    #[serde(flatten)]
    pub job: PrintJob,
    pub items: Vec<PrintJobItem>,
}

/// POST /api/v1/print-jobs
pub async fn create_print_job(
    State(state): State<AppState>,
    Json(input): Json<CreatePrintJob>,
) -> AppResult<impl IntoResponse> {
    if input.items.is_empty() {
        return Err(CoreError::Validation("A print job needs at least one card".into()).into());
    }

    let version = CardTemplateVersionRepo::find_by_id(&state.pool, input.template_version_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardTemplateVersion",
            id: input.template_version_id,
        }))?;
    if version.parsed_status() != VersionStatus::Published {
        return Err(AppError::Core(CoreError::InvalidState(
            "Only published versions can be printed".into(),
        )));
    }

    let profile = PaperProfileRepo::find_by_id(&state.pool, input.paper_profile_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PaperProfile",
            id: input.paper_profile_id,
        }))?;
    versioning::check_profile_format(profile.card_format_id, version.card_format_id)?;

    let slot_count = profile.slot_count.max(0) as u32;
    let slot_indices: Vec<i32> = normalize_slot_selection(&input.slot_indices, slot_count)
        .into_iter()
        .map(|i| i as i32)
        .collect();
    if slot_indices.is_empty() {
        return Err(CoreError::Validation(
            "Slot selection contains no valid slots for this paper profile".into(),
        )
        .into());
    }

    let job = PrintJobRepo::create(
        &state.pool,
        input.template_version_id,
        input.paper_profile_id,
        &slot_indices,
        &input.items,
    )
    .await?;

    tracing::info!(
        job_id = job.id,
        template_version_id = job.template_version_id,
        item_count = input.items.len(),
        "Print job created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /api/v1/print-jobs
pub async fn list_print_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);

    let jobs = PrintJobRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/print-jobs/:id
pub async fn get_print_job(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = PrintJobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PrintJob",
            id: job_id,
        }))?;
    let items = PrintJobRepo::list_items(&state.pool, job_id).await?;

    Ok(Json(DataResponse {
        data: PrintJobDetail { job, items },
    }))
}

/// POST /api/v1/print-jobs/:id/cancel
pub async fn cancel_print_job(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // Distinguish "no such job" from "job already finished".
    PrintJobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PrintJob",
            id: job_id,
        }))?;

    let job = PrintJobRepo::cancel(&state.pool, job_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::InvalidState(
            "Job has already finished and cannot be cancelled".into(),
        ))
    })?;

    tracing::info!(job_id, "Print job cancelled");

    Ok(Json(DataResponse { data: job }))
}

/// PATCH /api/v1/print-jobs/:id/status
pub async fn update_print_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<impl IntoResponse> {
    if !job_status::ALL.contains(&input.status.as_str()) {
        return Err(CoreError::Validation(format!("Unknown job status: {}", input.status)).into());
    }

    let job = PrintJobRepo::update_status(&state.pool, job_id, &input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PrintJob",
            id: job_id,
        }))?;

    tracing::info!(job_id, status = %job.status, "Print job status updated");

    Ok(Json(DataResponse { data: job }))
}

/// PATCH /api/v1/print-jobs/:id/items/:item_id/status
pub async fn update_print_job_item_status(
    State(state): State<AppState>,
    Path((job_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<impl IntoResponse> {
    if !item_status::ALL.contains(&input.status.as_str()) {
        return Err(CoreError::Validation(format!("Unknown item status: {}", input.status)).into());
    }

    let item = PrintJobRepo::update_item_status(
        &state.pool,
        job_id,
        item_id,
        &input.status,
        input.error_message.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "PrintJobItem",
        id: item_id,
    }))?;

    tracing::info!(job_id, item_id, status = %item.status, "Print job item status updated");

    Ok(Json(DataResponse { data: item }))
}
