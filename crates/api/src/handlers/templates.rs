//! Handlers for card templates and their versions.
//!
//! Every payload that reaches storage goes through the same pipeline:
//! normalize the raw JSON, reject unknown merge fields against the
//! registry, clamp all elements to the card, then sanitize back to the
//! canonical JSON form.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use carddesk_core::design;
use carddesk_core::error::CoreError;
use carddesk_core::types::DbId;
use carddesk_core::versioning::{self, VersionRef};
use carddesk_db::models::card_template::{CreateCardTemplate, UpdateCardTemplate};
use carddesk_db::models::card_template_version::{
    ActiveVersionQuery, CardTemplateVersion, CreateTemplateVersion, UpdateDraftPayload,
};
use carddesk_db::repositories::{
    CardFormatRepo, CardTemplateRepo, CardTemplateVersionRepo, MergeFieldRepo, PaperProfileRepo,
};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query string for the template list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub active_only: bool,
}

/// Response for the default-template endpoint.
#[derive(Debug, Serialize)]
pub struct DefaultTemplateResponse {
    pub template: carddesk_db::models::card_template::CardTemplate,
    pub latest_published: Option<CardTemplateVersion>,
}

/// Body for rebinding a draft's paper profile.
#[derive(Debug, Deserialize)]
pub struct UpdateDraftProfile {
    pub paper_profile_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Payload pipeline
// ---------------------------------------------------------------------------

/// Normalize, validate, clamp and sanitize a raw design payload for a
/// given card format. The returned value is what gets persisted.
async fn prepare_payload(
    state: &AppState,
    raw: &serde_json::Value,
    card_format_id: DbId,
) -> AppResult<serde_json::Value> {
    let format = CardFormatRepo::find_by_id(&state.pool, card_format_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardFormat",
            id: card_format_id,
        }))?;

    let known_keys = MergeFieldRepo::list_keys(&state.pool).await?;

    let mut payload = design::normalize(raw);
    design::validate_merge_fields(&payload, &known_keys)?;
    design::clamp_to_card(&mut payload, format.width_mm, format.height_mm);

    Ok(design::sanitize(&payload))
}

async fn fetch_version(state: &AppState, version_id: DbId) -> AppResult<CardTemplateVersion> {
    CardTemplateVersionRepo::find_by_id(&state.pool, version_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "CardTemplateVersion",
                id: version_id,
            })
        })
}

async fn ensure_template_exists(state: &AppState, template_id: DbId) -> AppResult<()> {
    CardTemplateRepo::find_by_id(&state.pool, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardTemplate",
            id: template_id,
        }))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Template CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/templates
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let templates = CardTemplateRepo::list(&state.pool, query.active_only).await?;

    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(input): Json<CreateCardTemplate>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Template name must not be empty".into()).into());
    }

    let template = CardTemplateRepo::create(&state.pool, &input).await?;

    tracing::info!(template_id = template.id, name = %template.name, "Template created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = CardTemplateRepo::find_by_id(&state.pool, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardTemplate",
            id: template_id,
        }))?;

    Ok(Json(DataResponse { data: template }))
}

/// PATCH /api/v1/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<UpdateCardTemplate>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Template name must not be empty".into()).into());
        }
    }

    let template = CardTemplateRepo::update(&state.pool, template_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardTemplate",
            id: template_id,
        }))?;

    tracing::info!(template_id, "Template updated");

    Ok(Json(DataResponse { data: template }))
}

/// GET /api/v1/templates/default
///
/// The system default template together with its latest published
/// version, which is what a card-issue flow prints when the caller has
/// expressed no other preference. `data` is null while no default is
/// configured.
pub async fn get_default_template(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let template = match CardTemplateRepo::find_default(&state.pool).await? {
        Some(template) => template,
        None => return Ok(Json(DataResponse { data: None })),
    };

    let versions = CardTemplateVersionRepo::list_for_template(&state.pool, template.id).await?;
    let refs: Vec<VersionRef> = versions.iter().map(|v| v.version_ref()).collect();
    let latest_published = versioning::latest_published(&refs)
        .and_then(|r| versions.into_iter().find(|v| v.id == r.id));

    Ok(Json(DataResponse {
        data: Some(DefaultTemplateResponse {
            template,
            latest_published,
        }),
    }))
}

/// POST /api/v1/templates/:id/default
pub async fn set_default_template(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = CardTemplateRepo::set_default(&state.pool, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CardTemplate",
            id: template_id,
        }))?;

    tracing::info!(template_id, "Template set as default");

    Ok(Json(DataResponse { data: template }))
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

/// GET /api/v1/templates/:id/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_template_exists(&state, template_id).await?;

    let versions = CardTemplateVersionRepo::list_for_template(&state.pool, template_id).await?;

    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/templates/:id/versions
///
/// Creates a new draft. The payload is cloned from `base_version_id`
/// (which must belong to the same template) when given, otherwise taken
/// from the request, otherwise empty. A
/// paper profile is bound explicitly or falls back to the first profile
/// for the version's card format.
pub async fn create_version(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(mut input): Json<CreateTemplateVersion>,
) -> AppResult<impl IntoResponse> {
    ensure_template_exists(&state, template_id).await?;

    // Resolve where the design comes from before normalizing it.
    let raw_payload = match input.base_version_id {
        Some(base_id) => {
            let base = fetch_version(&state, base_id).await?;
            if base.template_id != template_id {
                return Err(CoreError::Validation(format!(
                    "Base version {base_id} belongs to another template"
                ))
                .into());
            }
            base.design_payload
        }
        None => input
            .design_payload
            .take()
            .unwrap_or_else(|| serde_json::json!({})),
    };

    let paper_profile_id = match input.paper_profile_id {
        Some(profile_id) => {
            let profile = PaperProfileRepo::find_by_id(&state.pool, profile_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "PaperProfile",
                    id: profile_id,
                }))?;
            versioning::check_profile_format(profile.card_format_id, input.card_format_id)?;
            Some(profile_id)
        }
        None => {
            PaperProfileRepo::find_first_for_card_format(&state.pool, input.card_format_id)
                .await?
                .map(|p| p.id)
        }
    };
    input.paper_profile_id = paper_profile_id;

    let payload = prepare_payload(&state, &raw_payload, input.card_format_id).await?;

    let version = CardTemplateVersionRepo::create(&state.pool, template_id, &input, &payload).await?;

    tracing::info!(
        template_id,
        version_id = version.id,
        version_number = version.version_number,
        "Draft version created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: version })))
}

/// GET /api/v1/templates/:id/versions/:version_id
pub async fn get_version(
    State(state): State<AppState>,
    Path((template_id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let version = fetch_version(&state, version_id).await?;
    if version.template_id != template_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CardTemplateVersion",
            id: version_id,
        }));
    }

    Ok(Json(DataResponse { data: version }))
}

/// PUT /api/v1/templates/:id/versions/:version_id/payload
pub async fn update_draft(
    State(state): State<AppState>,
    Path((template_id, version_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateDraftPayload>,
) -> AppResult<impl IntoResponse> {
    let version = fetch_version(&state, version_id).await?;
    if version.template_id != template_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CardTemplateVersion",
            id: version_id,
        }));
    }
    versioning::ensure_draft(version.parsed_status())?;

    let payload = prepare_payload(&state, &input.design_payload, version.card_format_id).await?;

    // The guarded update can still lose a race against a concurrent
    // publish; treat that exactly like the up-front status check.
    let version = CardTemplateVersionRepo::update_draft_payload(&state.pool, version_id, &payload)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Only draft versions can be edited".into(),
            ))
        })?;

    tracing::info!(version_id, "Draft payload updated");

    Ok(Json(DataResponse { data: version }))
}

/// PUT /api/v1/templates/:id/versions/:version_id/paper-profile
///
/// Rebinds (or clears) a draft's paper profile. The profile must belong
/// to the draft's card format.
pub async fn update_draft_profile(
    State(state): State<AppState>,
    Path((template_id, version_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateDraftProfile>,
) -> AppResult<impl IntoResponse> {
    let version = fetch_version(&state, version_id).await?;
    if version.template_id != template_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CardTemplateVersion",
            id: version_id,
        }));
    }
    versioning::ensure_draft(version.parsed_status())?;

    if let Some(profile_id) = input.paper_profile_id {
        let profile = PaperProfileRepo::find_by_id(&state.pool, profile_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "PaperProfile",
                id: profile_id,
            }))?;
        versioning::check_profile_format(profile.card_format_id, version.card_format_id)?;
    }

    let version =
        CardTemplateVersionRepo::update_draft_paper_profile(&state.pool, version_id, input.paper_profile_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::InvalidState(
                    "Only draft versions can be edited".into(),
                ))
            })?;

    tracing::info!(version_id, paper_profile_id = ?version.paper_profile_id, "Draft paper profile updated");

    Ok(Json(DataResponse { data: version }))
}

/// POST /api/v1/templates/:id/versions/:version_id/publish
pub async fn publish_version(
    State(state): State<AppState>,
    Path((template_id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let version = fetch_version(&state, version_id).await?;
    if version.template_id != template_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CardTemplateVersion",
            id: version_id,
        }));
    }
    versioning::ensure_publishable(version.parsed_status())?;

    let version = CardTemplateVersionRepo::publish(&state.pool, version_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Version is already published".into(),
            ))
        })?;

    tracing::info!(
        version_id,
        version_number = version.version_number,
        "Version published"
    );

    Ok(Json(DataResponse { data: version }))
}

/// GET /api/v1/templates/:id/versions/active
///
/// Selects which version an editor should open: the explicitly requested
/// one, the previously open one, the latest draft, or the highest
/// version, in that order.
pub async fn get_active_version(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Query(query): Query<ActiveVersionQuery>,
) -> AppResult<impl IntoResponse> {
    ensure_template_exists(&state, template_id).await?;

    let versions = CardTemplateVersionRepo::list_for_template(&state.pool, template_id).await?;
    let refs: Vec<VersionRef> = versions.iter().map(|v| v.version_ref()).collect();

    let active = versioning::select_active_version(&refs, query.preferred_id, query.previous_id)
        .and_then(|r| versions.into_iter().find(|v| v.id == r.id));

    Ok(Json(DataResponse { data: active }))
}
