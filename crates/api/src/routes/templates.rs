//! Route definitions for card templates and their versions.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template routes mounted at `/templates`.
///
/// ```text
/// GET   /                                          -> list_templates (?active_only)
/// POST  /                                          -> create_template
/// GET   /default                                   -> get_default_template
/// GET   /{id}                                      -> get_template
/// PATCH /{id}                                      -> update_template
/// POST  /{id}/default                              -> set_default_template
///
/// GET   /{id}/versions                             -> list_versions
/// POST  /{id}/versions                             -> create_version
/// GET   /{id}/versions/active                      -> get_active_version (?preferred_id, previous_id)
/// GET   /{id}/versions/{version_id}                -> get_version
/// PUT   /{id}/versions/{version_id}/payload        -> update_draft
/// PUT   /{id}/versions/{version_id}/paper-profile  -> update_draft_profile
/// POST  /{id}/versions/{version_id}/publish        -> publish_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/default", get(templates::get_default_template))
        .route(
            "/{id}",
            get(templates::get_template).patch(templates::update_template),
        )
        .route("/{id}/default", post(templates::set_default_template))
        .route(
            "/{id}/versions",
            get(templates::list_versions).post(templates::create_version),
        )
        .route("/{id}/versions/active", get(templates::get_active_version))
        .route("/{id}/versions/{version_id}", get(templates::get_version))
        .route(
            "/{id}/versions/{version_id}/payload",
            put(templates::update_draft),
        )
        .route(
            "/{id}/versions/{version_id}/paper-profile",
            put(templates::update_draft_profile),
        )
        .route(
            "/{id}/versions/{version_id}/publish",
            post(templates::publish_version),
        )
}
