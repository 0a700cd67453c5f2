//! Route registration.

pub mod card_formats;
pub mod health;
pub mod merge_fields;
pub mod paper_profiles;
pub mod preview;
pub mod print_jobs;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /card-formats                                     list, create
/// /card-formats/{id}                                get, update
///
/// /paper-profiles                                   list (?card_format_id), create
/// /paper-profiles/{id}                              get, update, delete
/// /paper-profiles/{id}/slots                        computed slot rectangles
///
/// /merge-fields                                     registry listing
///
/// /templates                                            list, create
/// /templates/default                                    default + latest published version
/// /templates/{id}                                       get, update
/// /templates/{id}/default                               set system default (POST)
/// /templates/{id}/versions                              list, create draft
/// /templates/{id}/versions/active                       active-version selection
/// /templates/{id}/versions/{version_id}                 get
/// /templates/{id}/versions/{version_id}/payload         replace draft payload (PUT)
/// /templates/{id}/versions/{version_id}/paper-profile   rebind draft profile (PUT)
/// /templates/{id}/versions/{version_id}/publish         publish (POST)
///
/// /preview/card                                     resolved card preview (POST)
/// /preview/card/pdf                                 card PDF via renderer (POST)
/// /preview/sheet                                    resolved sheet preview (POST)
/// /preview/sheet/pdf                                sheet PDF via renderer (POST)
///
/// /print-jobs                                       list, create
/// /print-jobs/{id}                                  get with items
/// /print-jobs/{id}/cancel                           cancel (POST)
/// /print-jobs/{id}/status                           worker status report (PATCH)
/// /print-jobs/{id}/items/{item_id}/status           per-card status report (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Physical card sizes.
        .nest("/card-formats", card_formats::router())
        // Sheet layouts bound to card formats.
        .nest("/paper-profiles", paper_profiles::router())
        // Supported merge field keys.
        .nest("/merge-fields", merge_fields::router())
        // Templates and their versioned designs.
        .nest("/templates", templates::router())
        // Read-only preview assembly and PDF rendering.
        .nest("/preview", preview::router())
        // Print job lifecycle.
        .nest("/print-jobs", print_jobs::router())
}
