//! Route definitions for paper profile administration.

use axum::routing::get;
use axum::Router;

use crate::handlers::paper_profiles;
use crate::state::AppState;

/// Paper profile routes mounted at `/paper-profiles`.
///
/// ```text
/// GET    /            -> list_paper_profiles (?card_format_id)
/// POST   /            -> create_paper_profile
/// GET    /{id}        -> get_paper_profile
/// PATCH  /{id}        -> update_paper_profile
/// DELETE /{id}        -> delete_paper_profile
/// GET    /{id}/slots  -> get_paper_profile_slots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(paper_profiles::list_paper_profiles).post(paper_profiles::create_paper_profile),
        )
        .route(
            "/{id}",
            get(paper_profiles::get_paper_profile)
                .patch(paper_profiles::update_paper_profile)
                .delete(paper_profiles::delete_paper_profile),
        )
        .route("/{id}/slots", get(paper_profiles::get_paper_profile_slots))
}
