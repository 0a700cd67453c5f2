//! Route definitions for print jobs.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::print_jobs;
use crate::state::AppState;

/// Print job routes mounted at `/print-jobs`.
///
/// ```text
/// GET   /                              -> list_print_jobs (?limit, offset)
/// POST  /                              -> create_print_job
/// GET   /{id}                          -> get_print_job (with items)
/// POST  /{id}/cancel                   -> cancel_print_job
/// PATCH /{id}/status                   -> update_print_job_status
/// PATCH /{id}/items/{item_id}/status   -> update_print_job_item_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(print_jobs::list_print_jobs).post(print_jobs::create_print_job),
        )
        .route("/{id}", get(print_jobs::get_print_job))
        .route("/{id}/cancel", post(print_jobs::cancel_print_job))
        .route("/{id}/status", patch(print_jobs::update_print_job_status))
        .route(
            "/{id}/items/{item_id}/status",
            patch(print_jobs::update_print_job_item_status),
        )
}
