//! Route definitions for the merge field registry.

use axum::routing::get;
use axum::Router;

use crate::handlers::merge_fields;
use crate::state::AppState;

/// Merge field routes mounted at `/merge-fields`.
///
/// ```text
/// GET / -> list_merge_fields
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(merge_fields::list_merge_fields))
}
