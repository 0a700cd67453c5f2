//! Route definitions for card format administration.

use axum::routing::get;
use axum::Router;

use crate::handlers::card_formats;
use crate::state::AppState;

/// Card format routes mounted at `/card-formats`.
///
/// ```text
/// GET  /      -> list_card_formats (?active_only)
/// POST /      -> create_card_format
/// GET  /{id}  -> get_card_format
/// PATCH /{id} -> update_card_format
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(card_formats::list_card_formats).post(card_formats::create_card_format),
        )
        .route(
            "/{id}",
            get(card_formats::get_card_format).patch(card_formats::update_card_format),
        )
}
