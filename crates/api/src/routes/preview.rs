//! Route definitions for card and sheet previews.

use axum::routing::post;
use axum::Router;

use crate::handlers::preview;
use crate::state::AppState;

/// Preview routes mounted at `/preview`.
///
/// ```text
/// POST /card       -> preview_card
/// POST /card/pdf   -> preview_card_pdf
/// POST /sheet      -> preview_sheet
/// POST /sheet/pdf  -> preview_sheet_pdf
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/card", post(preview::preview_card))
        .route("/card/pdf", post(preview::preview_card_pdf))
        .route("/sheet", post(preview::preview_sheet))
        .route("/sheet/pdf", post(preview::preview_sheet_pdf))
}
