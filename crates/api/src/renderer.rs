//! Renderer boundary implementations.
//!
//! PDF byte generation is an external collaborator; the API's contract
//! ends at a complete, geometry-correct, fully-resolved preview
//! description. [`NoopRenderer`] stands in wherever no real rendering
//! backend is wired up (local development, tests).

use carddesk_core::error::CoreError;
use carddesk_core::preview::{CardPreview, CardRenderer, SheetPreview};

/// A renderer that accepts every description and produces no bytes.
#[derive(Debug, Default)]
pub struct NoopRenderer;

#[async_trait::async_trait]
impl CardRenderer for NoopRenderer {
    async fn render_card_pdf(&self, preview: &CardPreview) -> Result<Vec<u8>, CoreError> {
        tracing::debug!(
            card = %preview.card.code,
            elements = preview.elements.len(),
            "NoopRenderer: skipping card PDF generation",
        );
        Ok(Vec::new())
    }

    async fn render_sheet_pdf(&self, preview: &SheetPreview) -> Result<Vec<u8>, CoreError> {
        tracing::debug!(
            card = %preview.card.card.code,
            slots = preview.slots.len(),
            "NoopRenderer: skipping sheet PDF generation",
        );
        Ok(Vec::new())
    }
}
