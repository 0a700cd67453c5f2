//! Preview assembly: one render-ready description per card or sheet.
//!
//! The orchestrator combines a normalized design, the card format, the
//! resolved subject context, guide parameters, and (for sheets) the paper
//! profile's slot layout into a single deterministic structure. The same
//! inputs always produce the same output; no clock, no randomness. Actual
//! PDF byte generation happens behind [`CardRenderer`], outside this
//! crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::design::DesignPayload;
use crate::error::CoreError;
use crate::merge::{resolve_elements, ResolvedElement};
use crate::sheet::{compute_slots, CardSize, SheetGeometry, Slot, SlotSelection};

// ---------------------------------------------------------------------------
// Guides
// ---------------------------------------------------------------------------

/// Bleed and safe-area guide overlays, each independently toggled and
/// valued. Visual aids only, never structural geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideParams {
    pub include_bleed_guide: bool,
    pub include_safe_area_guide: bool,
    pub bleed_mm: f64,
    pub safe_area_mm: f64,
}

impl Default for GuideParams {
    fn default() -> Self {
        Self {
            include_bleed_guide: false,
            include_safe_area_guide: false,
            bleed_mm: 3.0,
            safe_area_mm: 3.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Preview structures
// ---------------------------------------------------------------------------

/// Card format summary carried into previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFormatSummary {
    pub code: String,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl CardFormatSummary {
    pub fn size(&self) -> CardSize {
        CardSize {
            width_mm: self.width_mm,
            height_mm: self.height_mm,
        }
    }
}

/// A fully-resolved single card, ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardPreview {
    pub card: CardFormatSummary,
    pub guides: GuideParams,
    /// The subject context the elements were resolved against.
    pub context: HashMap<String, String>,
    /// Elements in paint order, each annotated with `render_order`.
    pub elements: Vec<ResolvedElement>,
}

/// One sheet slot with its print-run selection flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SheetSlot {
    #[serde(flatten)]
    pub slot: Slot,
    pub selected: bool,
}

/// A fully-resolved sheet: the card repeated over the selected slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPreview {
    pub card: CardPreview,
    pub sheet: SheetGeometry,
    pub slots: Vec<SheetSlot>,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build a card-only preview. Pure; no slot layout involved, bleed and
/// safe-area guides still honored.
pub fn build_card_preview(
    payload: &DesignPayload,
    card: CardFormatSummary,
    context: HashMap<String, String>,
    guides: GuideParams,
) -> CardPreview {
    let elements = resolve_elements(payload, &context);
    CardPreview {
        card,
        guides,
        context,
        elements,
    }
}

/// Build a sheet preview from a resolved card and an optional paper
/// profile geometry.
///
/// Fails with [`CoreError::MissingPaperProfile`] when no geometry is
/// supplied (neither the version's default profile nor an override
/// resolved). Slot positions come from [`compute_slots`]; the selection
/// is normalized and applied as per-slot `selected` flags.
pub fn build_sheet_preview(
    card_preview: CardPreview,
    geometry: Option<SheetGeometry>,
    selection: &SlotSelection,
) -> Result<SheetPreview, CoreError> {
    let geometry = geometry.ok_or_else(|| {
        CoreError::MissingPaperProfile(
            "Sheet preview requires a paper profile; the version has no default and no override was supplied".into(),
        )
    })?;

    let slots = compute_slots(&geometry, &card_preview.card.size())?;
    let selected = selection.indices(geometry.slot_count);

    let slots = slots
        .into_iter()
        .map(|slot| SheetSlot {
            selected: selected.binary_search(&slot.index).is_ok(),
            slot,
        })
        .collect();

    Ok(SheetPreview {
        card: card_preview,
        sheet: geometry,
        slots,
    })
}

// ---------------------------------------------------------------------------
// Renderer boundary
// ---------------------------------------------------------------------------

/// External PDF rendering collaborator.
///
/// The core's contract ends at a complete, geometry-correct, fully
/// resolved description; byte generation is opaque.
#[async_trait::async_trait]
pub trait CardRenderer: Send + Sync {
    async fn render_card_pdf(&self, preview: &CardPreview) -> Result<Vec<u8>, CoreError>;
    async fn render_sheet_pdf(&self, preview: &SheetPreview) -> Result<Vec<u8>, CoreError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::normalize;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn id1_card() -> CardFormatSummary {
        CardFormatSummary {
            code: "ID-1".into(),
            width_mm: 85.6,
            height_mm: 53.98,
        }
    }

    fn jane_payload() -> DesignPayload {
        normalize(&json!({
            "elements": [{
                "type": "text", "id": "e1",
                "x_mm": 2.0, "y_mm": 2.0, "width_mm": 30.0, "height_mm": 8.0,
                "text": "{{member.full_name}}"
            }]
        }))
    }

    fn jane_context() -> HashMap<String, String> {
        HashMap::from([("member.full_name".to_string(), "Jane Doe".to_string())])
    }

    fn a4_two_by_three() -> SheetGeometry {
        SheetGeometry {
            sheet_width_mm: 297.0,
            sheet_height_mm: 210.0,
            margin_top_mm: 5.0,
            margin_bottom_mm: 5.0,
            margin_left_mm: 5.0,
            margin_right_mm: 5.0,
            horizontal_gap_mm: 3.0,
            vertical_gap_mm: 3.0,
            rows: 2,
            columns: 3,
            slot_count: 6,
        }
    }

    // -- build_card_preview --

    #[test]
    fn card_preview_resolves_elements_in_order() {
        let preview = build_card_preview(
            &jane_payload(),
            id1_card(),
            jane_context(),
            GuideParams::default(),
        );

        assert_eq!(preview.elements.len(), 1);
        assert_eq!(preview.elements[0].render_order, 0);
        assert_eq!(preview.elements[0].resolved_text.as_deref(), Some("Jane Doe"));
        assert_eq!(preview.elements[0].element.x_mm, 2.0);
    }

    #[test]
    fn card_preview_is_deterministic() {
        let build = || {
            build_card_preview(
                &jane_payload(),
                id1_card(),
                jane_context(),
                GuideParams::default(),
            )
        };
        assert_eq!(build(), build());
    }

    // -- build_sheet_preview --

    #[test]
    fn sheet_preview_without_profile_fails() {
        let card = build_card_preview(
            &jane_payload(),
            id1_card(),
            jane_context(),
            GuideParams::default(),
        );
        assert_matches!(
            build_sheet_preview(card, None, &SlotSelection::Default).unwrap_err(),
            CoreError::MissingPaperProfile(_)
        );
    }

    #[test]
    fn sheet_preview_marks_selected_slots() {
        let card = build_card_preview(
            &jane_payload(),
            id1_card(),
            jane_context(),
            GuideParams::default(),
        );
        let preview = build_sheet_preview(
            card,
            Some(a4_two_by_three()),
            &SlotSelection::Explicit(vec![0, 4]),
        )
        .unwrap();

        assert_eq!(preview.slots.len(), 6);
        let selected: Vec<u32> = preview
            .slots
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.slot.index)
            .collect();
        assert_eq!(selected, vec![0, 4]);
    }

    #[test]
    fn default_selection_selects_every_slot() {
        let card = build_card_preview(
            &jane_payload(),
            id1_card(),
            jane_context(),
            GuideParams::default(),
        );
        let preview =
            build_sheet_preview(card, Some(a4_two_by_three()), &SlotSelection::Default).unwrap();
        assert!(preview.slots.iter().all(|s| s.selected));
    }
}
