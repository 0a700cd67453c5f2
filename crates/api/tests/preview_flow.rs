//! Tests for the preview orchestration pieces that need no database:
//! the renderer boundary and the card/sheet assembly semantics the
//! handlers rely on.

use std::collections::HashMap;

use assert_matches::assert_matches;
use carddesk_api::renderer::NoopRenderer;
use carddesk_core::design;
use carddesk_core::error::CoreError;
use carddesk_core::preview::{
    build_card_preview, build_sheet_preview, CardFormatSummary, CardRenderer, GuideParams,
};
use carddesk_core::sheet::{SheetGeometry, SlotSelection};
use serde_json::json;

fn id1_summary() -> CardFormatSummary {
    CardFormatSummary {
        code: "ID-1".into(),
        width_mm: 85.6,
        height_mm: 53.98,
    }
}

fn a4_two_by_three() -> SheetGeometry {
    SheetGeometry {
        sheet_width_mm: 210.0,
        sheet_height_mm: 297.0,
        margin_top_mm: 5.0,
        margin_bottom_mm: 5.0,
        margin_left_mm: 5.0,
        margin_right_mm: 5.0,
        horizontal_gap_mm: 3.0,
        vertical_gap_mm: 3.0,
        rows: 3,
        columns: 2,
        slot_count: 6,
    }
}

fn sample_payload() -> carddesk_core::design::DesignPayload {
    design::normalize(&json!({
        "elements": [
            {
                "type": "text",
                "x_mm": 5, "y_mm": 5, "width_mm": 40, "height_mm": 8,
                "text": "{{member.full_name}}",
                "merge_field": "member.full_name"
            }
        ]
    }))
}

// ---------------------------------------------------------------------------
// Test: NoopRenderer satisfies the CardRenderer contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn noop_renderer_renders_card_and_sheet() {
    let context: HashMap<String, String> =
        [("member.full_name".to_string(), "Jane Doe".to_string())].into();
    let card = build_card_preview(
        &sample_payload(),
        id1_summary(),
        context,
        GuideParams::default(),
    );

    let renderer = NoopRenderer;
    let card_pdf = renderer.render_card_pdf(&card).await.unwrap();
    assert!(card_pdf.is_empty());

    let sheet = build_sheet_preview(card, Some(a4_two_by_three()), &SlotSelection::Default).unwrap();
    let sheet_pdf = renderer.render_sheet_pdf(&sheet).await.unwrap();
    assert!(sheet_pdf.is_empty());
}

// ---------------------------------------------------------------------------
// Test: sheet preview without a resolvable profile is a typed failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sheet_preview_without_profile_is_missing_paper_profile() {
    let card = build_card_preview(
        &sample_payload(),
        id1_summary(),
        HashMap::new(),
        GuideParams::default(),
    );

    let result = build_sheet_preview(card, None, &SlotSelection::Default);

    assert_matches!(result, Err(CoreError::MissingPaperProfile(_)));
}

// ---------------------------------------------------------------------------
// Test: the card preview carries resolved text the renderer will see
// ---------------------------------------------------------------------------

#[tokio::test]
async fn card_preview_resolves_context_before_rendering() {
    let context: HashMap<String, String> =
        [("member.full_name".to_string(), "Jane Doe".to_string())].into();
    let card = build_card_preview(
        &sample_payload(),
        id1_summary(),
        context,
        GuideParams::default(),
    );

    assert_eq!(card.elements.len(), 1);
    assert_eq!(card.elements[0].resolved_text.as_deref(), Some("Jane Doe"));
}
