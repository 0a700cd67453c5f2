//! Paper profile slot layout engine.
//!
//! Pure geometry: given a sheet's size, margins, gaps, and grid, tile
//! card-sized slots across the sheet in row-major order and decide which
//! slots a print run uses. A profile whose declared grid does not fit its
//! sheet is a configuration error and is rejected when the profile is
//! saved, not at render time.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::round_mm;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Sheet geometry of a paper profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetGeometry {
    pub sheet_width_mm: f64,
    pub sheet_height_mm: f64,
    pub margin_top_mm: f64,
    pub margin_bottom_mm: f64,
    pub margin_left_mm: f64,
    pub margin_right_mm: f64,
    pub horizontal_gap_mm: f64,
    pub vertical_gap_mm: f64,
    pub rows: u32,
    pub columns: u32,
    /// Declared slot count; must equal `rows * columns` exactly.
    pub slot_count: u32,
}

/// Physical card dimensions from the card format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// One card-sized position on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slot {
    /// Row-major index: `row * columns + column`.
    pub index: u32,
    pub row: u32,
    pub column: u32,
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Compute the position of every printable slot on the sheet.
///
/// `x = margin_left + col * (card_w + h_gap)`, analogous vertically.
/// Fails with [`CoreError::Configuration`] when the declared `slot_count`
/// disagrees with `rows * columns` or when any slot's far edge crosses
/// the opposite margin.
pub fn compute_slots(geometry: &SheetGeometry, card: &CardSize) -> Result<Vec<Slot>, CoreError> {
    // rows and columns arrive from the wire unchecked.
    let expected = geometry
        .rows
        .checked_mul(geometry.columns)
        .ok_or_else(|| {
            CoreError::Configuration(format!(
                "Grid of {} x {} slots is not representable",
                geometry.rows, geometry.columns
            ))
        })?;
    if geometry.slot_count != expected {
        return Err(CoreError::Configuration(format!(
            "slot_count {} does not match rows x columns = {}",
            geometry.slot_count, expected
        )));
    }

    let max_x = geometry.sheet_width_mm - geometry.margin_right_mm;
    let max_y = geometry.sheet_height_mm - geometry.margin_bottom_mm;

    let mut slots = Vec::with_capacity(expected as usize);
    for row in 0..geometry.rows {
        for column in 0..geometry.columns {
            let x = geometry.margin_left_mm
                + f64::from(column) * (card.width_mm + geometry.horizontal_gap_mm);
            let y = geometry.margin_top_mm
                + f64::from(row) * (card.height_mm + geometry.vertical_gap_mm);

            // Round before the bound check so stored and checked
            // coordinates agree.
            let x = round_mm(x);
            let y = round_mm(y);

            if round_mm(x + card.width_mm) > max_x || round_mm(y + card.height_mm) > max_y {
                return Err(CoreError::Configuration(format!(
                    "Slot {} at ({x}, {y}) does not fit the {}x{} sheet within its margins",
                    row * geometry.columns + column,
                    geometry.sheet_width_mm,
                    geometry.sheet_height_mm
                )));
            }

            slots.push(Slot {
                index: row * geometry.columns + column,
                row,
                column,
                x_mm: x,
                y_mm: y,
                width_mm: card.width_mm,
                height_mm: card.height_mm,
            });
        }
    }
    Ok(slots)
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Which slots a print run uses.
///
/// `Default` (caller has made no choice yet) expands to all slots and is
/// distinct from `Explicit(vec![])`, which means the user deliberately
/// selected none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "indices")]
pub enum SlotSelection {
    Default,
    Explicit(Vec<i64>),
}

impl SlotSelection {
    /// Materialize the selection against a slot count.
    pub fn indices(&self, slot_count: u32) -> Vec<u32> {
        match self {
            Self::Default => default_selection(slot_count),
            Self::Explicit(indices) => normalize_slot_selection(indices, slot_count),
        }
    }
}

/// Filter a raw selection to valid indices in `[0, slot_count)`,
/// de-duplicated, ascending. Raw input is `i64` because it arrives from
/// the wire and may contain negatives. No valid slots yields an empty
/// selection, never an implicit select-all.
pub fn normalize_slot_selection(selected: &[i64], slot_count: u32) -> Vec<u32> {
    let mut indices: Vec<u32> = selected
        .iter()
        .copied()
        .filter(|&i| i >= 0 && i < i64::from(slot_count))
        .map(|i| i as u32)
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// All slot indices, used while the caller has not chosen yet.
pub fn default_selection(slot_count: u32) -> Vec<u32> {
    (0..slot_count).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// 2x3 grid of ID-1 cards on a sheet with 5mm margins and 3mm gaps.
    fn two_by_three() -> (SheetGeometry, CardSize) {
        (
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
            },
            CardSize {
                width_mm: 85.6,
                height_mm: 53.98,
            },
        )
    }

    // -- compute_slots --

    #[test]
    fn tiles_row_major_with_gaps() {
        let (geometry, card) = two_by_three();
        let slots = compute_slots(&geometry, &card).unwrap();

        assert_eq!(slots.len(), 6);
        assert_eq!((slots[0].x_mm, slots[0].y_mm), (5.0, 5.0));
        // 5 + 85.6 + 3
        assert_eq!((slots[1].x_mm, slots[1].y_mm), (93.6, 5.0));
        // 5 + 53.98 + 3
        assert_eq!((slots[3].x_mm, slots[3].y_mm), (5.0, 61.98));
        assert_eq!(slots[5].index, 5);
        assert_eq!((slots[5].row, slots[5].column), (1, 2));
    }

    #[test]
    fn every_slot_respects_opposite_margins() {
        let (geometry, card) = two_by_three();
        let slots = compute_slots(&geometry, &card).unwrap();

        for slot in slots {
            assert!(slot.x_mm + slot.width_mm <= geometry.sheet_width_mm - geometry.margin_right_mm);
            assert!(slot.y_mm + slot.height_mm <= geometry.sheet_height_mm - geometry.margin_bottom_mm);
        }
    }

    #[test]
    fn oversized_grid_is_configuration_error_not_overflow() {
        let (mut geometry, card) = two_by_three();
        geometry.rows = 65_536;
        geometry.columns = 65_536;
        geometry.slot_count = 0;
        assert_matches!(
            compute_slots(&geometry, &card).unwrap_err(),
            CoreError::Configuration(_)
        );
    }

    #[test]
    fn slot_count_mismatch_is_configuration_error() {
        let (mut geometry, card) = two_by_three();
        geometry.slot_count = 5;
        assert_matches!(
            compute_slots(&geometry, &card).unwrap_err(),
            CoreError::Configuration(_)
        );
    }

    #[test]
    fn grid_overflowing_sheet_is_configuration_error() {
        let (mut geometry, card) = two_by_three();
        geometry.columns = 4;
        geometry.slot_count = 8;
        assert_matches!(
            compute_slots(&geometry, &card).unwrap_err(),
            CoreError::Configuration(_)
        );
    }

    // -- selection --

    #[test]
    fn selection_is_filtered_deduped_sorted() {
        // -1, 99 and the duplicate are dropped; result ascends.
        assert_eq!(normalize_slot_selection(&[5, 2, 2, -1, 99], 6), vec![2, 5]);
    }

    #[test]
    fn empty_selection_stays_empty() {
        assert_eq!(normalize_slot_selection(&[], 6), Vec::<u32>::new());
        assert_eq!(normalize_slot_selection(&[99], 6), Vec::<u32>::new());
    }

    #[test]
    fn default_selection_is_all_indices() {
        assert_eq!(default_selection(4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn default_and_explicit_none_differ() {
        assert_eq!(SlotSelection::Default.indices(3), vec![0, 1, 2]);
        assert_eq!(SlotSelection::Explicit(vec![]).indices(3), Vec::<u32>::new());
    }
}
