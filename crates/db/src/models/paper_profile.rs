//! Paper profile models and DTOs.
//!
//! A paper profile binds a sheet layout (size, margins, gaps, grid) to
//! exactly one card format. Its geometry is validated against the card
//! format with `carddesk_core::sheet::compute_slots` at save time; a
//! profile that does not fit its declared sheet is never persisted.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use carddesk_core::sheet::SheetGeometry;
use carddesk_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A paper profile row from the `paper_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaperProfile {
    pub id: DbId,
    pub card_format_id: DbId,
    pub name: String,
    pub sheet_width_mm: f64,
    pub sheet_height_mm: f64,
    pub margin_top_mm: f64,
    pub margin_bottom_mm: f64,
    pub margin_left_mm: f64,
    pub margin_right_mm: f64,
    pub horizontal_gap_mm: f64,
    pub vertical_gap_mm: f64,
    pub grid_rows: i32,
    pub grid_columns: i32,
    pub slot_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaperProfile {
    /// The profile's geometry in core terms.
    ///
    /// Negative grid values cannot reach storage (checked at save time),
    /// so the casts saturate at zero defensively rather than wrap.
    pub fn geometry(&self) -> SheetGeometry {
        SheetGeometry {
            sheet_width_mm: self.sheet_width_mm,
            sheet_height_mm: self.sheet_height_mm,
            margin_top_mm: self.margin_top_mm,
            margin_bottom_mm: self.margin_bottom_mm,
            margin_left_mm: self.margin_left_mm,
            margin_right_mm: self.margin_right_mm,
            horizontal_gap_mm: self.horizontal_gap_mm,
            vertical_gap_mm: self.vertical_gap_mm,
            rows: self.grid_rows.max(0) as u32,
            columns: self.grid_columns.max(0) as u32,
            slot_count: self.slot_count.max(0) as u32,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a paper profile.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaperProfile {
    pub card_format_id: DbId,
    pub name: String,
    pub sheet_width_mm: f64,
    pub sheet_height_mm: f64,
    pub margin_top_mm: f64,
    pub margin_bottom_mm: f64,
    pub margin_left_mm: f64,
    pub margin_right_mm: f64,
    pub horizontal_gap_mm: f64,
    pub vertical_gap_mm: f64,
    pub grid_rows: i32,
    pub grid_columns: i32,
    pub slot_count: i32,
}

impl CreatePaperProfile {
    pub fn geometry(&self) -> SheetGeometry {
        SheetGeometry {
            sheet_width_mm: self.sheet_width_mm,
            sheet_height_mm: self.sheet_height_mm,
            margin_top_mm: self.margin_top_mm,
            margin_bottom_mm: self.margin_bottom_mm,
            margin_left_mm: self.margin_left_mm,
            margin_right_mm: self.margin_right_mm,
            horizontal_gap_mm: self.horizontal_gap_mm,
            vertical_gap_mm: self.vertical_gap_mm,
            rows: self.grid_rows.max(0) as u32,
            columns: self.grid_columns.max(0) as u32,
            slot_count: self.slot_count.max(0) as u32,
        }
    }
}

/// Partial update for a paper profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePaperProfile {
    pub name: Option<String>,
    pub sheet_width_mm: Option<f64>,
    pub sheet_height_mm: Option<f64>,
    pub margin_top_mm: Option<f64>,
    pub margin_bottom_mm: Option<f64>,
    pub margin_left_mm: Option<f64>,
    pub margin_right_mm: Option<f64>,
    pub horizontal_gap_mm: Option<f64>,
    pub vertical_gap_mm: Option<f64>,
    pub grid_rows: Option<i32>,
    pub grid_columns: Option<i32>,
    pub slot_count: Option<i32>,
}
