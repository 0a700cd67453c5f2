//! Card format models and DTOs.
//!
//! A card format is the physical card size (e.g. ID-1, 85.6 x 53.98 mm).
//! Formats referenced by a published version are immutable by convention;
//! administrators deactivate rather than delete formats in use.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use carddesk_core::preview::CardFormatSummary;
use carddesk_core::sheet::CardSize;
use carddesk_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A card format row from the `card_formats` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CardFormat {
    pub id: DbId,
    /// Short identifier, e.g. `ID-1`.
    pub code: String,
    pub width_mm: f64,
    pub height_mm: f64,
    pub is_custom: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CardFormat {
    pub fn size(&self) -> CardSize {
        CardSize {
            width_mm: self.width_mm,
            height_mm: self.height_mm,
        }
    }

    pub fn summary(&self) -> CardFormatSummary {
        CardFormatSummary {
            code: self.code.clone(),
            width_mm: self.width_mm,
            height_mm: self.height_mm,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a card format.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardFormat {
    pub code: String,
    pub width_mm: f64,
    pub height_mm: f64,
    #[serde(default)]
    pub is_custom: bool,
}

/// Partial update for a card format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCardFormat {
    pub code: Option<String>,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub is_custom: Option<bool>,
    pub is_active: Option<bool>,
}
