//! Card template models and DTOs.
//!
//! A template is a named design family owning an ordered set of
//! versions. At most one template is the system-wide default, enforced
//! by a partial unique index on `is_default`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use carddesk_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A card template row from the `card_templates` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CardTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a card template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardTemplate {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update for a card template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCardTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
