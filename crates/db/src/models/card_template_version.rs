//! Card template version models and DTOs.
//!
//! The versioned unit of design. `version_number` is allocated by the
//! repository as `MAX(version_number) + 1` per template; `status` is the
//! text form of [`VersionStatus`] and the publish transition is a guarded
//! atomic update (see `CardTemplateVersionRepo::publish`).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use carddesk_core::types::{DbId, Timestamp};
use carddesk_core::versioning::{VersionRef, VersionStatus};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A version row from the `card_template_versions` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CardTemplateVersion {
    pub id: DbId,
    pub template_id: DbId,
    pub version_number: i32,
    /// `draft` or `published`.
    pub status: String,
    pub card_format_id: DbId,
    pub paper_profile_id: Option<DbId>,
    pub design_payload: serde_json::Value,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CardTemplateVersion {
    /// Parsed lifecycle status. Rows can only hold the two known values
    /// (CHECK constraint), so unknown text maps to `Draft` defensively.
    pub fn parsed_status(&self) -> VersionStatus {
        VersionStatus::parse(&self.status).unwrap_or(VersionStatus::Draft)
    }

    /// The slice the core state machine operates on.
    pub fn version_ref(&self) -> VersionRef {
        VersionRef {
            id: self.id,
            version_number: self.version_number,
            status: self.parsed_status(),
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a new draft version.
///
/// `base_version_id` clones an existing version's payload (the only way
/// to "edit" a published design); otherwise `design_payload` seeds the
/// draft, defaulting to an empty design.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateVersion {
    pub card_format_id: DbId,
    pub paper_profile_id: Option<DbId>,
    pub base_version_id: Option<DbId>,
    pub design_payload: Option<serde_json::Value>,
}

/// Payload patch for a draft version.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDraftPayload {
    pub design_payload: serde_json::Value,
}

/// Query parameters for active-version selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveVersionQuery {
    pub preferred_id: Option<DbId>,
    pub previous_id: Option<DbId>,
}
