//! Merge field registry model.
//!
//! Read-only at runtime; rows are seeded by migration and changed only
//! through registry updates, never by template editing.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use carddesk_core::merge::MergeFieldDef;
use carddesk_core::types::{DbId, Timestamp};

/// A merge field row from the `merge_fields` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MergeField {
    pub id: DbId,
    /// Dotted namespaced key, e.g. `member.full_name`.
    pub key: String,
    pub label: String,
    pub description: String,
    pub created_at: Timestamp,
}

impl MergeField {
    pub fn def(&self) -> MergeFieldDef {
        MergeFieldDef {
            key: self.key.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
        }
    }
}
