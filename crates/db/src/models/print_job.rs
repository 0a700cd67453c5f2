//! Print job models and DTOs.
//!
//! A print job materializes N cards from a published version against a
//! paper profile and a slot selection. The core produces the resolved
//! per-slot data; execution and rendering happen in an external worker,
//! which reports back through the status transitions here.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use carddesk_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Print job lifecycle statuses.
pub mod job_status {
    pub const CREATED: &str = "created";
    pub const QUEUED: &str = "queued";
    pub const RUNNING: &str = "running";
    pub const SUCCEEDED: &str = "succeeded";
    pub const FAILED: &str = "failed";
    pub const CANCELLED: &str = "cancelled";

    pub const ALL: &[&str] = &[CREATED, QUEUED, RUNNING, SUCCEEDED, FAILED, CANCELLED];

    /// Statuses a job can still be cancelled from.
    pub const CANCELLABLE: &[&str] = &[CREATED, QUEUED, RUNNING];
}

/// Per-card item statuses.
pub mod item_status {
    pub const PENDING: &str = "pending";
    pub const PRINTED: &str = "printed";
    pub const FAILED: &str = "failed";

    pub const ALL: &[&str] = &[PENDING, PRINTED, FAILED];
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A print job row from the `print_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: DbId,
    pub template_version_id: DbId,
    pub paper_profile_id: DbId,
    pub status: String,
    /// Selected slot indices, normalized (sorted, unique, in range).
    pub slot_indices: Vec<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A print job item row from the `print_job_items` table: one card.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PrintJobItem {
    pub id: DbId,
    pub print_job_id: DbId,
    pub member_id: DbId,
    pub license_id: Option<DbId>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// One requested card in a create-job call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrintJobItem {
    pub member_id: DbId,
    pub license_id: Option<DbId>,
}

/// Input for creating a print job.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrintJob {
    pub template_version_id: DbId,
    pub paper_profile_id: DbId,
    /// Raw selection from the caller; normalized before storage.
    pub slot_indices: Vec<i64>,
    pub items: Vec<CreatePrintJobItem>,
}
