//! Repository for the `print_jobs` and `print_job_items` tables.

use sqlx::PgPool;

use carddesk_core::types::DbId;

use crate::models::print_job::{job_status, CreatePrintJobItem, PrintJob, PrintJobItem};

/// Column list for print_jobs queries.
const JOB_COLUMNS: &str = "id, template_version_id, paper_profile_id, status, \
    slot_indices, created_at, updated_at";

/// Column list for print_job_items queries.
const ITEM_COLUMNS: &str = "id, print_job_id, member_id, license_id, status, \
    error_message, created_at, updated_at";

/// Provides CRUD and status transitions for print jobs.
pub struct PrintJobRepo;

impl PrintJobRepo {
    /// Insert a job and its items in one transaction. `slot_indices`
    /// must already be normalized by the caller.
    pub async fn create(
        pool: &PgPool,
        template_version_id: DbId,
        paper_profile_id: DbId,
        slot_indices: &[i32],
        items: &[CreatePrintJobItem],
    ) -> Result<PrintJob, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO print_jobs
                (template_version_id, paper_profile_id, status, slot_indices)
             VALUES ($1, $2, 'created', $3)
             RETURNING {JOB_COLUMNS}"
        );
        let job = sqlx::query_as::<_, PrintJob>(&query)
            .bind(template_version_id)
            .bind(paper_profile_id)
            .bind(slot_indices)
            .fetch_one(&mut *tx)
            .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO print_job_items (print_job_id, member_id, license_id, status)
                 VALUES ($1, $2, $3, 'pending')",
            )
            .bind(job.id)
            .bind(item.member_id)
            .bind(item.license_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(job)
    }

    /// Find a print job by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PrintJob>, sqlx::Error> {
        let query = format!("SELECT {JOB_COLUMNS} FROM print_jobs WHERE id = $1");
        sqlx::query_as::<_, PrintJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List print jobs, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<PrintJob>, sqlx::Error> {
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM print_jobs
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, PrintJob>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Items of a job, in insertion order.
    pub async fn list_items(pool: &PgPool, job_id: DbId) -> Result<Vec<PrintJobItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM print_job_items
             WHERE print_job_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, PrintJobItem>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// Move a job to a new status. The caller validates the transition.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<PrintJob>, sqlx::Error> {
        let query = format!(
            "UPDATE print_jobs SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, PrintJob>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Cancel a job if it has not finished. Matches zero rows when the
    /// job is already in a terminal state.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<PrintJob>, sqlx::Error> {
        let query = format!(
            "UPDATE print_jobs SET status = 'cancelled', updated_at = NOW()
             WHERE id = $1 AND status = ANY($2)
             RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, PrintJob>(&query)
            .bind(id)
            .bind(job_status::CANCELLABLE)
            .fetch_optional(pool)
            .await
    }

    /// Report one card's outcome, as observed by the external renderer.
    /// Scoped to the owning job so an item addressed through the wrong
    /// job matches zero rows instead of mutating a foreign item.
    pub async fn update_item_status(
        pool: &PgPool,
        job_id: DbId,
        item_id: DbId,
        status: &str,
        error_message: Option<&str>,
    ) -> Result<Option<PrintJobItem>, sqlx::Error> {
        let query = format!(
            "UPDATE print_job_items SET
                 status = $3,
                 error_message = $4,
                 updated_at = NOW()
             WHERE id = $1 AND print_job_id = $2
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, PrintJobItem>(&query)
            .bind(item_id)
            .bind(job_id)
            .bind(status)
            .bind(error_message)
            .fetch_optional(pool)
            .await
    }
}
