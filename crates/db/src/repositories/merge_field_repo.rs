//! Repository for the `merge_fields` registry table. Read-only.

use sqlx::PgPool;

use crate::models::merge_field::MergeField;

/// Column list for merge_fields queries.
const COLUMNS: &str = "id, key, label, description, created_at";

/// Read access to the merge field registry.
pub struct MergeFieldRepo;

impl MergeFieldRepo {
    /// List the full registry, by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<MergeField>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM merge_fields ORDER BY key");
        sqlx::query_as::<_, MergeField>(&query).fetch_all(pool).await
    }

    /// All registry keys, by key. The save-time validation gate runs
    /// against this list.
    pub async fn list_keys(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT key FROM merge_fields ORDER BY key")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(key,)| key).collect())
    }
}
