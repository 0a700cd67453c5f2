//! Repository for the `card_template_versions` table.
//!
//! Version numbers are allocated inside the INSERT as
//! `COALESCE(MAX(version_number), 0) + 1`, so creation order and version
//! order coincide even under concurrent creation (serialized by the
//! per-template unique index). Publish and draft updates are guarded by
//! `WHERE status = 'draft'`, making published rows immutable at the SQL
//! level: a concurrent second publish simply matches zero rows.

use sqlx::PgPool;

use carddesk_core::types::DbId;

use crate::models::card_template_version::{CardTemplateVersion, CreateTemplateVersion};

/// Column list for card_template_versions queries.
const COLUMNS: &str = "id, template_id, version_number, status, card_format_id, \
    paper_profile_id, design_payload, published_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for template versions.
pub struct CardTemplateVersionRepo;

impl CardTemplateVersionRepo {
    /// Insert a new draft version, auto-incrementing the version number
    /// per template.
    pub async fn create(
        pool: &PgPool,
        template_id: DbId,
        input: &CreateTemplateVersion,
        design_payload: &serde_json::Value,
    ) -> Result<CardTemplateVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO card_template_versions
                (template_id, version_number, status, card_format_id,
                 paper_profile_id, design_payload)
             VALUES (
                 $1,
                 COALESCE(
                     (SELECT MAX(version_number) FROM card_template_versions
                      WHERE template_id = $1),
                     0
                 ) + 1,
                 'draft', $2, $3, $4
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardTemplateVersion>(&query)
            .bind(template_id)
            .bind(input.card_format_id)
            .bind(input.paper_profile_id)
            .bind(design_payload)
            .fetch_one(pool)
            .await
    }

    /// Find a version by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CardTemplateVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM card_template_versions WHERE id = $1");
        sqlx::query_as::<_, CardTemplateVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List versions for a template, newest first.
    pub async fn list_for_template(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<CardTemplateVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM card_template_versions
             WHERE template_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, CardTemplateVersion>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a draft's design payload. Matches zero rows when the
    /// version is not (or no longer) a draft; the handler turns that
    /// into an `InvalidState` error after re-checking the row exists.
    pub async fn update_draft_payload(
        pool: &PgPool,
        id: DbId,
        design_payload: &serde_json::Value,
    ) -> Result<Option<CardTemplateVersion>, sqlx::Error> {
        let query = format!(
            "UPDATE card_template_versions SET
                 design_payload = $2,
                 updated_at = NOW()
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardTemplateVersion>(&query)
            .bind(id)
            .bind(design_payload)
            .fetch_optional(pool)
            .await
    }

    /// Update a draft's paper profile binding.
    pub async fn update_draft_paper_profile(
        pool: &PgPool,
        id: DbId,
        paper_profile_id: Option<DbId>,
    ) -> Result<Option<CardTemplateVersion>, sqlx::Error> {
        let query = format!(
            "UPDATE card_template_versions SET
                 paper_profile_id = $2,
                 updated_at = NOW()
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardTemplateVersion>(&query)
            .bind(id)
            .bind(paper_profile_id)
            .fetch_optional(pool)
            .await
    }

    /// Atomic status-check-and-set publish. Exactly one of any number of
    /// concurrent publishes for the same id can match the `status =
    /// 'draft'` predicate; the others observe `None`.
    pub async fn publish(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CardTemplateVersion>, sqlx::Error> {
        let query = format!(
            "UPDATE card_template_versions SET
                 status = 'published',
                 published_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardTemplateVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
