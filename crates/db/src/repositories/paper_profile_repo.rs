//! Repository for the `paper_profiles` table.
//!
//! Geometry validation (does the declared grid fit the sheet?) happens
//! in the handler via `carddesk_core::sheet::compute_slots` before the
//! insert/update here; only fitting profiles reach storage.

use sqlx::PgPool;

use carddesk_core::types::DbId;

use crate::models::paper_profile::{CreatePaperProfile, PaperProfile, UpdatePaperProfile};

/// Column list for paper_profiles queries.
const COLUMNS: &str = "id, card_format_id, name, sheet_width_mm, sheet_height_mm, \
    margin_top_mm, margin_bottom_mm, margin_left_mm, margin_right_mm, \
    horizontal_gap_mm, vertical_gap_mm, grid_rows, grid_columns, slot_count, \
    created_at, updated_at";

/// Provides CRUD operations for paper profiles.
pub struct PaperProfileRepo;

impl PaperProfileRepo {
    /// Insert a new paper profile.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePaperProfile,
    ) -> Result<PaperProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO paper_profiles
                (card_format_id, name, sheet_width_mm, sheet_height_mm,
                 margin_top_mm, margin_bottom_mm, margin_left_mm, margin_right_mm,
                 horizontal_gap_mm, vertical_gap_mm, grid_rows, grid_columns, slot_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaperProfile>(&query)
            .bind(input.card_format_id)
            .bind(&input.name)
            .bind(input.sheet_width_mm)
            .bind(input.sheet_height_mm)
            .bind(input.margin_top_mm)
            .bind(input.margin_bottom_mm)
            .bind(input.margin_left_mm)
            .bind(input.margin_right_mm)
            .bind(input.horizontal_gap_mm)
            .bind(input.vertical_gap_mm)
            .bind(input.grid_rows)
            .bind(input.grid_columns)
            .bind(input.slot_count)
            .fetch_one(pool)
            .await
    }

    /// Find a paper profile by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PaperProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM paper_profiles WHERE id = $1");
        sqlx::query_as::<_, PaperProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all paper profiles, by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<PaperProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM paper_profiles ORDER BY name");
        sqlx::query_as::<_, PaperProfile>(&query).fetch_all(pool).await
    }

    /// List paper profiles bound to a card format, by name.
    pub async fn list_for_card_format(
        pool: &PgPool,
        card_format_id: DbId,
    ) -> Result<Vec<PaperProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM paper_profiles
             WHERE card_format_id = $1
             ORDER BY name"
        );
        sqlx::query_as::<_, PaperProfile>(&query)
            .bind(card_format_id)
            .fetch_all(pool)
            .await
    }

    /// First profile matching a card format, used as the fallback when a
    /// version is created without an explicit profile.
    pub async fn find_first_for_card_format(
        pool: &PgPool,
        card_format_id: DbId,
    ) -> Result<Option<PaperProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM paper_profiles
             WHERE card_format_id = $1
             ORDER BY id
             LIMIT 1"
        );
        sqlx::query_as::<_, PaperProfile>(&query)
            .bind(card_format_id)
            .fetch_optional(pool)
            .await
    }

    /// Partially update a paper profile. The bound card format is fixed
    /// at creation; rebinding means creating a new profile.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePaperProfile,
    ) -> Result<Option<PaperProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE paper_profiles SET
                 name = COALESCE($2, name),
                 sheet_width_mm = COALESCE($3, sheet_width_mm),
                 sheet_height_mm = COALESCE($4, sheet_height_mm),
                 margin_top_mm = COALESCE($5, margin_top_mm),
                 margin_bottom_mm = COALESCE($6, margin_bottom_mm),
                 margin_left_mm = COALESCE($7, margin_left_mm),
                 margin_right_mm = COALESCE($8, margin_right_mm),
                 horizontal_gap_mm = COALESCE($9, horizontal_gap_mm),
                 vertical_gap_mm = COALESCE($10, vertical_gap_mm),
                 grid_rows = COALESCE($11, grid_rows),
                 grid_columns = COALESCE($12, grid_columns),
                 slot_count = COALESCE($13, slot_count),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaperProfile>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.sheet_width_mm)
            .bind(input.sheet_height_mm)
            .bind(input.margin_top_mm)
            .bind(input.margin_bottom_mm)
            .bind(input.margin_left_mm)
            .bind(input.margin_right_mm)
            .bind(input.horizontal_gap_mm)
            .bind(input.vertical_gap_mm)
            .bind(input.grid_rows)
            .bind(input.grid_columns)
            .bind(input.slot_count)
            .fetch_optional(pool)
            .await
    }

    /// Delete a paper profile. Fails with a foreign-key violation when a
    /// version still references it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM paper_profiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
