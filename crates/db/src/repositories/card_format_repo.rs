//! Repository for the `card_formats` table.

use sqlx::PgPool;

use carddesk_core::types::DbId;

use crate::models::card_format::{CardFormat, CreateCardFormat, UpdateCardFormat};

/// Column list for card_formats queries.
const COLUMNS: &str = "id, code, width_mm, height_mm, is_custom, is_active, \
    created_at, updated_at";

/// Provides CRUD operations for card formats.
pub struct CardFormatRepo;

impl CardFormatRepo {
    /// Insert a new card format.
    pub async fn create(pool: &PgPool, input: &CreateCardFormat) -> Result<CardFormat, sqlx::Error> {
        let query = format!(
            "INSERT INTO card_formats (code, width_mm, height_mm, is_custom)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardFormat>(&query)
            .bind(&input.code)
            .bind(input.width_mm)
            .bind(input.height_mm)
            .bind(input.is_custom)
            .fetch_one(pool)
            .await
    }

    /// Find a card format by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CardFormat>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM card_formats WHERE id = $1");
        sqlx::query_as::<_, CardFormat>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List card formats, active first, then by code.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<CardFormat>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM card_formats
             WHERE ($1 = false OR is_active)
             ORDER BY is_active DESC, code"
        );
        sqlx::query_as::<_, CardFormat>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Partially update a card format.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCardFormat,
    ) -> Result<Option<CardFormat>, sqlx::Error> {
        let query = format!(
            "UPDATE card_formats SET
                 code = COALESCE($2, code),
                 width_mm = COALESCE($3, width_mm),
                 height_mm = COALESCE($4, height_mm),
                 is_custom = COALESCE($5, is_custom),
                 is_active = COALESCE($6, is_active),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardFormat>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(input.width_mm)
            .bind(input.height_mm)
            .bind(input.is_custom)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
