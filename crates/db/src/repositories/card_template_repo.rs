//! Repository for the `card_templates` table.

use sqlx::PgPool;

use carddesk_core::types::DbId;

use crate::models::card_template::{CardTemplate, CreateCardTemplate, UpdateCardTemplate};

/// Column list for card_templates queries.
const COLUMNS: &str = "id, name, description, is_default, is_active, \
    created_at, updated_at";

/// Provides CRUD operations for card templates.
pub struct CardTemplateRepo;

impl CardTemplateRepo {
    /// Insert a new card template.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCardTemplate,
    ) -> Result<CardTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO card_templates (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardTemplate>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a card template by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CardTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM card_templates WHERE id = $1");
        sqlx::query_as::<_, CardTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List card templates, default first, then by name.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<CardTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM card_templates
             WHERE ($1 = false OR is_active)
             ORDER BY is_default DESC, name"
        );
        sqlx::query_as::<_, CardTemplate>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// The system-wide default template, if one is set.
    pub async fn find_default(pool: &PgPool) -> Result<Option<CardTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM card_templates WHERE is_default LIMIT 1");
        sqlx::query_as::<_, CardTemplate>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Partially update a card template.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCardTemplate,
    ) -> Result<Option<CardTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE card_templates SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 is_active = COALESCE($4, is_active),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardTemplate>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Make a template the system-wide default, clearing any previous
    /// default in the same transaction so the partial unique index on
    /// `is_default` never sees two defaults.
    pub async fn set_default(pool: &PgPool, id: DbId) -> Result<Option<CardTemplate>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE card_templates SET is_default = false, updated_at = NOW() WHERE is_default")
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE card_templates SET is_default = true, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let template = sqlx::query_as::<_, CardTemplate>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(template)
    }
}
