//! Repository for the `page_revisions` table.
//!
//! Revisions are immutable: rows are inserted by [`PageRepo::save_with_revision`]
//! inside its transaction and never updated.
//!
//! [`PageRepo::save_with_revision`]: crate::repositories::PageRepo::save_with_revision

use pages_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::page::PageRow;
use crate::models::revision::RevisionRow;

/// Column list for page_revisions queries.
pub(crate) const COLUMNS: &str = "id, page_id, title, slug, body, keywords, description, \
    meta_tags, editor_id, summary, created_at";

/// Provides read and snapshot operations for page revisions.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Insert a snapshot of `page`'s current content.
    ///
    /// Takes a connection so the caller can run it inside a transaction.
    pub async fn create_snapshot(
        conn: &mut PgConnection,
        page: &PageRow,
        editor_id: DbId,
        summary: Option<&str>,
    ) -> Result<RevisionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_revisions
                (page_id, title, slug, body, keywords, description, meta_tags, editor_id, summary)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RevisionRow>(&query)
            .bind(page.id)
            .bind(&page.title)
            .bind(&page.slug)
            .bind(&page.body)
            .bind(&page.keywords)
            .bind(&page.description)
            .bind(&page.meta_tags)
            .bind(editor_id)
            .bind(summary)
            .fetch_one(&mut *conn)
            .await
    }

    /// Find a revision by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RevisionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_revisions WHERE id = $1");
        sqlx::query_as::<_, RevisionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all revisions of a page, newest first.
    pub async fn list_by_page(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<Vec<RevisionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_revisions
             WHERE page_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, RevisionRow>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }
}
