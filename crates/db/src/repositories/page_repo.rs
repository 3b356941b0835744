//! Repository for the `pages` table.
//!
//! Content updates go through [`PageRepo::save_with_revision`], which writes
//! the page and its pre-update revision in one transaction.

use pages_core::page::{Page, PageDraft, PageUpdate};
use pages_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::PageRow;
use crate::models::revision::RevisionRow;
use crate::repositories::revision_repo::RevisionRepo;

/// Column list for pages queries.
const COLUMNS: &str = "id, status, title, slug, body, keywords, description, meta_tags, \
    created_by, editor_id, created_at, updated_at";

/// Provides CRUD operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page owned by `editor_id`.
    pub async fn create(
        pool: &PgPool,
        draft: &PageDraft,
        editor_id: DbId,
    ) -> Result<PageRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages
                (status, title, slug, body, keywords, description, meta_tags, created_by, editor_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(&draft.status)
            .bind(&draft.content.title)
            .bind(&draft.content.slug)
            .bind(&draft.content.body)
            .bind(&draft.content.keywords)
            .bind(&draft.content.description)
            .bind(&draft.content.meta_tags)
            .bind(editor_id)
            .fetch_one(pool)
            .await
    }

    /// Find a page by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, PageRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a page by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1");
        sqlx::query_as::<_, PageRow>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all pages, most recently updated first.
    pub async fn list(pool: &PgPool) -> Result<Vec<PageRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages ORDER BY updated_at DESC, id DESC");
        sqlx::query_as::<_, PageRow>(&query).fetch_all(pool).await
    }

    /// Snapshot the stored content of a page into `page_revisions`, then
    /// merge `update` onto the locked row, atomically.
    ///
    /// The page row is locked for the duration of the transaction so
    /// concurrent writes to the same page serialize, each snapshot holds the
    /// state its own update replaced, and columns `update` leaves unset keep
    /// their stored values. Returns `None` if the page does not exist;
    /// nothing is written in that case.
    pub async fn save_with_revision(
        pool: &PgPool,
        page_id: DbId,
        update: &PageUpdate,
    ) -> Result<Option<(PageRow, RevisionRow)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let lock_query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, PageRow>(&lock_query)
            .bind(page_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let (status, content) = update.merge(&Page::from(current.clone()));

        let revision = RevisionRepo::create_snapshot(
            &mut *tx,
            &current,
            update.editor_id,
            update.summary.as_deref(),
        )
        .await?;

        let update_query = format!(
            "UPDATE pages SET
                status = $1,
                title = $2,
                slug = $3,
                body = $4,
                keywords = $5,
                description = $6,
                meta_tags = $7,
                editor_id = $8,
                updated_at = now()
             WHERE id = $9
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, PageRow>(&update_query)
            .bind(&status)
            .bind(&content.title)
            .bind(&content.slug)
            .bind(&content.body)
            .bind(&content.keywords)
            .bind(&content.description)
            .bind(&content.meta_tags)
            .bind(update.editor_id)
            .bind(page_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((page, revision)))
    }

    /// Set a page's status and stamp the editor.
    pub async fn update_status(
        pool: &PgPool,
        page_id: DbId,
        status: &str,
        editor_id: DbId,
    ) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET status = $1, editor_id = $2, updated_at = now()
             WHERE id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(status)
            .bind(editor_id)
            .bind(page_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a page. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, page_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(page_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
