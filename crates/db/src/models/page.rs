//! Row model for the `pages` table.

use pages_core::page::{Page, PageContent};
use pages_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow)]
pub struct PageRow {
    pub id: DbId,
    pub status: String,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub keywords: String,
    pub description: String,
    pub meta_tags: String,
    pub created_by: Option<DbId>,
    pub editor_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Page {
            id: row.id,
            status: row.status,
            content: PageContent {
                title: row.title,
                slug: row.slug,
                body: row.body,
                keywords: row.keywords,
                description: row.description,
                meta_tags: row.meta_tags,
            },
            created_by: row.created_by,
            editor_id: row.editor_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
