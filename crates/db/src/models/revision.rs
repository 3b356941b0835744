//! Row model for the `page_revisions` table.

use pages_core::page::PageContent;
use pages_core::revision::Revision;
use pages_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `page_revisions` table.
#[derive(Debug, Clone, FromRow)]
pub struct RevisionRow {
    pub id: DbId,
    pub page_id: Option<DbId>,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub keywords: String,
    pub description: String,
    pub meta_tags: String,
    pub editor_id: Option<DbId>,
    pub summary: Option<String>,
    pub created_at: Timestamp,
}

impl From<RevisionRow> for Revision {
    fn from(row: RevisionRow) -> Self {
        Revision {
            id: row.id,
            page_id: row.page_id,
            content: PageContent {
                title: row.title,
                slug: row.slug,
                body: row.body,
                keywords: row.keywords,
                description: row.description,
                meta_tags: row.meta_tags,
            },
            editor_id: row.editor_id,
            summary: row.summary,
            created_at: row.created_at,
        }
    }
}
