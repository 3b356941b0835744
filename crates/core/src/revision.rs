//! Page revision entity.
//!
//! Revisions are immutable snapshots of page content. They are written only by
//! the store, inside the same transaction that updates the page, and are never
//! modified afterwards.

use serde::Serialize;

use crate::page::{Page, PageContent, PageDraft};
use crate::status::Statuses;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Revision {
    pub id: DbId,
    /// Owning page. `None` once the page has been deleted.
    pub page_id: Option<DbId>,
    #[serde(flatten)]
    pub content: PageContent,
    /// Editor whose save produced this revision.
    pub editor_id: Option<DbId>,
    pub summary: Option<String>,
    pub created_at: Timestamp,
}

impl Revision {
    /// Whether this revision belongs to `page`.
    pub fn belongs_to(&self, page: &Page) -> bool {
        self.page_id == Some(page.id)
    }

    /// An unsaved page carrying this revision's content, in the default status.
    pub fn to_draft(&self, statuses: &Statuses) -> PageDraft {
        PageDraft {
            status: statuses.default_status().to_string(),
            content: self.content.clone(),
        }
    }
}
