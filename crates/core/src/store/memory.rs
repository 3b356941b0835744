//! In-process [`PageStore`] used by tests and by servers started without a
//! database.
//!
//! All state sits behind one async mutex and every operation holds it for its
//! whole duration, which makes the page-plus-revision write atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::page::{Page, PageDraft, PageUpdate};
use crate::revision::Revision;
use crate::store::PageStore;
use crate::types::DbId;

#[derive(Debug, Default)]
struct Tables {
    pages: BTreeMap<DbId, Page>,
    revisions: BTreeMap<DbId, Revision>,
    next_page_id: DbId,
    next_revision_id: DbId,
}

impl Tables {
    fn slug_taken(&self, slug: &str, except: Option<DbId>) -> bool {
        self.pages
            .values()
            .any(|p| p.content.slug == slug && Some(p.id) != except)
    }
}

fn slug_conflict(slug: &str) -> CoreError {
    CoreError::Conflict(format!(
        "Duplicate value violates unique constraint: uq_pages_slug ({slug})"
    ))
}

#[derive(Debug, Default)]
pub struct MemoryPageStore {
    tables: Mutex<Tables>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored revisions across all pages.
    pub async fn revision_count(&self) -> usize {
        self.tables.lock().await.revisions.len()
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn find_page(&self, id: DbId) -> Result<Option<Page>, CoreError> {
        Ok(self.tables.lock().await.pages.get(&id).cloned())
    }

    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, CoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .pages
            .values()
            .find(|p| p.content.slug == slug)
            .cloned())
    }

    async fn list_pages(&self) -> Result<Vec<Page>, CoreError> {
        Ok(self.tables.lock().await.pages.values().cloned().collect())
    }

    async fn insert_page(&self, draft: &PageDraft, editor_id: DbId) -> Result<Page, CoreError> {
        let mut tables = self.tables.lock().await;
        if tables.slug_taken(&draft.content.slug, None) {
            return Err(slug_conflict(&draft.content.slug));
        }

        tables.next_page_id += 1;
        let now = Utc::now();
        let page = Page {
            id: tables.next_page_id,
            status: draft.status.clone(),
            content: draft.content.clone(),
            created_by: Some(editor_id),
            editor_id: Some(editor_id),
            created_at: now,
            updated_at: now,
        };
        tables.pages.insert(page.id, page.clone());
        Ok(page)
    }

    async fn save_with_revision(
        &self,
        page_id: DbId,
        update: &PageUpdate,
    ) -> Result<Option<(Page, Revision)>, CoreError> {
        let mut tables = self.tables.lock().await;
        let Some(current) = tables.pages.get(&page_id).cloned() else {
            return Ok(None);
        };
        let (status, content) = update.merge(&current);
        if tables.slug_taken(&content.slug, Some(page_id)) {
            return Err(slug_conflict(&content.slug));
        }

        let now = Utc::now();
        tables.next_revision_id += 1;
        let revision = Revision {
            id: tables.next_revision_id,
            page_id: Some(page_id),
            content: current.content.clone(),
            editor_id: Some(update.editor_id),
            summary: update.summary.clone(),
            created_at: now,
        };

        let page = Page {
            status,
            content,
            editor_id: Some(update.editor_id),
            updated_at: now,
            ..current
        };

        tables.revisions.insert(revision.id, revision.clone());
        tables.pages.insert(page_id, page.clone());
        Ok(Some((page, revision)))
    }

    async fn update_status(
        &self,
        page_id: DbId,
        status: &str,
        editor_id: DbId,
    ) -> Result<Option<Page>, CoreError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.pages.get_mut(&page_id).map(|page| {
            page.status = status.to_string();
            page.editor_id = Some(editor_id);
            page.updated_at = Utc::now();
            page.clone()
        }))
    }

    async fn delete_page(&self, page_id: DbId) -> Result<bool, CoreError> {
        let mut tables = self.tables.lock().await;
        if tables.pages.remove(&page_id).is_none() {
            return Ok(false);
        }
        for revision in tables.revisions.values_mut() {
            if revision.page_id == Some(page_id) {
                revision.page_id = None;
            }
        }
        Ok(true)
    }

    async fn find_revision(&self, id: DbId) -> Result<Option<Revision>, CoreError> {
        Ok(self.tables.lock().await.revisions.get(&id).cloned())
    }

    async fn list_revisions(&self, page_id: DbId) -> Result<Vec<Revision>, CoreError> {
        let tables = self.tables.lock().await;
        // Ids grow with time, so reverse id order is newest first.
        Ok(tables
            .revisions
            .values()
            .rev()
            .filter(|r| r.page_id == Some(page_id))
            .cloned()
            .collect())
    }
}
