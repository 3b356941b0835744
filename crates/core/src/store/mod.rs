//! Persistence seam for pages and revisions.
//!
//! [`PageStore`] is implemented by the PostgreSQL store in `pages-db` and by
//! [`memory::MemoryPageStore`]. Implementations must make
//! [`PageStore::save_with_revision`] atomic: the page write and the revision
//! insert either both happen or neither does.

pub mod memory;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::page::{Page, PageDraft, PageUpdate};
use crate::revision::Revision;
use crate::types::DbId;

pub use memory::MemoryPageStore;

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), CoreError>;

    /// Find a page by ID.
    async fn find_page(&self, id: DbId) -> Result<Option<Page>, CoreError>;

    /// Find a page by slug.
    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, CoreError>;

    /// All pages, unordered.
    async fn list_pages(&self) -> Result<Vec<Page>, CoreError>;

    /// Persist a new page created by `editor_id`.
    async fn insert_page(&self, draft: &PageDraft, editor_id: DbId) -> Result<Page, CoreError>;

    /// Snapshot the persisted content of `page_id` into a new revision, then
    /// merge `update` onto the persisted page, in one transaction.
    ///
    /// The merge must read the page inside the same transaction that writes
    /// it, so fields `update` leaves unset are never reverted.
    ///
    /// Returns `None` without writing anything if the page does not exist.
    async fn save_with_revision(
        &self,
        page_id: DbId,
        update: &PageUpdate,
    ) -> Result<Option<(Page, Revision)>, CoreError>;

    /// Set the status label and stamp the editor. No revision is written.
    async fn update_status(
        &self,
        page_id: DbId,
        status: &str,
        editor_id: DbId,
    ) -> Result<Option<Page>, CoreError>;

    /// Delete a page. Its revisions are kept with their page reference cleared.
    /// Returns `true` if a page was deleted.
    async fn delete_page(&self, page_id: DbId) -> Result<bool, CoreError>;

    /// Find a revision by ID.
    async fn find_revision(&self, id: DbId) -> Result<Option<Revision>, CoreError>;

    /// Revisions of a page, newest first.
    async fn list_revisions(&self, page_id: DbId) -> Result<Vec<Revision>, CoreError>;
}
