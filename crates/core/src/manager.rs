//! Revision lifecycle manager.
//!
//! Keeps page content and revision history consistent:
//!
//! - every save of a persisted page writes exactly one revision holding the
//!   content as it was *before* the save;
//! - a rollback copies a revision's content onto its page, and the pre-rollback
//!   content becomes a new revision, so the rollback can itself be undone;
//! - revisions are never modified or removed here.
//!
//! The page write and the revision insert are delegated as one unit to
//! [`PageStore::save_with_revision`], which owns the transaction.

use std::sync::Arc;

use crate::editor::Editor;
use crate::error::CoreError;
use crate::fields::PageFields;
use crate::i18n::{MSG_SLUG_NOT_GENERATED, MSG_SLUG_TAKEN};
use crate::page::{Page, PageDraft, PageUpdate};
use crate::revision::Revision;
use crate::slug::{generate_slug, validate_slug};
use crate::status::Statuses;
use crate::store::PageStore;
use crate::types::DbId;

/// Result of a save that produced a revision.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSave {
    /// The page as persisted after the save.
    pub page: Page,
    /// The snapshot of the page taken before the save.
    pub revision: Revision,
}

#[derive(Clone)]
pub struct PageManager {
    store: Arc<dyn PageStore>,
    statuses: Arc<Statuses>,
}

impl PageManager {
    pub fn new(store: Arc<dyn PageStore>, statuses: Arc<Statuses>) -> Self {
        Self { store, statuses }
    }

    pub fn store(&self) -> &dyn PageStore {
        self.store.as_ref()
    }

    pub fn statuses(&self) -> &Statuses {
        &self.statuses
    }

    /// Find a page or fail with [`CoreError::NotFound`].
    pub async fn page(&self, id: DbId) -> Result<Page, CoreError> {
        self.store
            .find_page(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Page", id })
    }

    /// Find a revision or fail with [`CoreError::NotFound`].
    pub async fn revision(&self, id: DbId) -> Result<Revision, CoreError> {
        self.store
            .find_revision(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Revision",
                id,
            })
    }

    /// Persist a new page built from `draft` with `fields` applied.
    ///
    /// A missing slug is generated from the title. No revision is written:
    /// there is no earlier state to snapshot.
    pub async fn create(
        &self,
        draft: PageDraft,
        fields: &PageFields,
        editor: &Editor,
    ) -> Result<Page, CoreError> {
        fields.check(&self.statuses)?;

        let mut draft = draft;
        fields.apply_to(&mut draft.content);
        if let Some(status) = &fields.status {
            draft.status.clone_from(status);
        }
        self.statuses.ensure(&draft.status)?;

        if draft.content.title.trim().is_empty() {
            return Err(CoreError::field("title", "Title is required."));
        }
        if draft.content.slug.is_empty() {
            draft.content.slug = generate_slug(&draft.content.title);
            if draft.content.slug.is_empty() {
                return Err(CoreError::field("slug", MSG_SLUG_NOT_GENERATED));
            }
        }
        validate_slug(&draft.content.slug)?;
        self.ensure_slug_free(&draft.content.slug, None).await?;

        self.store.insert_page(&draft, editor.id).await
    }

    /// Apply `fields` to `page`, stamp `editor` and persist, snapshotting the
    /// previous content as a new revision.
    ///
    /// Only the fields present in `fields` are written; the rest keep their
    /// stored values even if `page` is stale.
    ///
    /// Fails with a validation error, leaving the page untouched, if any
    /// field value is rejected.
    pub async fn set_fields_and_save(
        &self,
        page: &Page,
        fields: &PageFields,
        editor: &Editor,
    ) -> Result<PageSave, CoreError> {
        fields.check(&self.statuses)?;

        if let Some(slug) = &fields.slug {
            self.ensure_slug_free(slug, Some(page.id)).await?;
        }

        let update = PageUpdate {
            fields: fields.clone(),
            editor_id: editor.id,
            summary: None,
        };
        self.save(page.id, &update).await
    }

    /// An unsaved page carrying `revision`'s content. Nothing is persisted.
    pub fn create_from_revision(&self, revision: &Revision) -> PageDraft {
        revision.to_draft(&self.statuses)
    }

    /// An unsaved copy of `page`. Nothing is persisted.
    pub fn create_from_page(&self, page: &Page) -> PageDraft {
        PageDraft::from(page)
    }

    /// Restore `page` to the content held by `revision`.
    ///
    /// The content being replaced becomes a new revision. The stored status
    /// is kept. `revision` must belong to `page`; a mismatched pair is a
    /// [`CoreError::Conflict`].
    pub async fn rollback_revision(
        &self,
        page: &Page,
        revision: &Revision,
        editor: &Editor,
    ) -> Result<PageSave, CoreError> {
        if !revision.belongs_to(page) {
            return Err(CoreError::Conflict(format!(
                "Revision {} does not belong to page {}",
                revision.id, page.id
            )));
        }
        self.ensure_slug_free(&revision.content.slug, Some(page.id))
            .await?;

        let update = PageUpdate {
            fields: PageFields::replacing(&revision.content),
            editor_id: editor.id,
            summary: Some(format!("Rolled back to revision {}", revision.id)),
        };
        self.save(page.id, &update).await
    }

    /// Change the status label. Unrecognized statuses fail with
    /// [`CoreError::InvalidStatus`] before anything is written.
    pub async fn set_status(
        &self,
        page: &Page,
        status: &str,
        editor: &Editor,
    ) -> Result<Page, CoreError> {
        let mut updated = page.clone();
        updated.set_status(status, &self.statuses)?;
        self.store
            .update_status(page.id, &updated.status, editor.id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Page",
                id: page.id,
            })
    }

    /// Delete a page. Its revisions stay, detached from the page.
    pub async fn delete(&self, page: &Page) -> Result<(), CoreError> {
        if self.store.delete_page(page.id).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "Page",
                id: page.id,
            })
        }
    }

    async fn save(&self, page_id: DbId, update: &PageUpdate) -> Result<PageSave, CoreError> {
        let (page, revision) = self
            .store
            .save_with_revision(page_id, update)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Page",
                id: page_id,
            })?;
        Ok(PageSave { page, revision })
    }

    /// Reject a slug already used by a page other than `owner`.
    async fn ensure_slug_free(&self, slug: &str, owner: Option<DbId>) -> Result<(), CoreError> {
        match self.store.find_page_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(CoreError::field("slug", MSG_SLUG_TAKEN))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::page::PageContent;
    use crate::store::MemoryPageStore;

    fn setup() -> (Arc<MemoryPageStore>, PageManager) {
        let store = Arc::new(MemoryPageStore::new());
        let manager = PageManager::new(store.clone(), Arc::new(Statuses::default()));
        (store, manager)
    }

    fn editor(id: DbId) -> Editor {
        Editor::new(id, "editor")
    }

    fn fields(title: &str, body: &str) -> PageFields {
        PageFields {
            title: Some(title.into()),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    async fn created(manager: &PageManager) -> Page {
        let draft = PageDraft::new(manager.statuses());
        manager
            .create(draft, &fields("Home Page", "v1"), &editor(1))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_generates_slug_and_writes_no_revision() {
        let (store, manager) = setup();
        let page = created(&manager).await;
        assert_eq!(page.content.slug, "home-page");
        assert_eq!(page.status, "draft");
        assert_eq!(page.created_by, Some(1));
        assert_eq!(store.revision_count().await, 0);
    }

    #[tokio::test]
    async fn create_requires_title() {
        let (_, manager) = setup();
        let draft = PageDraft::new(manager.statuses());
        let only_body = PageFields {
            body: Some("text".into()),
            ..Default::default()
        };
        assert_matches!(
            manager.create(draft, &only_body, &editor(1)).await,
            Err(CoreError::FieldErrors(errors)) if errors.contains_key("title")
        );
    }

    #[tokio::test]
    async fn create_rejects_taken_slug() {
        let (_, manager) = setup();
        created(&manager).await;
        let draft = PageDraft::new(manager.statuses());
        assert_matches!(
            manager.create(draft, &fields("Home Page", "again"), &editor(1)).await,
            Err(CoreError::FieldErrors(errors)) if errors["slug"] == MSG_SLUG_TAKEN
        );
    }

    #[tokio::test]
    async fn create_without_sluggable_title_asks_for_slug() {
        let (store, manager) = setup();
        let draft = PageDraft::new(manager.statuses());
        assert_matches!(
            manager.create(draft.clone(), &fields("日本語", "v1"), &editor(1)).await,
            Err(CoreError::FieldErrors(errors)) if errors["slug"] == MSG_SLUG_NOT_GENERATED
        );
        assert!(store.list_pages().await.unwrap().is_empty());

        let with_slug = PageFields {
            slug: Some("nihongo".into()),
            ..fields("日本語", "v1")
        };
        let page = manager.create(draft, &with_slug, &editor(1)).await.unwrap();
        assert_eq!(page.content.slug, "nihongo");
    }

    #[tokio::test]
    async fn save_writes_exactly_one_pre_update_revision() {
        let (store, manager) = setup();
        let page = created(&manager).await;

        let saved = manager
            .set_fields_and_save(&page, &fields("Home", "v2"), &editor(2))
            .await
            .unwrap();

        assert_eq!(saved.page.content.body, "v2");
        assert_eq!(saved.page.editor_id, Some(2));
        assert_eq!(saved.revision.content, page.content);
        assert_eq!(saved.revision.editor_id, Some(2));
        assert_eq!(store.revision_count().await, 1);
        assert_eq!(store.find_page(page.id).await.unwrap(), Some(saved.page));
    }

    #[tokio::test]
    async fn save_can_change_status() {
        let (_, manager) = setup();
        let page = created(&manager).await;
        let publish = PageFields {
            status: Some("published".into()),
            ..Default::default()
        };
        let saved = manager
            .set_fields_and_save(&page, &publish, &editor(1))
            .await
            .unwrap();
        assert_eq!(saved.page.status, "published");
        assert_eq!(saved.page.content, page.content);
    }

    #[tokio::test]
    async fn stale_save_keeps_concurrent_status_change() {
        let (store, manager) = setup();
        let page = created(&manager).await;

        manager
            .set_status(&page, "published", &editor(2))
            .await
            .unwrap();
        let body_only = PageFields {
            body: Some("v2".into()),
            ..Default::default()
        };
        let saved = manager
            .set_fields_and_save(&page, &body_only, &editor(3))
            .await
            .unwrap();

        assert_eq!(saved.page.status, "published");
        assert_eq!(saved.page.content.body, "v2");
        assert_eq!(saved.page.content.title, page.content.title);
        let stored = store.find_page(page.id).await.unwrap().unwrap();
        assert_eq!(stored.status, "published");
    }

    #[tokio::test]
    async fn stale_save_keeps_concurrent_field_edit() {
        let (_, manager) = setup();
        let page = created(&manager).await;

        let retitle = PageFields {
            title: Some("Renamed".into()),
            ..Default::default()
        };
        manager
            .set_fields_and_save(&page, &retitle, &editor(2))
            .await
            .unwrap();
        let body_only = PageFields {
            body: Some("v2".into()),
            ..Default::default()
        };
        let saved = manager
            .set_fields_and_save(&page, &body_only, &editor(3))
            .await
            .unwrap();

        assert_eq!(saved.page.content.title, "Renamed");
        assert_eq!(saved.page.content.body, "v2");
        // The snapshot holds the stored state the save replaced.
        assert_eq!(saved.revision.content.title, "Renamed");
        assert_eq!(saved.revision.content.body, "v1");
    }

    #[tokio::test]
    async fn rollback_keeps_concurrent_status_change() {
        let (_, manager) = setup();
        let v1 = created(&manager).await;
        let v2 = manager
            .set_fields_and_save(&v1, &fields("Home v2", "v2"), &editor(1))
            .await
            .unwrap();

        manager
            .set_status(&v2.page, "published", &editor(2))
            .await
            .unwrap();
        let rolled = manager
            .rollback_revision(&v2.page, &v2.revision, &editor(1))
            .await
            .unwrap();

        assert_eq!(rolled.page.status, "published");
        assert_eq!(rolled.page.content, v1.content);
    }

    #[tokio::test]
    async fn rejected_fields_leave_page_and_history_unchanged() {
        let (store, manager) = setup();
        let page = created(&manager).await;

        let bad = PageFields {
            title: Some("Fine".into()),
            slug: Some("Not A Slug".into()),
            ..Default::default()
        };
        assert_matches!(
            manager.set_fields_and_save(&page, &bad, &editor(1)).await,
            Err(CoreError::FieldErrors(_))
        );
        let bad_status = PageFields {
            status: Some("retired".into()),
            ..Default::default()
        };
        assert_matches!(
            manager.set_fields_and_save(&page, &bad_status, &editor(1)).await,
            Err(CoreError::InvalidStatus(_))
        );

        assert_eq!(store.find_page(page.id).await.unwrap(), Some(page));
        assert_eq!(store.revision_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_field_key_never_reaches_the_page() {
        let (store, manager) = setup();
        let page = created(&manager).await;

        let body = serde_json::json!({ "title": "Changed", "author": "mallory" });
        let parsed = PageFields::from_value(body);
        assert_matches!(parsed, Err(CoreError::FieldErrors(errors)) if errors.contains_key("author"));

        assert_eq!(store.find_page(page.id).await.unwrap(), Some(page));
        assert_eq!(store.revision_count().await, 0);
    }

    #[tokio::test]
    async fn rollback_restores_revision_and_records_previous_state() {
        let (store, manager) = setup();
        let v1 = created(&manager).await;
        let v2 = manager
            .set_fields_and_save(&v1, &fields("Home v2", "v2"), &editor(1))
            .await
            .unwrap();
        let r1 = v2.revision.clone();

        let rolled = manager
            .rollback_revision(&v2.page, &r1, &editor(3))
            .await
            .unwrap();

        assert_eq!(rolled.page.content, r1.content);
        assert_eq!(rolled.page.editor_id, Some(3));
        assert_eq!(rolled.revision.content, v2.page.content);
        assert_eq!(
            rolled.revision.summary.as_deref(),
            Some(format!("Rolled back to revision {}", r1.id).as_str())
        );
        // Target revision untouched; history only grew.
        assert_eq!(store.find_revision(r1.id).await.unwrap(), Some(r1));
        assert_eq!(store.revision_count().await, 2);
    }

    #[tokio::test]
    async fn rollback_round_trip_restores_pre_rollback_state() {
        let (_, manager) = setup();
        let v1 = created(&manager).await;
        let v2 = manager
            .set_fields_and_save(&v1, &fields("Home v2", "v2"), &editor(1))
            .await
            .unwrap();

        let back = manager
            .rollback_revision(&v2.page, &v2.revision, &editor(1))
            .await
            .unwrap();
        let forward = manager
            .rollback_revision(&back.page, &back.revision, &editor(1))
            .await
            .unwrap();

        assert_eq!(forward.page.content, v2.page.content);
    }

    #[tokio::test]
    async fn rollback_rejects_foreign_revision() {
        let (store, manager) = setup();
        let a = created(&manager).await;
        let draft = PageDraft::new(manager.statuses());
        let b = manager
            .create(draft, &fields("Other", "b1"), &editor(1))
            .await
            .unwrap();
        let b_saved = manager
            .set_fields_and_save(&b, &fields("Other", "b2"), &editor(1))
            .await
            .unwrap();

        assert_matches!(
            manager.rollback_revision(&a, &b_saved.revision, &editor(1)).await,
            Err(CoreError::Conflict(_))
        );
        assert_eq!(store.find_page(a.id).await.unwrap(), Some(a));
        assert_eq!(store.revision_count().await, 1);
    }

    #[tokio::test]
    async fn rollback_rejects_orphaned_revision() {
        let (_, manager) = setup();
        let page = created(&manager).await;
        let orphan = Revision {
            id: 99,
            page_id: None,
            content: PageContent::default(),
            editor_id: None,
            summary: None,
            created_at: chrono::Utc::now(),
        };
        assert_matches!(
            manager.rollback_revision(&page, &orphan, &editor(1)).await,
            Err(CoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn create_from_revision_is_unsaved_copy() {
        let (store, manager) = setup();
        let v1 = created(&manager).await;
        let v2 = manager
            .set_fields_and_save(&v1, &fields("Home v2", "v2"), &editor(1))
            .await
            .unwrap();

        let draft = manager.create_from_revision(&v2.revision);

        assert_eq!(draft.content, v2.revision.content);
        assert_eq!(store.list_pages().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_status_validates_before_writing() {
        let (store, manager) = setup();
        let page = created(&manager).await;

        assert_matches!(
            manager.set_status(&page, "retired", &editor(2)).await,
            Err(CoreError::InvalidStatus(_))
        );
        assert_eq!(store.find_page(page.id).await.unwrap(), Some(page.clone()));

        let published = manager
            .set_status(&page, "published", &editor(2))
            .await
            .unwrap();
        assert_eq!(published.status, "published");
        assert_eq!(published.editor_id, Some(2));
        assert_eq!(store.revision_count().await, 0);
    }

    #[tokio::test]
    async fn delete_keeps_history_detached() {
        let (store, manager) = setup();
        let v1 = created(&manager).await;
        let saved = manager
            .set_fields_and_save(&v1, &fields("Home v2", "v2"), &editor(1))
            .await
            .unwrap();

        manager.delete(&saved.page).await.unwrap();

        assert_matches!(
            manager.page(v1.id).await,
            Err(CoreError::NotFound { entity: "Page", .. })
        );
        let orphan = manager.revision(saved.revision.id).await.unwrap();
        assert_eq!(orphan.page_id, None);
        assert_matches!(manager.delete(&saved.page).await, Err(CoreError::NotFound { .. }));
        assert_eq!(store.revision_count().await, 1);
    }
}
