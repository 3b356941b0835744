//! The page entity and its content snapshot.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fields::PageFields;
use crate::status::Statuses;
use crate::types::{DbId, Timestamp};

/// The editable content of a page. Revisions capture exactly these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub keywords: String,
    pub description: String,
    pub meta_tags: String,
}

/// A persisted page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: DbId,
    pub status: String,
    #[serde(flatten)]
    pub content: PageContent,
    /// Editor who created the page; owner for permission purposes.
    pub created_by: Option<DbId>,
    /// Editor who last saved the page.
    pub editor_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Change the status label in place.
    ///
    /// Fails with [`CoreError::InvalidStatus`] and leaves the page untouched
    /// when `status` is not in `statuses`.
    pub fn set_status(&mut self, status: &str, statuses: &Statuses) -> Result<(), CoreError> {
        statuses.ensure(status)?;
        self.status = status.to_string();
        Ok(())
    }
}

/// An unsaved page. Has no identifier until the store inserts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDraft {
    pub status: String,
    #[serde(flatten)]
    pub content: PageContent,
}

impl PageDraft {
    /// An empty draft in the default status.
    pub fn new(statuses: &Statuses) -> Self {
        Self {
            status: statuses.default_status().to_string(),
            content: PageContent::default(),
        }
    }
}

impl From<&Page> for PageDraft {
    fn from(page: &Page) -> Self {
        Self {
            status: page.status.clone(),
            content: page.content.clone(),
        }
    }
}

/// Changes written to an existing page by the store.
///
/// The store merges `fields` onto the page as it is persisted at write time,
/// with the row held, so columns the update does not name keep whatever a
/// concurrent write left there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUpdate {
    pub fields: PageFields,
    pub editor_id: DbId,
    /// Summary recorded on the revision created alongside this update.
    pub summary: Option<String>,
}

impl PageUpdate {
    /// Status and content resulting from applying the update to `current`.
    pub fn merge(&self, current: &Page) -> (String, PageContent) {
        let mut content = current.content.clone();
        self.fields.apply_to(&mut content);
        let status = self
            .fields
            .status
            .clone()
            .unwrap_or_else(|| current.status.clone());
        (status, content)
    }
}
