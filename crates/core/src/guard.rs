//! Permission checks for page actions.
//!
//! Handlers call [`Guard::allows`] explicitly with the acting editor, the
//! action and the entity it targets. [`RoleGuard`] is the default policy.

use std::fmt;

use crate::editor::{Editor, ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER};
use crate::error::CoreError;
use crate::page::Page;
use crate::revision::Revision;

/// Permission namespace; full permission names are `vault.pages.<action>`.
pub const GUARD_NAMESPACE: &str = "vault.pages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Add,
    View,
    ViewRevision,
    Update,
    Delete,
    ApplyRevision,
}

impl PageAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PageAction::Add => "add",
            PageAction::View => "view",
            PageAction::ViewRevision => "viewRevision",
            PageAction::Update => "update",
            PageAction::Delete => "delete",
            PageAction::ApplyRevision => "applyRevision",
        }
    }
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GUARD_NAMESPACE}.{}", self.as_str())
    }
}

/// The entity a permission check is scoped to.
#[derive(Debug, Clone, Copy)]
pub enum GuardContext<'a> {
    None,
    Page(&'a Page),
    Revision(&'a Revision),
}

/// Capability checker consulted by every action handler.
pub trait Guard: Send + Sync {
    /// `Ok(())` when `editor` may perform `action`, otherwise
    /// [`CoreError::Forbidden`].
    fn allows(
        &self,
        editor: &Editor,
        action: PageAction,
        context: GuardContext<'_>,
    ) -> Result<(), CoreError>;
}

/// Role and ownership based policy.
///
/// | role     | allowed                                                   |
/// |----------|-----------------------------------------------------------|
/// | `admin`  | everything                                                |
/// | `editor` | everything except deleting pages it did not create        |
/// | `viewer` | `view`, and `viewRevision` on revisions still attached     |
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGuard;

impl RoleGuard {
    fn decide(editor: &Editor, action: PageAction, context: GuardContext<'_>) -> bool {
        match editor.role.as_str() {
            ROLE_ADMIN => true,
            ROLE_EDITOR => match (action, context) {
                (PageAction::Delete, GuardContext::Page(page)) => {
                    page.created_by == Some(editor.id)
                }
                (PageAction::Delete, _) => false,
                _ => true,
            },
            ROLE_VIEWER => match (action, context) {
                (PageAction::View, _) => true,
                (PageAction::ViewRevision, GuardContext::Revision(rev)) => rev.page_id.is_some(),
                _ => false,
            },
            _ => false,
        }
    }
}

impl Guard for RoleGuard {
    fn allows(
        &self,
        editor: &Editor,
        action: PageAction,
        context: GuardContext<'_>,
    ) -> Result<(), CoreError> {
        if Self::decide(editor, action, context) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Permission '{action}' denied for role '{}'",
                editor.role
            )))
        }
    }
}
