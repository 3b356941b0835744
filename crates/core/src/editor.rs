//! Identity of the actor performing a mutation.

use serde::Serialize;

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// The editor stamped onto pages and revisions on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Editor {
    pub id: DbId,
    /// Role name (e.g. `"admin"`, `"editor"`, `"viewer"`).
    pub role: String,
}

impl Editor {
    pub fn new(id: DbId, role: impl Into<String>) -> Self {
        Self {
            id,
            role: role.into(),
        }
    }
}
