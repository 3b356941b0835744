//! Vault URI generation and post-mutation redirect resolution.
//!
//! After a status change or delete submitted as a normal (non-asynchronous)
//! request the user is sent back where they came from. Deleting from the
//! page's own edit screen is the exception: that URI would now 404, so the
//! listing is used instead.

use url::{ParseError, Url};

use crate::types::DbId;

/// Builds Vault URIs for the pages module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultUris {
    prefix: String,
}

impl Default for VaultUris {
    fn default() -> Self {
        Self::new("/vault")
    }
}

impl VaultUris {
    /// `prefix` is normalized to a leading slash and no trailing slash.
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Mount point of the pages routes (`pages`).
    pub fn pages(&self) -> String {
        format!("{}/pages", self.prefix)
    }

    /// `pages:edit`.
    pub fn page_edit(&self, id: DbId) -> String {
        format!("{}/pages/edit/{id}", self.prefix)
    }

    /// `pages:revision`.
    pub fn revision(&self, id: DbId) -> String {
        format!("{}/pages/revisions/{id}", self.prefix)
    }
}

/// Base for resolving path-absolute referers such as `/vault/pages?x=1`.
const RELATIVE_BASE: &str = "http://localhost";

fn present(referer: Option<&str>) -> Option<&str> {
    referer.filter(|r| !r.trim().is_empty())
}

/// Path component of an absolute URL or a path-absolute reference.
fn referer_path(referer: &str) -> Option<String> {
    let url = match Url::parse(referer) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) if referer.starts_with('/') => {
            Url::parse(RELATIVE_BASE).ok()?.join(referer).ok()?
        }
        Err(_) => return None,
    };
    Some(url.path().to_string())
}

/// Redirect target after a status change.
///
/// The referer is returned verbatim; with no referer, the listing.
pub fn action_page_redirect(referer: Option<&str>, fallback: &str) -> String {
    match present(referer) {
        Some(referer) => referer.to_string(),
        None => fallback.to_string(),
    }
}

/// Redirect target after deleting the page whose edit URI is `page_edit_uri`.
///
/// Both the whole referer and its path component are compared, without
/// trailing slashes and ignoring ASCII case, against the edit URI. A match
/// means the user was on the deleted page's edit screen, so the fallback is
/// returned. The path is taken from absolute URLs and from path-absolute
/// references (`/vault/pages/edit/5?tab=meta`); any other referer never
/// matches on the path.
pub fn delete_page_redirect(page_edit_uri: &str, referer: Option<&str>, fallback: &str) -> String {
    let Some(referer) = present(referer) else {
        return fallback.to_string();
    };

    let referer = referer.trim_end_matches('/');
    let own = page_edit_uri.trim_end_matches('/');

    let path_matches = referer_path(referer)
        .is_some_and(|path| path.trim_end_matches('/').eq_ignore_ascii_case(own));

    if referer.eq_ignore_ascii_case(own) || path_matches {
        fallback.to_string()
    } else {
        referer.to_string()
    }
}
