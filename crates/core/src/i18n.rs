//! Message translation.
//!
//! Messages are keyed by their English text. A catalog maps keys to localized
//! strings; a key with no entry is returned as-is.

use std::collections::HashMap;
use std::path::Path;

use crate::error::CoreError;

pub const MSG_PAGE_STATUS_CHANGED: &str = "Page status changed.";
pub const MSG_PAGE_DELETED: &str = "Page deleted.";
pub const MSG_PAGE_UPDATED: &str = "Page updated.";
pub const MSG_PAGE_ROLLED_BACK: &str = "Page rolled back.";
pub const MSG_PAGE_NOT_FOUND: &str = "Page not found.";
pub const MSG_SLUG_TAKEN: &str = "Slug is already in use.";
pub const MSG_SLUG_NOT_GENERATED: &str =
    "Slug could not be generated from the title; provide one.";

#[derive(Debug, Clone, Default)]
pub struct Translator {
    catalog: HashMap<String, String>,
}

impl Translator {
    /// Parse a flat JSON object of `key -> message`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let catalog: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid locale catalog: {e}")))?;
        Ok(Self { catalog })
    }

    /// Load a catalog file written as a flat JSON object.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!(
                "Failed to read locale catalog {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    /// Localized text for `key`, or `key` itself.
    pub fn say(&self, key: &str) -> String {
        self.catalog
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn missing_key_falls_back_to_key() {
        assert_eq!(Translator::default().say(MSG_PAGE_UPDATED), "Page updated.");
    }

    #[test]
    fn catalog_entry_wins() {
        let t = Translator::from_json(r#"{"Page deleted.": "Seite gelöscht."}"#).unwrap();
        assert_eq!(t.say(MSG_PAGE_DELETED), "Seite gelöscht.");
        assert_eq!(t.say(MSG_PAGE_UPDATED), "Page updated.");
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        assert_matches!(
            Translator::from_json(r#"["not", "an", "object"]"#),
            Err(CoreError::Validation(_))
        );
    }
}
