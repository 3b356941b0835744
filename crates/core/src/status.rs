//! The labeled status set a page may be in.
//!
//! Statuses are labels, not workflow states: any recognized status may follow
//! any other. The set is supplied by configuration; the first entry is the
//! status new drafts start in.

use serde::Serialize;

use crate::error::CoreError;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_HIDDEN: &str = "hidden";

/// A single status value with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLabel {
    pub value: String,
    pub label: String,
}

/// Ordered set of recognized page statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statuses {
    labels: Vec<StatusLabel>,
}

impl Default for Statuses {
    fn default() -> Self {
        Self {
            labels: vec![
                label(STATUS_DRAFT, "Draft"),
                label(STATUS_PUBLISHED, "Published"),
                label(STATUS_HIDDEN, "Hidden"),
            ],
        }
    }
}

fn label(value: &str, label: &str) -> StatusLabel {
    StatusLabel {
        value: value.to_string(),
        label: label.to_string(),
    }
}

impl Statuses {
    /// Parse a `value:Label,value:Label` list.
    ///
    /// A missing label falls back to the value itself. Duplicate or empty
    /// values are rejected.
    pub fn parse(list: &str) -> Result<Self, CoreError> {
        let mut labels: Vec<StatusLabel> = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (value, text) = match entry.split_once(':') {
                Some((v, l)) => (v.trim(), l.trim()),
                None => (entry, entry),
            };
            if value.is_empty() {
                return Err(CoreError::Validation(format!(
                    "Status entry '{entry}' has an empty value"
                )));
            }
            if labels.iter().any(|l| l.value == value) {
                return Err(CoreError::Validation(format!(
                    "Status '{value}' is listed more than once"
                )));
            }
            let text = if text.is_empty() { value } else { text };
            labels.push(label(value, text));
        }
        if labels.is_empty() {
            return Err(CoreError::Validation(
                "At least one page status must be configured".into(),
            ));
        }
        Ok(Self { labels })
    }

    /// All statuses in configured order.
    pub fn labels(&self) -> &[StatusLabel] {
        &self.labels
    }

    pub fn contains(&self, value: &str) -> bool {
        self.labels.iter().any(|l| l.value == value)
    }

    /// Display label for a status, if recognized.
    pub fn label(&self, value: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.value == value)
            .map(|l| l.label.as_str())
    }

    /// The status new drafts are created with.
    pub fn default_status(&self) -> &str {
        // `parse` and `default` never produce an empty set.
        self.labels
            .first()
            .map(|l| l.value.as_str())
            .unwrap_or(STATUS_DRAFT)
    }

    /// Fail with [`CoreError::InvalidStatus`] unless `value` is recognized.
    pub fn ensure(&self, value: &str) -> Result<(), CoreError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(CoreError::InvalidStatus(value.to_string()))
        }
    }
}
