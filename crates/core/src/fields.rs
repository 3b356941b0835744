//! Validated field mapping for page create/update requests.
//!
//! [`PageFields::from_map`] is the request validator: it accepts a JSON object,
//! rejects keys that are not settable on a page, and checks value limits.
//! The resulting struct can only name real page fields, so the lifecycle
//! manager never sees an unknown key.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use validator::Validate;

use crate::error::CoreError;
use crate::page::PageContent;
use crate::slug::validate_slug;
use crate::status::Statuses;

/// Field names accepted by [`PageFields::from_map`].
pub const SETTABLE_FIELDS: &[&str] = &[
    "title",
    "slug",
    "body",
    "keywords",
    "description",
    "meta_tags",
    "status",
];

/// A partial set of page fields. `None` leaves the current value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PageFields {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters."))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Slug must be 1-200 characters."))]
    pub slug: Option<String>,
    #[validate(length(max = 1000000, message = "Body must be at most 1000000 characters."))]
    pub body: Option<String>,
    #[validate(length(max = 1000, message = "Keywords must be at most 1000 characters."))]
    pub keywords: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters."))]
    pub description: Option<String>,
    #[validate(length(max = 10000, message = "Meta tags must be at most 10000 characters."))]
    pub meta_tags: Option<String>,
    pub status: Option<String>,
}

impl PageFields {
    /// Build from a JSON object, collecting one message per offending key.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, CoreError> {
        let mut fields = PageFields::default();
        let mut errors = BTreeMap::new();

        for (key, value) in map {
            let slot = match key.as_str() {
                "title" => &mut fields.title,
                "slug" => &mut fields.slug,
                "body" => &mut fields.body,
                "keywords" => &mut fields.keywords,
                "description" => &mut fields.description,
                "meta_tags" => &mut fields.meta_tags,
                "status" => &mut fields.status,
                _ => {
                    errors.insert(key, "Unknown field.".to_string());
                    continue;
                }
            };
            match value {
                Value::String(s) => *slot = Some(s),
                Value::Null => {}
                _ => {
                    errors.insert(key, "Must be a string.".to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(CoreError::FieldErrors(errors))
        }
    }

    /// Build from any JSON value; non-objects are rejected.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(CoreError::Validation(
                "Request body must be a JSON object".into(),
            )),
        }
    }

    /// Check value limits, slug format and status membership.
    pub fn check(&self, statuses: &Statuses) -> Result<(), CoreError> {
        let mut errors = BTreeMap::new();

        if let Err(e) = self.validate() {
            for (field, errs) in e.field_errors() {
                if let Some(first) = errs.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    errors.insert(field.to_string(), message);
                }
            }
        }

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors
                    .entry("title".to_string())
                    .or_insert_with(|| "Title must not be blank.".to_string());
            }
        }

        if let Some(slug) = &self.slug {
            if !errors.contains_key("slug") {
                if let Err(CoreError::FieldErrors(slug_errors)) = validate_slug(slug) {
                    errors.extend(slug_errors);
                }
            }
        }

        if !errors.is_empty() {
            return Err(CoreError::FieldErrors(errors));
        }

        if let Some(status) = &self.status {
            statuses.ensure(status)?;
        }
        Ok(())
    }

    /// Every content field set to `content`'s value; status left unset.
    pub fn replacing(content: &PageContent) -> Self {
        Self {
            title: Some(content.title.clone()),
            slug: Some(content.slug.clone()),
            body: Some(content.body.clone()),
            keywords: Some(content.keywords.clone()),
            description: Some(content.description.clone()),
            meta_tags: Some(content.meta_tags.clone()),
            status: None,
        }
    }

    /// Overwrite the content fields that are present.
    pub fn apply_to(&self, content: &mut PageContent) {
        let pairs = [
            (&self.title, &mut content.title),
            (&self.slug, &mut content.slug),
            (&self.body, &mut content.body),
            (&self.keywords, &mut content.keywords),
            (&self.description, &mut content.description),
            (&self.meta_tags, &mut content.meta_tags),
        ];
        for (value, target) in pairs {
            if let Some(v) = value {
                target.clone_from(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn known_string_fields_are_accepted() {
        let fields = PageFields::from_map(map(json!({
            "title": "Home",
            "slug": "home",
            "status": "published",
            "description": null,
        })))
        .unwrap();
        assert_eq!(fields.title.as_deref(), Some("Home"));
        assert_eq!(fields.status.as_deref(), Some("published"));
        assert!(fields.description.is_none());
    }

    #[test]
    fn unknown_and_non_string_fields_are_reported() {
        let err = PageFields::from_map(map(json!({
            "title": 5,
            "id": "42",
            "body": "ok",
        })))
        .unwrap_err();
        assert_matches!(err, CoreError::FieldErrors(errors) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors["id"], "Unknown field.");
            assert_eq!(errors["title"], "Must be a string.");
        });
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_matches!(
            PageFields::from_value(json!(["title"])),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn check_reports_length_and_slug_problems() {
        let fields = PageFields {
            title: Some(String::new()),
            slug: Some("Bad Slug".into()),
            ..Default::default()
        };
        let err = fields.check(&Statuses::default()).unwrap_err();
        assert_matches!(err, CoreError::FieldErrors(errors) => {
            assert_eq!(errors["title"], "Title must be 1-200 characters.");
            assert!(errors["slug"].starts_with("Slug may contain only"));
        });
    }

    #[test]
    fn check_rejects_blank_title() {
        let fields = PageFields {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert_matches!(
            fields.check(&Statuses::default()),
            Err(CoreError::FieldErrors(errors)) if errors.contains_key("title")
        );
    }

    #[test]
    fn check_rejects_unknown_status() {
        let fields = PageFields {
            status: Some("retired".into()),
            ..Default::default()
        };
        assert_matches!(
            fields.check(&Statuses::default()),
            Err(CoreError::InvalidStatus(_))
        );
    }

    #[test]
    fn replacing_overwrites_all_content_but_not_status() {
        let source = PageContent {
            title: "Old title".into(),
            slug: "old".into(),
            body: "old body".into(),
            ..Default::default()
        };
        let fields = PageFields::replacing(&source);
        assert!(fields.status.is_none());

        let mut content = PageContent {
            title: "New".into(),
            slug: "new".into(),
            keywords: "kw".into(),
            ..Default::default()
        };
        fields.apply_to(&mut content);
        assert_eq!(content, source);
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut content = PageContent {
            title: "Old".into(),
            slug: "old".into(),
            body: "keep me".into(),
            ..Default::default()
        };
        let fields = PageFields {
            title: Some("New".into()),
            ..Default::default()
        };
        fields.apply_to(&mut content);
        assert_eq!(content.title, "New");
        assert_eq!(content.slug, "old");
        assert_eq!(content.body, "keep me");
    }
}
