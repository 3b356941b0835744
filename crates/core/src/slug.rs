//! URL slug generation and validation for pages.

use crate::error::CoreError;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 200;

/// Generate a URL-safe slug from a page title.
///
/// Lowercases, replaces anything that is not ASCII alphanumeric with a hyphen,
/// collapses runs of hyphens and trims them from both ends.
pub fn generate_slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }
    result.trim_matches('-').to_string()
}

/// Validate a page slug.
///
/// Allowed: lowercase ASCII alphanumerics, `-`, `_` and `/` as a segment
/// separator. Segments may not be empty, so no leading, trailing or doubled
/// slashes.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::field("slug", "Slug must not be empty."));
    }
    if slug.chars().count() > MAX_SLUG_LEN {
        return Err(CoreError::field(
            "slug",
            format!("Slug must be at most {MAX_SLUG_LEN} characters."),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '/'))
    {
        return Err(CoreError::field(
            "slug",
            "Slug may contain only lowercase letters, digits, '-', '_' and '/'.",
        ));
    }
    if slug.split('/').any(str::is_empty) {
        return Err(CoreError::field(
            "slug",
            "Slug segments must not be empty.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn slug_basic_title() {
        assert_eq!(generate_slug("Getting Started"), "getting-started");
    }

    #[test]
    fn slug_collapses_and_trims() {
        assert_eq!(generate_slug("  Hello,   World!! "), "hello-world");
        assert_eq!(generate_slug("---"), "");
    }

    #[test]
    fn slug_drops_non_ascii() {
        assert_eq!(generate_slug("Über uns"), "ber-uns");
    }

    #[test]
    fn valid_slugs_pass() {
        assert!(validate_slug("about").is_ok());
        assert!(validate_slug("about/team_2").is_ok());
    }

    #[test]
    fn invalid_slugs_fail() {
        assert_matches!(validate_slug(""), Err(CoreError::FieldErrors(_)));
        assert_matches!(validate_slug("About"), Err(CoreError::FieldErrors(_)));
        assert_matches!(validate_slug("/about"), Err(CoreError::FieldErrors(_)));
        assert_matches!(validate_slug("about/"), Err(CoreError::FieldErrors(_)));
        assert_matches!(validate_slug("a//b"), Err(CoreError::FieldErrors(_)));
        assert_matches!(validate_slug("with space"), Err(CoreError::FieldErrors(_)));
    }
}
