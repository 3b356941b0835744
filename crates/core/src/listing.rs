//! Display-ready projections of page and revision collections.

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::revision::Revision;
use crate::status::Statuses;
use crate::types::{DbId, Timestamp};

/// Default number of rows per listing page.
pub const DEFAULT_LISTING_LIMIT: i64 = 20;

/// Maximum number of rows per listing page.
pub const MAX_LISTING_LIMIT: i64 = 100;

/// Clamp a user-supplied limit to `[1, max]`, defaulting to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Filters and pagination for the pages listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub status: Option<String>,
    /// Case-insensitive substring of title or slug.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRow {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub status_label: String,
    pub editor_id: Option<DbId>,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageListing {
    pub rows: Vec<PageRow>,
    /// Rows matching the filters before pagination.
    pub total: usize,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionRow {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub editor_id: Option<DbId>,
    pub summary: Option<String>,
    pub created_at: Timestamp,
}

/// Filter, sort (most recently updated first) and paginate pages.
pub fn pages_listing(pages: Vec<Page>, statuses: &Statuses, params: &ListingParams) -> PageListing {
    let needle = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut matching: Vec<Page> = pages
        .into_iter()
        .filter(|p| params.status.as_deref().map_or(true, |s| p.status == s))
        .filter(|p| {
            needle.as_deref().map_or(true, |n| {
                p.content.title.to_lowercase().contains(n)
                    || p.content.slug.to_lowercase().contains(n)
            })
        })
        .collect();

    matching.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    let limit = clamp_limit(params.limit, DEFAULT_LISTING_LIMIT, MAX_LISTING_LIMIT);
    let offset = clamp_offset(params.offset);
    let total = matching.len();

    let rows = matching
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .map(|p| PageRow {
            status_label: statuses
                .label(&p.status)
                .unwrap_or(p.status.as_str())
                .to_string(),
            id: p.id,
            title: p.content.title,
            slug: p.content.slug,
            status: p.status,
            editor_id: p.editor_id,
            updated_at: p.updated_at,
        })
        .collect();

    PageListing {
        rows,
        total,
        limit,
        offset,
    }
}

/// Revisions newest first.
pub fn revisions_listing(revisions: Vec<Revision>) -> Vec<RevisionRow> {
    let mut revisions = revisions;
    revisions.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    revisions
        .into_iter()
        .map(|r| RevisionRow {
            id: r.id,
            title: r.content.title,
            slug: r.content.slug,
            editor_id: r.editor_id,
            summary: r.summary,
            created_at: r.created_at,
        })
        .collect()
}
