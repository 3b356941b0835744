//! Handlers for the Vault pages screens and page mutations.
//!
//! Navigation actions answer with a [`ViewResponse`]; mutations answer with
//! an [`ActionResult`] or, for status change and delete submitted by normal
//! navigation, a redirect.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pages_core::fields::PageFields;
use pages_core::guard::{GuardContext, PageAction};
use pages_core::i18n::{MSG_PAGE_DELETED, MSG_PAGE_STATUS_CHANGED, MSG_PAGE_UPDATED};
use pages_core::listing::{pages_listing, revisions_listing, ListingParams, PageListing, RevisionRow};
use pages_core::page::{Page, PageDraft};
use pages_core::redirect::{action_page_redirect, delete_page_redirect};
use pages_core::status::StatusLabel;
use pages_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::request::{IsAsync, Referer};
use crate::response::{ActionResponse, ActionResult, ViewResponse};
use crate::state::AppState;

/* --------------------------------------------------------------------------
View models
-------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
pub struct ListView {
    pub listing: PageListing,
    pub statuses: Vec<StatusLabel>,
}

#[derive(Debug, Serialize)]
pub struct CreateView {
    pub statuses: Vec<StatusLabel>,
    pub page: PageDraft,
    pub is_copy: bool,
    /// Id of the page or revision the draft was copied from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct EditView {
    pub page: Page,
    pub revisions: Vec<RevisionRow>,
    pub statuses: Vec<StatusLabel>,
}

/* --------------------------------------------------------------------------
Query param types
-------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

/* --------------------------------------------------------------------------
Screens
-------------------------------------------------------------------------- */

/// GET /pages
///
/// Filtered, paginated page listing.
pub async fn index(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> AppResult<impl IntoResponse> {
    state
        .guard
        .allows(&auth.editor, PageAction::View, GuardContext::None)?;

    let pages = state.store.list_pages().await?;
    let statuses = state.pages.statuses();

    Ok(Json(ViewResponse::new(
        "pages:list",
        ListView {
            listing: pages_listing(pages, statuses, &params),
            statuses: statuses.labels().to_vec(),
        },
    )))
}

/// GET /pages/add
///
/// Blank draft for the create screen.
pub async fn add(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state
        .guard
        .allows(&auth.editor, PageAction::Add, GuardContext::None)?;

    let statuses = state.pages.statuses();
    Ok(Json(ViewResponse::new(
        "pages:create",
        CreateView {
            statuses: statuses.labels().to_vec(),
            page: PageDraft::new(statuses),
            is_copy: false,
            source_id: None,
        },
    )))
}

/// GET /pages/copy/{id}
///
/// Create screen pre-filled with an existing page's content.
pub async fn create_from_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = state.pages.page(id).await?;
    state
        .guard
        .allows(&auth.editor, PageAction::Add, GuardContext::None)?;

    Ok(Json(ViewResponse::new(
        "pages:create",
        CreateView {
            statuses: state.pages.statuses().labels().to_vec(),
            page: state.pages.create_from_page(&page),
            is_copy: true,
            source_id: Some(page.id),
        },
    )))
}

/// GET /pages/edit/{id}
///
/// Edit screen with the page's revision history.
pub async fn edit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = state.pages.page(id).await?;
    state
        .guard
        .allows(&auth.editor, PageAction::View, GuardContext::Page(&page))?;

    let revisions = state.store.list_revisions(page.id).await?;

    Ok(Json(ViewResponse::new(
        "pages:edit",
        EditView {
            page,
            revisions: revisions_listing(revisions),
            statuses: state.pages.statuses().labels().to_vec(),
        },
    )))
}

/* --------------------------------------------------------------------------
Mutations
-------------------------------------------------------------------------- */

/// POST /pages/action/{id}?status=...
///
/// Change the page's status label.
pub async fn action(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<StatusParams>,
    is_async: IsAsync,
    referer: Referer,
) -> AppResult<ActionResponse> {
    let page = state.pages.page(id).await?;
    state
        .guard
        .allows(&auth.editor, PageAction::Update, GuardContext::Page(&page))?;

    let status = params.status.unwrap_or_default();
    let page = state.pages.set_status(&page, &status, &auth.editor).await?;

    tracing::info!(
        editor_id = auth.editor.id,
        page_id = page.id,
        status = %page.status,
        "Page status changed"
    );

    if is_async.0 {
        Ok(ActionResponse::Result(
            ActionResult::ok(state.say(MSG_PAGE_STATUS_CHANGED)).refresh(),
        ))
    } else {
        Ok(ActionResponse::Redirect(action_page_redirect(
            referer.as_deref(),
            &state.uris.pages(),
        )))
    }
}

/// POST /pages/delete/{id}
///
/// Delete the page. Its revisions are kept, detached.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    is_async: IsAsync,
    referer: Referer,
) -> AppResult<ActionResponse> {
    let page = state.pages.page(id).await?;
    state
        .guard
        .allows(&auth.editor, PageAction::Delete, GuardContext::Page(&page))?;

    state.pages.delete(&page).await?;

    tracing::info!(
        editor_id = auth.editor.id,
        page_id = page.id,
        slug = %page.content.slug,
        "Page deleted"
    );

    if is_async.0 {
        Ok(ActionResponse::Result(
            ActionResult::ok(state.say(MSG_PAGE_DELETED)).refresh(),
        ))
    } else {
        Ok(ActionResponse::Redirect(delete_page_redirect(
            &state.uris.page_edit(page.id),
            referer.as_deref(),
            &state.uris.pages(),
        )))
    }
}

/// POST /pages/edit/{id}
///
/// Apply submitted fields, snapshotting the previous content as a revision.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<ActionResult> {
    let page = state.pages.page(id).await?;
    state
        .guard
        .allows(&auth.editor, PageAction::Update, GuardContext::Page(&page))?;

    let fields = PageFields::from_value(body)?;
    let saved = state
        .pages
        .set_fields_and_save(&page, &fields, &auth.editor)
        .await?;

    tracing::info!(
        editor_id = auth.editor.id,
        page_id = saved.page.id,
        revision_id = saved.revision.id,
        "Page updated"
    );

    Ok(ActionResult::ok(state.say(MSG_PAGE_UPDATED)))
}

/// POST /pages/create
///
/// Persist a new page and point the client at its edit screen.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<ActionResult> {
    state
        .guard
        .allows(&auth.editor, PageAction::Add, GuardContext::None)?;

    let fields = PageFields::from_value(body)?;
    let draft = PageDraft::new(state.pages.statuses());
    let page = state.pages.create(draft, &fields, &auth.editor).await?;

    tracing::info!(
        editor_id = auth.editor.id,
        page_id = page.id,
        slug = %page.content.slug,
        "Page created"
    );

    Ok(ActionResult::new(StatusCode::CREATED).redirect(state.uris.page_edit(page.id)))
}
