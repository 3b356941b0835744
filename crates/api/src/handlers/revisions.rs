//! Handlers for page revisions: viewing, branching and rollback.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use pages_core::guard::{GuardContext, PageAction};
use pages_core::i18n::{MSG_PAGE_NOT_FOUND, MSG_PAGE_ROLLED_BACK};
use pages_core::revision::Revision;
use pages_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::handlers::pages::CreateView;
use crate::middleware::auth::AuthUser;
use crate::middleware::request::IsAsync;
use crate::response::{ActionResponse, ActionResult, ViewResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RevisionView {
    pub revision: Revision,
}

/// GET /pages/revisions/{id}
pub async fn view_revision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let revision = state.pages.revision(id).await?;
    state.guard.allows(
        &auth.editor,
        PageAction::ViewRevision,
        GuardContext::Revision(&revision),
    )?;

    Ok(Json(ViewResponse::new(
        "pages:revision",
        RevisionView { revision },
    )))
}

/// GET /pages/revisions/{id}/copy
///
/// Create screen pre-filled with the revision's content. Works for
/// revisions whose page was deleted.
pub async fn create_from_revision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let revision = state.pages.revision(id).await?;
    state
        .guard
        .allows(&auth.editor, PageAction::Add, GuardContext::None)?;

    Ok(Json(ViewResponse::new(
        "pages:create",
        CreateView {
            statuses: state.pages.statuses().labels().to_vec(),
            page: state.pages.create_from_revision(&revision),
            is_copy: true,
            source_id: Some(revision.id),
        },
    )))
}

/// POST /pages/revisions/{id}/apply
///
/// Roll the owning page back to this revision.
pub async fn apply_revision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    is_async: IsAsync,
) -> AppResult<ActionResponse> {
    let revision = state.pages.revision(id).await?;

    let page = match revision.page_id {
        Some(page_id) => state.store.find_page(page_id).await?,
        None => None,
    };
    let Some(page) = page else {
        return Err(AppError::BadRequest(state.say(MSG_PAGE_NOT_FOUND)));
    };

    state.guard.allows(
        &auth.editor,
        PageAction::ApplyRevision,
        GuardContext::Page(&page),
    )?;

    let saved = state
        .pages
        .rollback_revision(&page, &revision, &auth.editor)
        .await?;

    tracing::info!(
        editor_id = auth.editor.id,
        page_id = saved.page.id,
        revision_id = revision.id,
        snapshot_id = saved.revision.id,
        "Page rolled back"
    );

    let uri = state.uris.page_edit(saved.page.id);
    if is_async.0 {
        Ok(ActionResponse::Result(
            ActionResult::ok(state.say(MSG_PAGE_ROLLED_BACK)).redirect(uri),
        ))
    } else {
        Ok(ActionResponse::Redirect(uri))
    }
}
