//! Route definitions for the Vault pages module.
//!
//! Registered under `<vault prefix>/pages`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{pages, revisions};
use crate::state::AppState;

/// Pages routes.
///
/// ```text
/// GET  /                        index
/// GET  /add                     add
/// POST /create                  create
/// GET  /copy/{id}               create_from_page
/// GET  /edit/{id}               edit
/// POST /edit/{id}               update
/// POST /action/{id}?status=     action
/// POST /delete/{id}             delete
/// GET  /revisions/{id}          view_revision
/// GET  /revisions/{id}/copy     create_from_revision
/// POST /revisions/{id}/apply    apply_revision
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/add", get(pages::add))
        .route("/create", post(pages::create))
        .route("/copy/{id}", get(pages::create_from_page))
        .route("/edit/{id}", get(pages::edit).post(pages::update))
        .route("/action/{id}", post(pages::action))
        .route("/delete/{id}", post(pages::delete))
        .route("/revisions/{id}", get(revisions::view_revision))
        .route("/revisions/{id}/copy", get(revisions::create_from_revision))
        .route("/revisions/{id}/apply", post(revisions::apply_revision))
}
