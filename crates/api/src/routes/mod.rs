pub mod health;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Build the Vault route tree. Mounted under the configured Vault prefix.
///
/// Route hierarchy:
///
/// ```text
/// /pages                        page listing, screens and mutations
/// /pages/revisions/{id}         revision view, copy and rollback
/// ```
pub fn vault_routes() -> Router<AppState> {
    Router::new().nest("/pages", pages::router())
}
