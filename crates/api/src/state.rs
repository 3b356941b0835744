use std::sync::Arc;

use pages_core::guard::{Guard, RoleGuard};
use pages_core::i18n::Translator;
use pages_core::manager::PageManager;
use pages_core::redirect::VaultUris;
use pages_core::status::Statuses;
use pages_core::store::PageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Page and revision persistence (PostgreSQL or in-memory).
    pub store: Arc<dyn PageStore>,
    /// Revision lifecycle manager over `store`.
    pub pages: PageManager,
    /// Permission checker consulted by every action.
    pub guard: Arc<dyn Guard>,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Vault URI builder for redirects.
    pub uris: VaultUris,
    pub translator: Arc<Translator>,
}

impl AppState {
    /// Wire the lifecycle manager, [`RoleGuard`] and Vault URIs around `store`.
    pub fn new(
        store: Arc<dyn PageStore>,
        config: ServerConfig,
        statuses: Statuses,
        translator: Translator,
    ) -> Self {
        let pages = PageManager::new(Arc::clone(&store), Arc::new(statuses));
        let uris = VaultUris::new(&config.vault_prefix);
        Self {
            store,
            pages,
            guard: Arc::new(RoleGuard),
            config: Arc::new(config),
            uris,
            translator: Arc::new(translator),
        }
    }

    pub fn say(&self, key: &str) -> String {
        self.translator.say(key)
    }
}
