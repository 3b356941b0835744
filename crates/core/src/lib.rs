//! Domain layer for the Vault pages module.
//!
//! Holds the page and revision entities, the revision lifecycle manager,
//! redirect resolution, permission checks and the persistence seam. Nothing
//! in here knows about HTTP or SQL, so the API crate and the PostgreSQL
//! store both build on it.

pub mod editor;
pub mod error;
pub mod fields;
pub mod guard;
pub mod i18n;
pub mod listing;
pub mod manager;
pub mod page;
pub mod redirect;
pub mod revision;
pub mod slug;
pub mod status;
pub mod store;
pub mod types;
