//! Repository layer: one zero-sized struct per table with async query methods.

pub mod page_repo;
pub mod revision_repo;

pub use page_repo::PageRepo;
pub use revision_repo::RevisionRepo;
