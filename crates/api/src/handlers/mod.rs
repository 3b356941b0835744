pub mod pages;
pub mod revisions;
