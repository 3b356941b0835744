pub mod page;
pub mod revision;
