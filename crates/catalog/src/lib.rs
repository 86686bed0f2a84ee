//! Catalog Store: the flat record list of a supernova host catalog and the
//! grouping of records by supernova identifier.

pub mod record;
pub mod store;

pub use record::*;
pub use store::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The document has no `records` array.
    MissingRecords,
    Parse(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::MissingRecords => write!(f, "catalog document has no records array"),
            CatalogError::Parse(msg) => write!(f, "catalog parse error: {msg}"),
            CatalogError::Io(msg) => write!(f, "catalog read error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}
