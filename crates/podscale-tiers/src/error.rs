//! Error types for the tier catalog.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur when building or querying a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown tier: {0}")]
    UnknownTier(String),

    #[error("tier catalog is empty")]
    Empty,

    #[error("tier {tier} ceiling {ceiling} does not exceed previous ceiling {previous}")]
    NotMonotonic {
        tier: String,
        ceiling: u32,
        previous: u32,
    },

    #[error("duplicate tier: {0}")]
    Duplicate(String),
}
