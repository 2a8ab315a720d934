//! podscale-tiers — the static catalog of GPU pod tiers.
//!
//! Each tier pairs a GPU class with the number of concurrent voice
//! sessions it can serve. Tiers are totally ordered by capacity:
//!
//! ```text
//! small (30) < medium (80) < large (150) < xlarge (240)
//! ```
//!
//! The catalog is read-only once built; `TierCatalog::new` rejects tables
//! whose session ceilings are not strictly increasing so that sizing
//! decisions over the catalog are well-defined.

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::TierCatalog;
pub use error::{CatalogError, CatalogResult};
pub use types::*;
