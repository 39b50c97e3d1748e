//! Core domain logic for LendShelf, a token-gated tracker for lending out
//! physical items.
//! This crate is the single source of truth for the lending invariants.

pub mod db;
pub mod imaging;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use imaging::{fit_within, resize_to_bounds, ImageError, ThumbnailBounds};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::holder::{Holder, HolderId, HolderToken};
pub use model::item::{Item, ItemId};
pub use model::ValidationError;
pub use policy::lending::{AlreadyTaken, GiveBackOutcome, LendState};
pub use repo::holder_repo::{HolderRepository, SqliteHolderRepository};
pub use repo::item_repo::{ItemListQuery, ItemRecord, ItemRepository, SqliteItemRepository};
pub use repo::{RepoError, RepoResult};
pub use service::access::AccessGuard;
pub use service::catalog_service::{CatalogError, CatalogService};
pub use service::lending_service::{ItemDetail, ItemSummary, LendingError, LendingService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
