//! Core data access for the pet shelter store.
//! This crate is the single source of truth for pet record invariants.

pub mod config;
pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod repo;

pub use config::PetStoreConfig;
pub use db::{DbError, DbTarget, PetDbHelper};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::pet::{Gender, Pet, PetId, PetValidationError, PetValues, ValidationPolicy};
pub use provider::pet_provider::{Operation, PetProvider, ProviderError, ProviderResult};
pub use provider::router::{with_appended_id, InvalidAuthority, PetUriMatcher, Route};
pub use repo::cursor::{PetCursor, PetRow, PetRows};
pub use repo::pet_repo::{RepoError, RepoResult, Selection, SqlitePetRepository};

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
