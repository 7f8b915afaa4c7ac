//! Store configuration.
//!
//! # Responsibility
//! - Collect the knobs a process entry point needs to build a provider.
//! - Deserialize from JSON with every field optional.
//!
//! # Invariants
//! - `Default` yields a usable file-backed configuration.
//! - Unknown keys are rejected rather than silently ignored.

use crate::contract::CONTENT_AUTHORITY;
use crate::db::{DbTarget, PetDbHelper};
use crate::logging::default_log_level;
use crate::model::pet::ValidationPolicy;
use crate::provider::pet_provider::PetProvider;
use crate::provider::router::{InvalidAuthority, PetUriMatcher};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default database file name for file-backed stores.
pub const DATABASE_NAME: &str = "shelter.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PetStoreConfig {
    /// Content authority the router registers its shapes under.
    pub authority: String,
    /// File path, or `:memory:`.
    pub database: DbTarget,
    pub validation_policy: ValidationPolicy,
    pub log_level: String,
    /// Absolute directory for rolling log files. File logging is off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for PetStoreConfig {
    fn default() -> Self {
        Self {
            authority: CONTENT_AUTHORITY.to_string(),
            database: DbTarget::File(PathBuf::from(DATABASE_NAME)),
            validation_policy: ValidationPolicy::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl PetStoreConfig {
    /// Builds a provider whose connection opens lazily on first use.
    pub fn build_provider(&self) -> Result<PetProvider, InvalidAuthority> {
        let matcher = PetUriMatcher::new(&self.authority)?;
        let helper = PetDbHelper::new(self.database.clone());
        Ok(PetProvider::new(helper, matcher, self.validation_policy))
    }
}
