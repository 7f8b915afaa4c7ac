//! Table-level persistence for the `pets` table.
//!
//! # Responsibility
//! - Execute query/insert/update/delete against `pets` with caller selections.
//! - Expose query results as a lazily stepped cursor.
//!
//! # Invariants
//! - This layer performs no record validation; the provider does.
//! - Projections are limited to known columns before SQL is built.

pub mod cursor;
pub mod pet_repo;
