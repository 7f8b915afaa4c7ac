//! Identifier-addressed access to pet records.
//!
//! # Responsibility
//! - Classify identifiers into collection or item routes.
//! - Mediate validated CRUD calls into the table repository.
//!
//! # Invariants
//! - Every call is routed before any storage access.
//! - Routes are computed per call and never cached.

pub mod pet_provider;
pub mod router;
