//! Domain model for pet records.
//!
//! # Responsibility
//! - Define the persisted record shape and its write payload.
//! - Keep record invariants next to the data they constrain.
//!
//! # Invariants
//! - Every persisted pet is identified by a storage-assigned `PetId`.
//! - Payloads are validated before they reach storage.

pub mod pet;
