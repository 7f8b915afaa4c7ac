//! Pet record model and write-payload invariants.
//!
//! # Responsibility
//! - Define the persisted `Pet` shape and the partial `PetValues` payload.
//! - Own the invariant checks applied before any insert or update.
//!
//! # Invariants
//! - `name` must be present on insert; emptiness is allowed.
//! - `gender`, when supplied, must decode to a `Gender` variant. A strict
//!   update must supply it; only insert may fall back to `Gender::Unknown`.
//! - `weight`, when supplied, must be `>= 0`.
//! - Checks run in that order and the first failure wins.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row identity.
pub type PetId = i64;

/// Closed gender enum persisted as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Integer code stored in `pets.gender`.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Returns whether `code` is one of the persisted gender codes.
pub fn is_valid_gender(code: i64) -> bool {
    Gender::from_code(code).is_some()
}

/// One fully materialized row of the `pets` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    /// `None` when the breed column is NULL. Empty strings round-trip as-is.
    pub breed: Option<String>,
    pub gender: Gender,
    pub weight: i64,
}

impl Pet {
    /// Builds a payload that rewrites every mutable column of this pet.
    pub fn to_values(&self) -> PetValues {
        PetValues {
            name: Some(self.name.clone()),
            breed: self.breed.clone(),
            gender: Some(self.gender.code()),
            weight: Some(self.weight),
        }
    }
}

/// Partial write payload for insert and update.
///
/// Absent fields are not written: on insert the column default applies, on
/// update the stored value is kept. Gender is carried as a raw code so that
/// out-of-range input can be represented and rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetValues {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub gender: Option<i64>,
    #[serde(default)]
    pub weight: Option<i64>,
}

impl PetValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender.code());
        self
    }

    /// Sets a raw gender code without checking it.
    pub fn gender_code(mut self, code: i64) -> Self {
        self.gender = Some(code);
        self
    }

    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Returns whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.breed.is_none() && self.gender.is_none() && self.weight.is_none()
    }

    /// Checks the payload for an insert. The name is always required.
    pub fn validate_for_insert(&self) -> Result<(), PetValidationError> {
        self.validate(true, false)
    }

    /// Checks the payload for an update under the given policy.
    ///
    /// `Strict` requires both name and gender to be re-supplied.
    pub fn validate_for_update(&self, policy: ValidationPolicy) -> Result<(), PetValidationError> {
        let strict = policy == ValidationPolicy::Strict;
        self.validate(strict, strict)
    }

    fn validate(
        &self,
        require_name: bool,
        require_gender: bool,
    ) -> Result<(), PetValidationError> {
        if require_name && self.name.is_none() {
            return Err(PetValidationError::MissingName);
        }
        match self.gender {
            Some(code) if !is_valid_gender(code) => {
                return Err(PetValidationError::InvalidGender(Some(code)));
            }
            None if require_gender => return Err(PetValidationError::InvalidGender(None)),
            _ => {}
        }
        if let Some(weight) = self.weight {
            if weight < 0 {
                return Err(PetValidationError::InvalidWeight(weight));
            }
        }
        Ok(())
    }
}

/// How much of the invariant set an update payload is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Name and gender must be re-supplied on every update.
    #[default]
    Strict,
    /// Only the fields present in the payload are checked.
    PresentFieldsOnly,
}

/// Payload invariant violation. Raised before any storage access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetValidationError {
    MissingName,
    /// `None` when a strict update omits the gender.
    InvalidGender(Option<i64>),
    InvalidWeight(i64),
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "pet requires a name"),
            Self::InvalidGender(Some(code)) => write!(f, "pet requires valid gender, got {code}"),
            Self::InvalidGender(None) => write!(f, "pet requires valid gender"),
            Self::InvalidWeight(weight) => write!(f, "pet requires valid weight, got {weight}"),
        }
    }
}

impl Error for PetValidationError {}
