//! Identifier classification for the pets provider.
//!
//! # Responsibility
//! - Register the collection and item identifier shapes for one authority.
//! - Classify incoming identifiers into a `Route` without side effects.
//!
//! # Invariants
//! - Matching is exact and case-sensitive on authority and path segment.
//! - The item id segment is ASCII digits only and must fit in `PetId`.
//! - Identifiers with trailing slashes, queries or fragments never match.

use crate::contract::{CONTENT_SCHEME, PATH_PETS};
use crate::model::pet::PetId;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Classification of one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Addresses every pet.
    Collection,
    /// Addresses exactly one pet by identity.
    Item(PetId),
    Unrecognized,
}

impl Route {
    /// Stable label used in log lines.
    pub fn kind(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Item(_) => "item",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Configuration error raised while registering identifier shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAuthority(pub String);

impl Display for InvalidAuthority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid content authority `{}`", self.0)
    }
}

impl std::error::Error for InvalidAuthority {}

/// Static route table for one content authority.
#[derive(Debug, Clone)]
pub struct PetUriMatcher {
    authority: String,
    pattern: Regex,
}

impl PetUriMatcher {
    /// Registers `//{authority}/pets` and `//{authority}/pets/{id}`.
    ///
    /// # Errors
    /// - Authority is blank, contains `/`, or contains whitespace.
    pub fn new(authority: &str) -> Result<Self, InvalidAuthority> {
        if authority.is_empty()
            || authority.contains('/')
            || authority.chars().any(char::is_whitespace)
        {
            return Err(InvalidAuthority(authority.to_string()));
        }

        // Optional `scheme:` prefix, then the two registered shapes.
        let pattern = Regex::new(&format!(
            r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:)?//{}/{}(?:/([0-9]+))?$",
            regex::escape(authority),
            regex::escape(PATH_PETS)
        ))
        .map_err(|_| InvalidAuthority(authority.to_string()))?;

        Ok(Self {
            authority: authority.to_string(),
            pattern,
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Classifies `uri` against the registered shapes.
    pub fn classify(&self, uri: &str) -> Route {
        let Some(captures) = self.pattern.captures(uri) else {
            return Route::Unrecognized;
        };

        match captures.get(1) {
            None => Route::Collection,
            Some(id) => id
                .as_str()
                .parse::<PetId>()
                .map_or(Route::Unrecognized, Route::Item),
        }
    }

    /// Identifier addressing the whole collection.
    pub fn collection_uri(&self) -> String {
        format!("{CONTENT_SCHEME}://{}/{PATH_PETS}", self.authority)
    }

    /// Identifier addressing the pet with identity `id`.
    pub fn item_uri(&self, id: PetId) -> String {
        with_appended_id(&self.collection_uri(), id)
    }
}

/// Appends `id` as a trailing path segment.
pub fn with_appended_id(uri: &str, id: PetId) -> String {
    if uri.ends_with('/') {
        format!("{uri}{id}")
    } else {
        format!("{uri}/{id}")
    }
}
