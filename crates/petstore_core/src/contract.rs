//! Storage and addressing contract for pet records.
//!
//! # Responsibility
//! - Name the `pets` table and its columns in one place.
//! - Define the identifier shapes and content-type tags callers build on.
//!
//! # Invariants
//! - `ALL_COLUMNS` is in schema order and is the default projection.
//! - Column names here must match `db/migrations/0001_pets.sql`.

/// Gender codes persisted in `pets.gender`.
pub use crate::model::pet::{is_valid_gender, Gender};

/// Default content authority used when no configuration overrides it.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";

/// Default scheme used when building identifiers.
pub const CONTENT_SCHEME: &str = "content";

/// Path segment addressing the pets collection.
pub const PATH_PETS: &str = "pets";

/// Content-type tag for identifiers addressing the whole collection.
pub const CONTENT_LIST_TYPE: &str = "vnd.petstore.cursor.dir/pets";

/// Content-type tag for identifiers addressing a single pet.
pub const CONTENT_ITEM_TYPE: &str = "vnd.petstore.cursor.item/pets";

pub const TABLE_NAME: &str = "pets";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_PET_NAME: &str = "name";
pub const COLUMN_PET_BREED: &str = "breed";
pub const COLUMN_PET_GENDER: &str = "gender";
pub const COLUMN_PET_WEIGHT: &str = "weight";

/// Every column of the `pets` table in schema order.
pub const ALL_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_PET_NAME,
    COLUMN_PET_BREED,
    COLUMN_PET_GENDER,
    COLUMN_PET_WEIGHT,
];

/// Returns the canonical spelling of `name` when it is a known column.
pub fn known_column(name: &str) -> Option<&'static str> {
    ALL_COLUMNS.iter().copied().find(|column| *column == name)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_gender, known_column, Gender, ALL_COLUMNS, COLUMN_ID};

    #[test]
    fn known_column_is_exact_match() {
        assert_eq!(known_column("_id"), Some(COLUMN_ID));
        assert_eq!(known_column("NAME"), None);
        assert_eq!(known_column("name; DROP TABLE pets"), None);
    }

    #[test]
    fn identity_column_leads_projection() {
        assert_eq!(ALL_COLUMNS[0], COLUMN_ID);
        assert_eq!(ALL_COLUMNS.len(), 5);
    }

    #[test]
    fn gender_codes_are_part_of_the_contract() {
        assert_eq!(Gender::Unknown.code(), 0);
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Gender::Female.code(), 2);
        assert!(is_valid_gender(2));
        assert!(!is_valid_gender(3));
    }
}
