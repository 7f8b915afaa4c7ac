use petstore_core::contract::{CONTENT_AUTHORITY, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE};
use petstore_core::{DbTarget, Operation, PetStoreConfig, PetUriMatcher, ProviderError, Route};

#[test]
fn every_non_negative_id_classifies_as_item() {
    let matcher = PetUriMatcher::new(CONTENT_AUTHORITY).unwrap();
    for id in [0_i64, 1, 9, 10, 255, 65_536, 1_000_000_007, i64::MAX] {
        let uri = format!("//{CONTENT_AUTHORITY}/pets/{id}");
        assert_eq!(matcher.classify(&uri), Route::Item(id), "{uri}");
    }
}

#[test]
fn leading_zeros_parse_to_the_same_identity() {
    let matcher = PetUriMatcher::new(CONTENT_AUTHORITY).unwrap();
    assert_eq!(
        matcher.classify(&format!("//{CONTENT_AUTHORITY}/pets/007")),
        Route::Item(7)
    );
}

#[test]
fn custom_authority_does_not_match_default_identifiers() {
    let matcher = PetUriMatcher::new("org.example.shelter").unwrap();
    assert_eq!(
        matcher.classify("content://org.example.shelter/pets"),
        Route::Collection
    );
    assert_eq!(
        matcher.classify(&format!("content://{CONTENT_AUTHORITY}/pets")),
        Route::Unrecognized
    );
}

#[test]
fn get_type_reports_content_tags() {
    let provider = PetStoreConfig {
        database: DbTarget::Memory,
        ..PetStoreConfig::default()
    }
    .build_provider()
    .unwrap();
    let matcher = provider.matcher();

    assert_eq!(
        provider.get_type(&matcher.collection_uri()).unwrap(),
        CONTENT_LIST_TYPE
    );
    assert_eq!(
        provider.get_type(&matcher.item_uri(4)).unwrap(),
        CONTENT_ITEM_TYPE
    );

    let err = provider.get_type("content://elsewhere/pets").unwrap_err();
    assert!(matches!(
        err,
        ProviderError::UnrecognizedRoute {
            operation: Operation::GetType,
            ..
        }
    ));
    assert!(!provider.helper().is_open());
}
