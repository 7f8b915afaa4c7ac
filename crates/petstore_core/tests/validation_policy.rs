use petstore_core::{
    DbTarget, Gender, PetProvider, PetStoreConfig, PetValidationError, PetValues, ProviderError,
    Route, Selection, ValidationPolicy,
};

fn relaxed_provider() -> PetProvider {
    PetStoreConfig {
        database: DbTarget::Memory,
        validation_policy: ValidationPolicy::PresentFieldsOnly,
        ..PetStoreConfig::default()
    }
    .build_provider()
    .unwrap()
}

fn insert_toto(provider: &PetProvider) -> i64 {
    let uri = provider
        .insert(
            &provider.matcher().collection_uri(),
            &PetValues::new()
                .name("Toto")
                .breed("Terrier")
                .gender(Gender::Male)
                .weight(7),
        )
        .unwrap();
    match provider.matcher().classify(&uri) {
        Route::Item(id) => id,
        other => panic!("unexpected route {other:?}"),
    }
}

#[test]
fn relaxed_policy_allows_weight_only_update() {
    let provider = relaxed_provider();
    let id = insert_toto(&provider);

    let changed = provider
        .update(
            &provider.matcher().item_uri(id),
            &PetValues::new().weight(11),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(changed, 1);

    let pets = provider
        .query(&provider.matcher().item_uri(id), None, &Selection::all(), None)
        .unwrap()
        .collect_pets()
        .unwrap();
    assert_eq!(pets[0].name, "Toto");
    assert_eq!(pets[0].weight, 11);
    assert_eq!(pets[0].gender, Gender::Male);
}

#[test]
fn relaxed_policy_still_checks_present_fields() {
    let provider = relaxed_provider();
    let id = insert_toto(&provider);
    let uri = provider.matcher().item_uri(id);

    let err = provider
        .update(&uri, &PetValues::new().gender_code(5), &Selection::all())
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(PetValidationError::InvalidGender(Some(5)))
    ));

    let err = provider
        .update(&uri, &PetValues::new().weight(-1), &Selection::all())
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(PetValidationError::InvalidWeight(-1))
    ));
}

#[test]
fn relaxed_policy_empty_update_changes_nothing() {
    let provider = relaxed_provider();
    insert_toto(&provider);

    let changed = provider
        .update(
            &provider.matcher().collection_uri(),
            &PetValues::new(),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(changed, 0);
}

#[test]
fn relaxed_policy_does_not_relax_insert() {
    let provider = relaxed_provider();
    let err = provider
        .insert(
            &provider.matcher().collection_uri(),
            &PetValues::new().weight(2),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(PetValidationError::MissingName)
    ));
}
