use petstore_core::db::open_db_in_memory;
use petstore_core::{
    DbTarget, Gender, Operation, Pet, PetDbHelper, PetProvider, PetStoreConfig, PetUriMatcher,
    PetValidationError, PetValues, ProviderError, RepoError, Route, Selection,
    SqlitePetRepository, ValidationPolicy,
};
use rusqlite::types::Value;

fn memory_provider(policy: ValidationPolicy) -> PetProvider {
    PetStoreConfig {
        database: DbTarget::Memory,
        validation_policy: policy,
        ..PetStoreConfig::default()
    }
    .build_provider()
    .unwrap()
}

fn toto() -> PetValues {
    PetValues::new()
        .name("Toto")
        .breed("Terrier")
        .gender(Gender::Male)
        .weight(7)
}

fn all_pets(provider: &PetProvider) -> Vec<Pet> {
    let uri = provider.matcher().collection_uri();
    provider
        .query(&uri, None, &Selection::all(), None)
        .unwrap()
        .collect_pets()
        .unwrap()
}

fn inserted_id(provider: &PetProvider, values: &PetValues) -> i64 {
    let uri = provider.matcher().collection_uri();
    let new_uri = provider.insert(&uri, values).unwrap();
    match provider.matcher().classify(&new_uri) {
        Route::Item(id) => id,
        other => panic!("insert returned non-item uri {new_uri}: {other:?}"),
    }
}

#[test]
fn insert_then_query_item_round_trips_every_field() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let id = inserted_id(&provider, &toto());

    let mut cursor = provider
        .query(&provider.matcher().item_uri(id), None, &Selection::all(), None)
        .unwrap();
    let pets = cursor.collect_pets().unwrap();

    assert_eq!(
        pets,
        vec![Pet {
            id,
            name: "Toto".to_string(),
            breed: Some("Terrier".to_string()),
            gender: Gender::Male,
            weight: 7,
        }]
    );
}

#[test]
fn insert_returns_input_uri_with_identity_appended() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let uri = "//com.example.android.pets/pets";

    let first = provider.insert(uri, &toto()).unwrap();
    let second = provider.insert(uri, &toto()).unwrap();

    assert!(first.starts_with("//com.example.android.pets/pets/"));
    assert_ne!(first, second);
}

#[test]
fn insert_applies_defaults_for_absent_fields() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let id = inserted_id(&provider, &PetValues::new().name(""));

    let pets = all_pets(&provider);
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].id, id);
    assert_eq!(pets[0].name, "");
    assert_eq!(pets[0].breed, None);
    assert_eq!(pets[0].gender, Gender::Unknown);
    assert_eq!(pets[0].weight, 0);
}

#[test]
fn insert_without_name_fails_and_never_reaches_storage() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let uri = provider.matcher().collection_uri();

    for values in [
        PetValues::new(),
        PetValues::new().breed("Tabby").gender(Gender::Female).weight(3),
        PetValues::new().gender_code(42).weight(-1),
    ] {
        let err = provider.insert(&uri, &values).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Validation(PetValidationError::MissingName)
        ));
    }
    assert!(!provider.helper().is_open());
    assert!(all_pets(&provider).is_empty());
}

#[test]
fn insert_rejects_out_of_range_gender_and_negative_weight() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let uri = provider.matcher().collection_uri();

    let err = provider
        .insert(&uri, &PetValues::new().name("Rex").gender_code(3))
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(PetValidationError::InvalidGender(Some(3)))
    ));

    let err = provider
        .insert(&uri, &PetValues::new().name("Rex").weight(-5))
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(PetValidationError::InvalidWeight(-5))
    ));
    assert_eq!(err.user_message(), "pet requires valid weight, got -5");

    assert!(all_pets(&provider).is_empty());
}

#[test]
fn insert_on_item_or_unknown_route_is_unrecognized() {
    let provider = memory_provider(ValidationPolicy::Strict);

    for uri in [
        provider.matcher().item_uri(1),
        "content://com.example.android.pets/dogs".to_string(),
    ] {
        let err = provider.insert(&uri, &toto()).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::UnrecognizedRoute {
                operation: Operation::Insert,
                ..
            }
        ));
    }
    assert!(all_pets(&provider).is_empty());
}

#[test]
fn query_collection_returns_all_rows_and_honors_sort_order() {
    let provider = memory_provider(ValidationPolicy::Strict);
    inserted_id(&provider, &toto().name("B-dog"));
    inserted_id(&provider, &toto().name("A-cat"));

    let names = |sort: Option<&str>| -> Vec<String> {
        provider
            .query(
                &provider.matcher().collection_uri(),
                None,
                &Selection::all(),
                sort,
            )
            .unwrap()
            .collect_pets()
            .unwrap()
            .into_iter()
            .map(|pet| pet.name)
            .collect()
    };

    let mut unordered = names(None);
    unordered.sort();
    assert_eq!(unordered, vec!["A-cat", "B-dog"]);
    assert_eq!(names(Some("name ASC")), vec!["A-cat", "B-dog"]);
    assert_eq!(names(Some("_id DESC")), vec!["A-cat", "B-dog"]);
    assert_eq!(names(Some("_id ASC")), vec!["B-dog", "A-cat"]);
}

#[test]
fn query_collection_passes_selection_through() {
    let provider = memory_provider(ValidationPolicy::Strict);
    inserted_id(&provider, &toto());
    inserted_id(&provider, &toto().name("Binx").gender(Gender::Female).weight(4));

    let selection = Selection::new(
        "gender = ? AND weight < ?",
        [Value::Integer(2), Value::Integer(5)],
    );
    let mut cursor = provider
        .query(&provider.matcher().collection_uri(), None, &selection, None)
        .unwrap();
    let pets = cursor.collect_pets().unwrap();

    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].name, "Binx");
}

#[test]
fn query_item_ignores_caller_selection() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let toto_id = inserted_id(&provider, &toto());
    inserted_id(&provider, &toto().name("Binx"));

    let everything = Selection::new("1 = 1", Vec::<Value>::new());
    let mut cursor = provider
        .query(&provider.matcher().item_uri(toto_id), None, &everything, None)
        .unwrap();
    let pets = cursor.collect_pets().unwrap();

    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].id, toto_id);
}

#[test]
fn query_projection_limits_columns_and_rows_are_lazy() {
    let provider = memory_provider(ValidationPolicy::Strict);
    for index in 0..3 {
        inserted_id(&provider, &toto().name(format!("pet-{index}")));
    }

    let projection = ["_id", "name", "breed"];
    let mut cursor = provider
        .query(
            &provider.matcher().collection_uri(),
            Some(&projection[..]),
            &Selection::all(),
            Some("_id ASC"),
        )
        .unwrap();
    assert_eq!(cursor.columns(), &["_id", "name", "breed"]);

    let mut rows = cursor.rows().unwrap();
    let first = rows.next().unwrap().unwrap();
    assert_eq!(first.get_text("name").unwrap(), Some("pet-0"));
    assert_eq!(first.get_text("breed").unwrap(), Some("Terrier"));
    assert!(first.get("weight").is_none());
    assert!(matches!(first.to_pet(), Err(RepoError::InvalidData(_))));
    assert_eq!(rows.count(), 2);

    let restarted = cursor.collect_rows().unwrap();
    assert_eq!(restarted.len(), 3);
    assert_eq!(restarted[2].id().unwrap(), 3);
}

#[test]
fn query_with_unknown_projection_column_fails() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let result = provider.query(
        &provider.matcher().collection_uri(),
        Some(&["name", "owner"][..]),
        &Selection::all(),
        None,
    );

    assert!(matches!(
        result,
        Err(ProviderError::Storage(RepoError::UnknownColumn(column))) if column == "owner"
    ));
}

#[test]
fn query_on_unknown_route_fails() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let result = provider.query(
        "content://com.example.android.pets/pets/",
        None,
        &Selection::all(),
        None,
    );

    assert!(matches!(
        result,
        Err(ProviderError::UnrecognizedRoute {
            operation: Operation::Query,
            ..
        })
    ));
}

#[test]
fn update_item_targets_only_that_identity_even_with_caller_selection() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let toto_id = inserted_id(&provider, &toto());
    let binx_id = inserted_id(&provider, &toto().name("Binx"));

    let everything = Selection::new("1 = 1", Vec::<Value>::new());
    let changed = provider
        .update(
            &provider.matcher().item_uri(toto_id),
            &PetValues::new().name("Toto").gender(Gender::Male).weight(9),
            &everything,
        )
        .unwrap();
    assert_eq!(changed, 1);

    let pets = all_pets(&provider);
    let toto = pets.iter().find(|pet| pet.id == toto_id).unwrap();
    let binx = pets.iter().find(|pet| pet.id == binx_id).unwrap();
    assert_eq!(toto.weight, 9);
    assert_eq!(binx.weight, 7);
}

#[test]
fn update_missing_identity_affects_zero_rows() {
    let provider = memory_provider(ValidationPolicy::Strict);
    inserted_id(&provider, &toto());

    let changed = provider
        .update(
            &provider.matcher().item_uri(9_999),
            &toto(),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(changed, 0);
}

#[test]
fn update_collection_uses_caller_selection_and_blank_selection_updates_all() {
    let provider = memory_provider(ValidationPolicy::Strict);
    inserted_id(&provider, &toto());
    inserted_id(&provider, &toto().name("Binx"));
    inserted_id(&provider, &toto().name("Binx"));
    let uri = provider.matcher().collection_uri();

    let by_name = Selection::new("name = ?", ["Binx".to_string()]);
    let changed = provider
        .update(&uri, &PetValues::new().name("Binx").gender(Gender::Female), &by_name)
        .unwrap();
    assert_eq!(changed, 2);

    let changed = provider
        .update(
            &uri,
            &PetValues::new().name("Same").gender(Gender::Unknown),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(changed, 3);
    assert!(all_pets(&provider).iter().all(|pet| pet.name == "Same"));
}

#[test]
fn strict_update_requires_name_and_rejects_invalid_fields_before_storage() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let id = inserted_id(&provider, &toto());
    let uri = provider.matcher().item_uri(id);

    let err = provider
        .update(&uri, &PetValues::new().weight(3), &Selection::all())
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(PetValidationError::MissingName)
    ));

    let err = provider
        .update(&uri, &toto().gender_code(-1), &Selection::all())
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(PetValidationError::InvalidGender(Some(-1)))
    ));

    assert_eq!(all_pets(&provider)[0].weight, 7);
}

#[test]
fn strict_update_without_gender_is_rejected_and_row_unchanged() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let id = inserted_id(&provider, &toto());

    let err = provider
        .update(
            &provider.matcher().item_uri(id),
            &PetValues::new().name("Toto").weight(9),
            &Selection::all(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(PetValidationError::InvalidGender(None))
    ));
    assert_eq!(err.user_message(), "pet requires valid gender");

    let pets = all_pets(&provider);
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].gender, Gender::Male);
    assert_eq!(pets[0].weight, 7);
}

#[test]
fn update_on_unknown_route_fails_even_with_valid_payload() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let err = provider
        .update("content://com.example.android.pets", &toto(), &Selection::all())
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::UnrecognizedRoute {
            operation: Operation::Update,
            ..
        }
    ));
}

#[test]
fn delete_item_is_idempotent() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let id = inserted_id(&provider, &toto());
    inserted_id(&provider, &toto().name("Binx"));
    let uri = provider.matcher().item_uri(id);

    assert_eq!(provider.delete(&uri, &Selection::all()).unwrap(), 1);
    assert_eq!(provider.delete(&uri, &Selection::all()).unwrap(), 0);
    assert_eq!(all_pets(&provider).len(), 1);
}

#[test]
fn delete_collection_with_blank_selection_removes_everything() {
    let provider = memory_provider(ValidationPolicy::Strict);
    inserted_id(&provider, &toto());
    inserted_id(&provider, &toto().name("Binx"));
    let uri = provider.matcher().collection_uri();

    let removed = provider
        .delete(&uri, &Selection::new("", Vec::<Value>::new()))
        .unwrap();
    assert_eq!(removed, 2);
    assert!(all_pets(&provider).is_empty());
}

#[test]
fn delete_collection_honors_selection() {
    let provider = memory_provider(ValidationPolicy::Strict);
    inserted_id(&provider, &toto());
    inserted_id(&provider, &toto().weight(30));

    let removed = provider
        .delete(
            &provider.matcher().collection_uri(),
            &Selection::new("weight > ?", [10_i64]),
        )
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(all_pets(&provider)[0].weight, 7);
}

#[test]
fn delete_on_unknown_route_fails() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let err = provider
        .delete("content://com.example.android.pets/pets/x", &Selection::all())
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::UnrecognizedRoute {
            operation: Operation::Delete,
            ..
        }
    ));
}

#[test]
fn identities_are_not_reused_after_delete() {
    let provider = memory_provider(ValidationPolicy::Strict);
    let first = inserted_id(&provider, &toto());
    provider
        .delete(&provider.matcher().collection_uri(), &Selection::all())
        .unwrap();
    let second = inserted_id(&provider, &toto());
    assert!(second > first);
}

#[test]
fn provider_over_existing_connection_sees_repository_writes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::new(&conn);
    assert_eq!(repo.insert(&toto()).unwrap(), Some(1));
    assert_eq!(repo.count().unwrap(), 1);

    let provider = PetProvider::new(
        PetDbHelper::from_connection(DbTarget::Memory, conn),
        PetUriMatcher::new("com.example.android.pets").unwrap(),
        ValidationPolicy::Strict,
    );
    assert!(provider.helper().is_open());
    assert_eq!(all_pets(&provider).len(), 1);
}

#[test]
fn file_backed_provider_opens_lazily_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelter.db");
    let config = PetStoreConfig {
        database: DbTarget::File(path.clone()),
        ..PetStoreConfig::default()
    };

    {
        let provider = config.build_provider().unwrap();
        assert!(!path.exists());
        inserted_id(&provider, &toto());
    }

    let provider = config.build_provider().unwrap();
    assert_eq!(all_pets(&provider).len(), 1);
}
