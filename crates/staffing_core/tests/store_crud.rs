use staffing_core::db::open_db_in_memory;
use staffing_core::{
    RepoError, Rule, SqliteStoreRepository, Store, StoreRepository, StoreScope, StoreService,
};
use uuid::Uuid;

fn store(name: &str) -> Store {
    Store::new(
        name,
        "5000 Forbes Ave",
        "Pittsburgh",
        "PA",
        "15213",
        "412-268-8000",
    )
}

fn names(stores: &[Store]) -> Vec<&str> {
    stores.iter().map(|store| store.name.as_str()).collect()
}

#[test]
fn create_and_get_roundtrip_normalizes_phone() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    let created = repo.create_store(&store("Oakland")).unwrap();
    assert_eq!(created.phone, "4122688000");
    assert!(created.active);

    let loaded = repo.get_store(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn every_phone_format_normalizes_to_digits() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    let inputs = ["(304) 123-4567", "304-123-4567", "304.123.4567", "3041234567"];
    for (index, phone) in inputs.iter().enumerate() {
        let mut candidate = store(&format!("Store {index}"));
        candidate.phone = phone.to_string();
        let created = repo.create_store(&candidate).unwrap();
        assert_eq!(created.phone, "3041234567", "input {phone}");
    }
}

#[test]
fn blank_required_fields_are_each_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    for field in ["name", "street", "city", "state", "zip", "phone"] {
        let mut candidate = store("Shadyside");
        match field {
            "name" => candidate.name = "  ".to_string(),
            "street" => candidate.street.clear(),
            "city" => candidate.city.clear(),
            "state" => candidate.state.clear(),
            "zip" => candidate.zip.clear(),
            _ => candidate.phone.clear(),
        }

        let errors = repo.validate_store(&candidate).unwrap();
        assert!(!errors.is_valid(), "{field} blank should be invalid");
        assert!(errors.has(field, Rule::Presence), "{field}: {errors}");
    }
}

#[test]
fn zip_must_be_exactly_five_digits() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    for zip in ["1234", "123456", "1234a"] {
        let mut candidate = store("Squirrel Hill");
        candidate.zip = zip.to_string();
        let errors = repo.validate_store(&candidate).unwrap();
        assert!(errors.has("zip", Rule::Format), "zip {zip} should fail");
    }

    let mut candidate = store("Squirrel Hill");
    candidate.zip = "15217".to_string();
    assert!(repo.validate_store(&candidate).unwrap().is_valid());
}

#[test]
fn unsupported_state_is_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    let mut candidate = store("Erie");
    candidate.state = "NY".to_string();
    let err = repo.create_store(&candidate).unwrap_err();

    let errors = err.validation().unwrap();
    assert!(errors.has("state", Rule::Inclusion));
    assert!(repo.get_store(candidate.id).unwrap().is_none());
}

#[test]
fn names_differing_only_by_case_cannot_both_persist() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    repo.create_store(&store("CMU")).unwrap();
    let err = repo.create_store(&store("cmu")).unwrap_err();

    match err {
        RepoError::Validation(errors) => {
            assert!(errors.has("name", Rule::Uniqueness));
            assert_eq!(errors.messages("name"), vec!["has already been taken"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.list_stores(&StoreScope::all()).unwrap().len(), 1);
}

#[test]
fn update_does_not_collide_with_itself() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    let mut created = repo.create_store(&store("Downtown")).unwrap();
    created.name = "DOWNTOWN".to_string();
    created.street = "1 Market Sq".to_string();
    let updated = repo.update_store(&created).unwrap();

    let loaded = repo.get_store(updated.id).unwrap().unwrap();
    assert_eq!(loaded.name, "DOWNTOWN");
    assert_eq!(loaded.street, "1 Market Sq");
}

#[test]
fn update_missing_store_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    let ghost = store("Ghost");
    let err = repo.update_store(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "store", id } if id == ghost.id));
}

#[test]
fn alphabetical_uses_ordinal_comparison() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    for name in ["Pittsburgh", "altoona", "Cleveland", "Bethany"] {
        repo.create_store(&store(name)).unwrap();
    }

    let ordered = repo
        .list_stores(&StoreScope::all().alphabetical())
        .unwrap();
    assert_eq!(
        names(&ordered),
        vec!["Bethany", "Cleveland", "Pittsburgh", "altoona"]
    );
}

#[test]
fn unordered_listing_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    for name in ["Cleveland", "Bethany", "Pittsburgh"] {
        repo.create_store(&store(name)).unwrap();
    }

    let listed = repo.list_stores(&StoreScope::all()).unwrap();
    assert_eq!(names(&listed), vec!["Cleveland", "Bethany", "Pittsburgh"]);
}

#[test]
fn active_and_inactive_scopes_partition_stores() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    repo.create_store(&store("Open One")).unwrap();
    let mut closed = store("Closed One");
    closed.make_inactive();
    repo.create_store(&closed).unwrap();

    let active = repo.list_stores(&StoreScope::all().active()).unwrap();
    let inactive = repo.list_stores(&StoreScope::all().inactive()).unwrap();
    assert_eq!(names(&active), vec!["Open One"]);
    assert_eq!(names(&inactive), vec!["Closed One"]);

    let contradictory = repo
        .list_stores(&StoreScope::all().active().inactive())
        .unwrap();
    assert!(contradictory.is_empty());
}

#[test]
fn limit_and_offset_page_through_ordered_results() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    for name in ["Delta", "Alpha", "Charlie", "Bravo"] {
        repo.create_store(&store(name)).unwrap();
    }

    let page = repo
        .list_stores(&StoreScope::all().alphabetical().limit(2).offset(1))
        .unwrap();
    assert_eq!(names(&page), vec!["Bravo", "Charlie"]);

    let tail = repo
        .list_stores(&StoreScope::all().alphabetical().offset(3))
        .unwrap();
    assert_eq!(names(&tail), vec!["Delta"]);
}

#[test]
fn make_inactive_and_make_active_persist() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteStoreRepository::try_new(&conn).unwrap());

    let mut created = service.create_store(&store("Monroeville")).unwrap();

    service.make_inactive(&mut created).unwrap();
    assert!(!created.active);
    assert!(!service.get_store(created.id).unwrap().unwrap().active);

    service.make_active(&mut created).unwrap();
    assert!(created.active);
    assert!(service.get_store(created.id).unwrap().unwrap().active);
}

#[test]
fn failed_transition_leaves_caller_record_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteStoreRepository::try_new(&conn).unwrap());

    let mut unsaved = store("Never Saved");
    let err = service.make_inactive(&mut unsaved).unwrap_err();

    assert_eq!(err.code(), "not_found");
    assert!(unsaved.active);
}

#[test]
fn service_reports_validity_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = StoreService::new(SqliteStoreRepository::try_new(&conn).unwrap());

    let mut candidate = store("Wexford");
    assert!(service.is_valid(&candidate).unwrap());

    candidate.phone = "412".to_string();
    assert!(!service.is_valid(&candidate).unwrap());
    assert!(service.list_stores(&StoreScope::all()).unwrap().is_empty());
}

#[test]
fn delete_and_delete_all() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    let first = repo.create_store(&store("First")).unwrap();
    repo.create_store(&store("Second")).unwrap();
    repo.create_store(&store("Third")).unwrap();

    repo.delete_store(first.id).unwrap();
    assert!(repo.get_store(first.id).unwrap().is_none());

    let err = repo.delete_store(first.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "store", .. }));

    assert_eq!(repo.delete_all_stores().unwrap(), 2);
    assert!(repo.list_stores(&StoreScope::all()).unwrap().is_empty());
}

#[test]
fn nil_id_is_rejected() {
    let err = store("Nil").with_id(Uuid::nil()).unwrap_err();
    assert!(err.has("id", Rule::Presence));
}

#[test]
fn names_differing_only_by_non_ascii_case_cannot_both_persist() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    repo.create_store(&store("Élan")).unwrap();
    let err = repo.create_store(&store("éLAN")).unwrap_err();

    assert!(err.validation().unwrap().has("name", Rule::Uniqueness));
    assert_eq!(names(&repo.list_stores(&StoreScope::all()).unwrap()), vec!["Élan"]);
}

#[test]
fn renaming_into_non_ascii_case_variant_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    repo.create_store(&store("Straße Ünion")).unwrap();
    let mut other = repo.create_store(&store("Other")).unwrap();
    other.name = "STRASSE".to_string();
    repo.update_store(&other).unwrap();

    other.name = "straße üNION".to_string();
    let err = repo.update_store(&other).unwrap_err();
    assert!(err.validation().unwrap().has("name", Rule::Uniqueness));
    assert_eq!(repo.get_store(other.id).unwrap().unwrap().name, "STRASSE");
}

#[test]
fn creating_same_draft_twice_hits_unique_index() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStoreRepository::try_new(&conn).unwrap();

    let draft = store("Twice");
    repo.create_store(&draft).unwrap();
    let err = repo.create_store(&draft).unwrap_err();

    assert!(
        matches!(err, RepoError::UniqueViolation { table: "stores", .. }),
        "unexpected error: {err}"
    );
    assert_eq!(err.code(), "unique_violation");
    assert_eq!(repo.list_stores(&StoreScope::all()).unwrap().len(), 1);
}
