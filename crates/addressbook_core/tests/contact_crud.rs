use addressbook_core::{
    Contact, ContactRepository, ContactService, DeleteOutcome, SqliteContactStore, StoreError,
    UpdateOutcome,
};
use std::collections::HashSet;
use tempfile::TempDir;

fn temp_store() -> (TempDir, SqliteContactStore) {
    let dir = tempfile::tempdir().unwrap();
    let descriptor = format!("Data Source={}", dir.path().join("book.db").display());
    let store = SqliteContactStore::open(&descriptor).unwrap();
    (dir, store)
}

fn contact(first: &str, last: &str, city: &str) -> Contact {
    let mut contact = Contact::new(first, last);
    contact.address = format!("1 {last} Street");
    contact.city = city.to_string();
    contact.state = "NY".to_string();
    contact.zip = 10001;
    contact.phone_number = 5_551_234_567;
    contact.email = format!("{}@example.com", first.to_lowercase());
    contact
}

#[test]
fn insert_then_list_roundtrip() {
    let (_dir, store) = temp_store();
    let ada = contact("Ada", "Lovelace", "New York");

    let report = store.put_contacts(std::slice::from_ref(&ada));
    assert!(report.is_complete());

    let listed = store.get_contacts().unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].id > 0);
    assert_eq!(
        listed[0],
        Contact {
            id: listed[0].id,
            ..ada
        }
    );
}

#[test]
fn assigned_ids_are_positive_and_distinct() {
    let (_dir, store) = temp_store();
    let batch = vec![
        contact("Ada", "Lovelace", "London"),
        contact("Alan", "Turing", "Wilmslow"),
        contact("Grace", "Hopper", "Arlington"),
    ];

    let report = store.put_contacts(&batch);
    let ids = report.inserted_ids();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| *id > 0));
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 3);

    let listed: Vec<_> = store
        .get_contacts()
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn caller_supplied_id_is_not_forwarded() {
    let (_dir, store) = temp_store();
    let mut ada = contact("Ada", "Lovelace", "London");
    ada.id = 999;

    let report = store.put_contacts(&[ada.clone(), ada]);
    let ids = report.inserted_ids();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&999));
}

#[test]
fn update_changes_only_target_row() {
    let (_dir, store) = temp_store();
    let report = store.put_contacts(&[
        contact("Ada", "Lovelace", "London"),
        contact("Alan", "Turing", "Wilmslow"),
    ]);
    let ids = report.inserted_ids();
    let before = store.get_contacts().unwrap();

    let mut changed = before[0].clone();
    changed.first_name = "Augusta".to_string();
    changed.city = "Marylebone".to_string();
    changed.zip = 99_999_999_999;
    changed.phone_number = 4_402_071_234_567;
    assert_eq!(store.update_contact(&changed).unwrap(), UpdateOutcome::Updated);

    let after = store.get_contacts().unwrap();
    assert_eq!(after[0], changed);
    assert_eq!(after[0].id, ids[0]);
    assert_eq!(after[1], before[1]);
}

#[test]
fn update_unknown_id_reports_not_found() {
    let (_dir, store) = temp_store();
    store.put_contacts(&[contact("Ada", "Lovelace", "London")]);
    let before = store.get_contacts().unwrap();

    let mut ghost = contact("Nobody", "Here", "Nowhere");
    ghost.id = before[0].id + 100;
    assert_eq!(store.update_contact(&ghost).unwrap(), UpdateOutcome::NotFound);

    assert_eq!(store.get_contacts().unwrap(), before);
}

#[test]
fn update_rejects_invalid_contact_without_touching_row() {
    let (_dir, store) = temp_store();
    store.put_contacts(&[contact("Ada", "Lovelace", "London")]);
    let before = store.get_contacts().unwrap();

    let mut invalid = before[0].clone();
    invalid.email = "x".repeat(300);
    let err = store.update_contact(&invalid).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    assert_eq!(store.get_contacts().unwrap(), before);
}

#[test]
fn delete_by_name_removes_all_matches_and_nothing_else() {
    let (_dir, store) = temp_store();
    store.put_contacts(&[
        contact("Ada", "Lovelace", "London"),
        contact("Ada", "Lovelace", "Paris"),
        contact("Ada", "Byron", "London"),
        contact("Alan", "Lovelace", "London"),
    ]);

    let outcome = store.delete_contact_by_name("Ada", "Lovelace").unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted(2));

    let remaining: Vec<_> = store
        .get_contacts()
        .unwrap()
        .into_iter()
        .map(|item| item.full_name())
        .collect();
    assert_eq!(remaining, vec!["Ada Byron", "Alan Lovelace"]);
}

#[test]
fn delete_without_match_reports_not_found() {
    let (_dir, store) = temp_store();
    store.put_contacts(&[contact("Ada", "Lovelace", "London")]);

    let outcome = store.delete_contact_by_name("ada", "lovelace").unwrap();
    assert_eq!(outcome, DeleteOutcome::NotFound);
    assert_eq!(store.get_contacts().unwrap().len(), 1);
}

#[test]
fn listing_empty_table_returns_empty_vec() {
    let (_dir, store) = temp_store();
    assert!(store.get_contacts().unwrap().is_empty());
}

#[test]
fn insert_list_delete_example_flow() {
    let (_dir, store) = temp_store();
    let ada = contact("Ada", "Lovelace", "New York");
    store.put_contacts(&[ada]);

    let listed = store.get_contacts().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
    assert_eq!(listed[0].zip, 10001);
    assert_eq!(listed[0].phone_number, 5_551_234_567);

    assert_eq!(
        store.delete_contact_by_name("Ada", "Lovelace").unwrap(),
        DeleteOutcome::Deleted(1)
    );
    assert!(store.get_contacts().unwrap().is_empty());
}

#[test]
fn empty_text_fields_are_persisted() {
    let (_dir, store) = temp_store();
    let blank = Contact::new("", "");

    let report = store.put_contacts(std::slice::from_ref(&blank));
    assert!(report.is_complete());

    let listed = store.get_contacts().unwrap();
    assert_eq!(listed[0].first_name, "");
    assert_eq!(listed[0].email, "");
}

#[test]
fn service_wraps_repository_calls() {
    let (_dir, store) = temp_store();
    let service = ContactService::new(store);

    let id = service
        .add_contact(&contact("Grace", "Hopper", "Arlington"))
        .unwrap();
    let listed = service.list_contacts().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);

    let mut invalid = contact("Grace", "Hopper", "Arlington");
    invalid.zip = -1;
    assert!(matches!(
        service.add_contact(&invalid),
        Err(StoreError::Validation(_))
    ));

    assert_eq!(
        service.delete_contact("Grace", "Hopper").unwrap(),
        DeleteOutcome::Deleted(1)
    );
}
