use std_util::prelude::*;
use tests::{mapper, models::*, MockConnection};

fn stored(db: &mut MockConnection) {
    db.db()
        .execute_batch("INSERT INTO BICYCLES VALUES ('Trek', 'Steel', 'Rigid', NULL);")
        .unwrap();
}

#[test]
fn new_instance_has_changes() {
    let mapper = mapper();
    let bicycle = Bicycle::new("Trek", "Steel", "Rigid");

    assert!(!bicycle.snapshot.is_captured());
    assert!(assert_ok!(mapper.has_changes(&bicycle)));
}

#[test]
fn loaded_instance_has_no_changes_until_modified() {
    let mut db = MockConnection::new();
    stored(&mut db);
    let mapper = mapper();

    let mut bicycle = Bicycle::named("Trek");
    assert_ok!(mapper.load(&mut bicycle, &mut db));
    assert!(bicycle.snapshot.is_captured());
    assert!(!assert_ok!(mapper.has_changes(&bicycle)));

    bicycle.fork = Some("Suspension".to_string());
    assert!(assert_ok!(mapper.has_changes(&bicycle)));

    // Restoring the loaded value counts as unchanged.
    bicycle.fork = Some("Rigid".to_string());
    assert!(!assert_ok!(mapper.has_changes(&bicycle)));
}

#[test]
fn persist_if_changed_writes_only_changes() {
    let mut db = MockConnection::new();
    let mapper = mapper();

    let mut bicycle = Bicycle::new("Trek", "Steel", "Rigid");
    assert!(assert_ok!(mapper.persist_if_changed(&mut bicycle, &mut db)));
    assert_eq!(db.count("INSERT INTO BICYCLES"), 1);

    assert!(!assert_ok!(mapper.persist_if_changed(&mut bicycle, &mut db)));
    assert_eq!(db.count("INSERT"), 1);
    assert_eq!(db.count("UPDATE"), 0);

    bicycle.frame = Some("Carbon".to_string());
    assert!(assert_ok!(mapper.persist_if_changed(&mut bicycle, &mut db)));
    assert_eq!(db.count("UPDATE BICYCLES"), 1);

    let mut reloaded = Bicycle::named("Trek");
    assert_ok!(mapper.load(&mut reloaded, &mut db));
    assert_eq!(reloaded.frame.as_deref(), Some("Carbon"));
}

#[test]
fn failed_persist_keeps_the_old_snapshot() {
    let mut db = MockConnection::new();
    db.fail_on("INSERT");
    let mapper = mapper();

    let mut bicycle = Bicycle::new("Trek", "Steel", "Rigid");
    assert_persistence_err!(mapper.persist_if_changed(&mut bicycle, &mut db));

    assert!(!bicycle.snapshot.is_captured());
    assert!(assert_ok!(mapper.has_changes(&bicycle)));
}

#[test]
fn cleared_snapshot_reports_changes() {
    let mut db = MockConnection::new();
    stored(&mut db);
    let mapper = mapper();

    let mut bicycle = Bicycle::named("Trek");
    assert_ok!(mapper.load(&mut bicycle, &mut db));
    assert!(!assert_ok!(mapper.has_changes(&bicycle)));

    bicycle.snapshot.clear();
    assert!(assert_ok!(mapper.has_changes(&bicycle)));

    assert_ok!(mapper.capture_snapshot(&mut bicycle));
    assert!(!assert_ok!(mapper.has_changes(&bicycle)));
}

#[test]
fn untracked_type_always_has_changes() {
    let mut db = MockConnection::new();
    let mapper = mapper();

    let mut part = Part {
        id: Some(1),
        name: Some("Chain".to_string()),
        origin: None,
    };
    assert!(assert_ok!(mapper.persist_if_changed(&mut part, &mut db)));
    assert!(assert_ok!(mapper.persist_if_changed(&mut part, &mut db)));
    assert_eq!(db.count("INSERT INTO PARTS"), 1);
    assert_eq!(db.count("UPDATE PARTS"), 1);
}

#[test]
fn relation_values_are_not_tracked() {
    let mut db = MockConnection::new();
    db.db()
        .execute_batch(
            "INSERT INTO TEAMS VALUES (10, 'Blue', 1);
             INSERT INTO RIDERS VALUES (1, 'Ann', 10);",
        )
        .unwrap();
    let mapper = mapper();

    let mut rider = Rider {
        id: Some(1),
        ..Rider::default()
    };
    assert_ok!(mapper.load(&mut rider, &mut db));
    assert!(rider.team.is_some());
    assert!(!assert_ok!(mapper.has_changes(&rider)));

    rider.team = None;
    assert!(!assert_ok!(mapper.has_changes(&rider)));

    rider.name = Some("Bea".to_string());
    assert!(assert_ok!(mapper.has_changes(&rider)));
}
