use pretty_assertions::assert_eq;
use std_util::prelude::*;
use storm::{driver::Connection, Mapper};
use tests::{mapper, models::*, setup, MockConnection};

#[test]
fn persist_then_load_round_trips() {
    let mut db = setup();
    let mapper = mapper();

    assert_ok!(mapper.persist(&Bicycle::new("Trek", "Steel", "Rigid"), &mut db));

    let mut loaded = Bicycle::named("Trek");
    assert_ok!(mapper.load(&mut loaded, &mut db));

    assert_eq!(loaded.name.as_deref(), Some("Trek"));
    assert_eq!(loaded.frame.as_deref(), Some("Steel"));
    assert_eq!(loaded.fork.as_deref(), Some("Rigid"));
    assert_eq!(loaded.garage, None);
}

#[test]
fn load_overwrites_unsaved_values() {
    let mut db = setup();
    let mapper = mapper();

    assert_ok!(mapper.persist(&Bicycle::new("Trek", "Steel", "Rigid"), &mut db));

    let mut loaded = Bicycle::new("Trek", "Carbon", "Suspension");
    assert_ok!(mapper.load(&mut loaded, &mut db));

    assert_eq!(loaded.frame.as_deref(), Some("Steel"));
    assert_eq!(loaded.fork.as_deref(), Some("Rigid"));
}

#[test]
fn load_missing_record_is_a_persistence_error() {
    let mut db = setup();
    let mapper = mapper();

    let err = assert_persistence_err!(mapper.load(&mut Bicycle::named("Nope"), &mut db));
    assert!(err.is_record_not_found());
    assert!(!err.is_configuration());
    assert!(err.to_string().starts_with("persistence failed: unable to load instance of type [Bicycle]"));
}

#[test]
fn load_with_null_key_fails() {
    let mut db = setup();
    let mapper = mapper();

    let err = assert_persistence_err!(mapper.load(&mut Bicycle::default(), &mut db));
    assert!(err.to_string().contains("primary key column [NAME] of type [Bicycle] is null"));
}

#[test]
fn persist_inserts_then_updates() {
    let mut db = MockConnection::new();
    let mapper = mapper();

    let mut bicycle = Bicycle::new("Trek", "Steel", "Rigid");
    assert_ok!(mapper.persist(&bicycle, &mut db));

    bicycle.frame = Some("Carbon".to_string());
    assert_ok!(mapper.persist(&bicycle, &mut db));

    assert_eq!(db.count("INSERT INTO BICYCLES"), 1);
    assert_eq!(db.count("UPDATE BICYCLES"), 1);

    let mut loaded = Bicycle::named("Trek");
    assert_ok!(mapper.load(&mut loaded, &mut db));
    assert_eq!(loaded.frame.as_deref(), Some("Carbon"));
}

#[test]
fn persist_with_null_key_fails() {
    let mut db = setup();
    let mapper = mapper();

    let bicycle = Bicycle {
        frame: Some("Steel".to_string()),
        ..Bicycle::default()
    };
    assert_persistence_err!(mapper.persist(&bicycle, &mut db));
}

#[test]
fn insert_skips_suppressed_column() {
    let mut db = MockConnection::new();
    let mapper = mapper();

    let part = Part {
        id: Some(1),
        name: Some("bolt".to_string()),
        origin: Some("custom".to_string()),
    };
    assert_ok!(mapper.persist(&part, &mut db));

    let insert = db
        .log()
        .iter()
        .find(|text| text.starts_with("INSERT INTO PARTS"))
        .cloned()
        .unwrap();
    assert_eq!(insert, "INSERT INTO PARTS (ID, NAME) VALUES (:ID, :NAME)");

    let mut loaded = Part {
        id: Some(1),
        ..Part::default()
    };
    assert_ok!(mapper.load(&mut loaded, &mut db));
    assert_eq!(loaded.origin.as_deref(), Some("factory"));

    // Updates still write the column.
    assert_ok!(mapper.persist(&part, &mut db));
    assert_ok!(mapper.load(&mut loaded, &mut db));
    assert_eq!(loaded.origin.as_deref(), Some("custom"));
}

#[test]
fn delete_removes_the_record() {
    let mut db = setup();
    let mapper = mapper();

    assert_ok!(mapper.persist(&Bicycle::new("Trek", "Steel", "Rigid"), &mut db));
    assert_ok!(mapper.delete(&Bicycle::named("Trek"), &mut db));

    let err = assert_persistence_err!(mapper.load(&mut Bicycle::named("Trek"), &mut db));
    assert!(err.is_record_not_found());
}

#[test]
fn batch_load_filters_on_set_properties() {
    let mut db = setup();
    let mapper = mapper();

    for bicycle in [
        Bicycle::new("Trek", "Steel", "Rigid"),
        Bicycle::new("Giant", "Steel", "Suspension"),
        Bicycle::new("Canyon", "Carbon", "Rigid"),
    ] {
        assert_ok!(mapper.persist(&bicycle, &mut db));
    }

    let example = Bicycle {
        frame: Some("Steel".to_string()),
        ..Bicycle::default()
    };
    let mut names: Vec<_> = assert_ok!(mapper.batch_load(&example, &mut db))
        .into_iter()
        .filter_map(|bicycle| bicycle.name)
        .collect();
    names.sort();
    assert_eq!(names, ["Giant", "Trek"]);

    let all = assert_ok!(mapper.batch_load_all::<Bicycle>(&mut db));
    assert_eq!(all.len(), 3);
}

#[test]
fn batch_load_without_matches_fails() {
    let mut db = setup();
    let mapper = mapper();

    let example = Bicycle {
        frame: Some("Bamboo".to_string()),
        ..Bicycle::default()
    };
    let err = assert_persistence_err!(mapper.batch_load(&example, &mut db));
    assert!(err.is_record_not_found());
}

#[test]
fn class_level_suppression_fails_the_operation() {
    let mut db = setup();
    let mapper = Mapper::builder().register::<Archived>().build().unwrap();

    let archived = Archived {
        name: Some("Trek".to_string()),
        frame: Some("Steel".to_string()),
    };
    assert_ok!(mapper.persist(&archived, &mut db));

    let err = assert_persistence_err!(mapper.load(
        &mut Archived {
            name: Some("Trek".to_string()),
            ..Archived::default()
        },
        &mut db
    ));
    assert!(err.to_string().contains("type [Archived] suppresses the load event"));

    let err = assert_persistence_err!(mapper.delete(&archived, &mut db));
    assert!(err.to_string().contains("suppresses the delete event"));
}

#[test]
fn closed_connection_is_a_persistence_error() {
    let mut db = setup();
    let mapper = mapper();

    db.close().unwrap();
    assert!(!db.is_open());

    let err = assert_persistence_err!(mapper.load(&mut Bicycle::named("Trek"), &mut db));
    assert!(err.to_string().contains("is not open"));
}

#[test]
fn bicycles_example() {
    let mut db = setup();
    db.execute_batch(
        "INSERT INTO BICYCLES (NAME, FRAME, FORK) VALUES ('Bianchi', 'Celeste', 'Carbon');",
    )
    .unwrap();
    let mapper = mapper();

    let mut bicycle = Bicycle::named("Bianchi");
    assert_ok!(mapper.load(&mut bicycle, &mut db));
    assert_eq!(bicycle.frame.as_deref(), Some("Celeste"));

    bicycle.fork = Some("Steel".to_string());
    assert_ok!(mapper.persist(&bicycle, &mut db));

    let mut reloaded = Bicycle::named("Bianchi");
    assert_ok!(mapper.load(&mut reloaded, &mut db));
    assert_eq!(reloaded.fork.as_deref(), Some("Steel"));

    assert_ok!(mapper.delete(&reloaded, &mut db));
    assert_persistence_err!(mapper.load(&mut Bicycle::named("Bianchi"), &mut db));
}
