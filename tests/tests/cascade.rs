use pretty_assertions::assert_eq;
use std::sync::Arc;
use std_util::prelude::*;
use storm::driver::{Command, Connection};
use tests::{mapper, mock::RecordingBinder, models::*, MockConnection};

fn seed(db: &mut MockConnection) {
    db.db()
        .execute_batch(
            "INSERT INTO GARAGES VALUES (1, 'Main'), (2, 'Annex'), (3, 'Empty');
             INSERT INTO BICYCLES VALUES ('Trek', 'Steel', 'Rigid', 1);
             INSERT INTO BICYCLES VALUES ('Giant', 'Carbon', 'Suspension', 1);
             INSERT INTO BICYCLES VALUES ('Canyon', 'Alloy', 'Rigid', 2);
             INSERT INTO TEAMS VALUES (10, 'Blue', 1);
             INSERT INTO RIDERS VALUES (1, 'Ann', 10), (2, 'Bob', 10), (3, 'Cy', NULL);",
        )
        .unwrap();
}

fn names(bicycles: &[Arc<Bicycle>]) -> Vec<String> {
    let mut names: Vec<_> = bicycles
        .iter()
        .filter_map(|bicycle| bicycle.name.clone())
        .collect();
    names.sort();
    names
}

#[test]
fn load_fills_relation_list() {
    let mut db = MockConnection::new();
    seed(&mut db);
    let mapper = mapper();

    let mut garage = Garage {
        id: Some(1),
        ..Garage::default()
    };
    assert_ok!(mapper.load(&mut garage, &mut db));

    assert_eq!(garage.name.as_deref(), Some("Main"));
    assert_eq!(names(&garage.bicycles), ["Giant", "Trek"]);

    let trek = garage
        .bicycles
        .iter()
        .find(|bicycle| bicycle.name.as_deref() == Some("Trek"))
        .unwrap();
    assert_eq!(trek.frame.as_deref(), Some("Steel"));
    assert_eq!(trek.garage, Some(1));
}

#[test]
fn load_without_cascade_leaves_relations_alone() {
    let mut db = MockConnection::new();
    seed(&mut db);
    let mapper = mapper();

    let mut garage = Garage {
        id: Some(2),
        ..Garage::default()
    };
    assert_ok!(mapper.load_with(&mut garage, &mut db, false));

    assert_eq!(garage.name.as_deref(), Some("Annex"));
    assert!(garage.bicycles.is_empty());
    assert_eq!(db.count("SELECT"), 0);
}

#[test]
fn relation_without_matches_is_empty() {
    let mut db = MockConnection::new();
    seed(&mut db);
    let mapper = mapper();

    let mut garage = Garage {
        id: Some(3),
        ..Garage::default()
    };
    assert_ok!(mapper.load(&mut garage, &mut db));
    assert!(garage.bicycles.is_empty());
}

#[test]
fn null_join_value_empties_the_relation() {
    let mut db = MockConnection::new();
    seed(&mut db);
    let mapper = mapper();

    let mut rider = Rider {
        id: Some(3),
        ..Rider::default()
    };
    assert_ok!(mapper.load(&mut rider, &mut db));

    assert_eq!(rider.name.as_deref(), Some("Cy"));
    assert_eq!(rider.team_id, None);
    assert!(rider.team.is_none());
}

#[test]
fn cyclic_relations_terminate() {
    let mut db = MockConnection::new();
    seed(&mut db);
    let mapper = mapper();

    let mut rider = Rider {
        id: Some(1),
        ..Rider::default()
    };
    assert_ok!(mapper.load(&mut rider, &mut db));

    let team = rider.team.as_ref().unwrap();
    assert_eq!(team.name.as_deref(), Some("Blue"));

    // The captain is the rider being loaded, so it is loaded again without
    // following its own relations.
    let captain = team.captain.as_ref().unwrap();
    assert_eq!(captain.name.as_deref(), Some("Ann"));
    assert_eq!(captain.team_id, Some(10));
    assert!(captain.team.is_none());
}

#[test]
fn instance_reached_twice_is_shared() {
    let mut db = MockConnection::new();
    seed(&mut db);
    let mapper = mapper();

    let mut club = Club {
        id: Some(1),
        ..Club::default()
    };
    assert_ok!(mapper.load(&mut club, &mut db));

    let president = club.president.as_ref().unwrap();
    let treasurer = club.treasurer.as_ref().unwrap();
    assert!(Arc::ptr_eq(president, treasurer));
    assert_eq!(db.count("RIDER_INFO"), 2);
}

#[test]
fn failed_relation_aborts_the_load() {
    let mut db = MockConnection::new();
    seed(&mut db);
    db.fail_on("FROM BICYCLES");
    let mapper = mapper();

    let mut garage = Garage {
        id: Some(1),
        ..Garage::default()
    };
    let err = assert_persistence_err!(mapper.load(&mut garage, &mut db));
    assert!(err
        .to_string()
        .contains("unable to load relation [bicycles] of type [Garage]"));
}

#[test]
fn persist_and_delete_cascade_through_relations() {
    let mut db = MockConnection::new();
    let mapper = mapper();
    let binder = RecordingBinder::default();
    mapper.register_data_binder("depot", binder.clone());

    let trek = Arc::new(Bicycle::new("Trek", "Steel", "Rigid").in_garage(7));
    let giant = Arc::new(Bicycle::new("Giant", "Carbon", "Suspension").in_garage(7));
    let depot = Depot {
        id: Some(7),
        bicycles: vec![trek.clone(), giant],
        showcase: Some(trek),
    };

    assert_ok!(mapper.persist(&depot, &mut db));
    // The showcase bicycle is also in the list and is saved once.
    assert_eq!(db.count("INSERT INTO BICYCLES"), 2);
    assert_eq!(stored_bicycles(&mut db), 2);

    assert_ok!(mapper.delete(&depot, &mut db));
    assert_eq!(db.count("DELETE FROM BICYCLES"), 2);
    assert_eq!(stored_bicycles(&mut db), 0);

    // The owner is saved before its relations and deleted after them.
    assert_eq!(
        binder.events(),
        ["persist Depot; bicycles=0", "delete Depot; bicycles=0"]
    );
}

#[test]
fn persist_without_cascade_saves_only_the_owner() {
    let mut db = MockConnection::new();
    let mapper = mapper();
    let binder = RecordingBinder::default();
    mapper.register_data_binder("depot", binder.clone());

    let depot = Depot {
        id: Some(7),
        bicycles: vec![Arc::new(Bicycle::new("Trek", "Steel", "Rigid"))],
        showcase: None,
    };

    assert_ok!(mapper.persist_with(&depot, &mut db, false));
    assert_eq!(db.count("INSERT"), 0);
    assert_eq!(binder.events(), ["persist Depot; bicycles=0"]);
}

fn stored_bicycles(db: &mut MockConnection) -> i64 {
    let count = db
        .query_scalar(&Command::text("SELECT COUNT(*) FROM BICYCLES"))
        .unwrap();
    i64::try_from(count).unwrap()
}
