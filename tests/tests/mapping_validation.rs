use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use std_util::prelude::*;
use storm::Mapper;
use tests::{mapper, models::*, setup};

#[test]
fn validation_runs_once_per_type() {
    let mapper = Mapper::builder().register::<Counted>().build().unwrap();
    let after_build = COUNTED_DECLARATIONS.load(Ordering::SeqCst);
    assert_eq!(after_build, 1);

    for _ in 0..3 {
        assert_ok!(mapper.validate::<Counted>());
    }

    let mut db = setup();
    let _ = mapper.load(
        &mut Counted {
            name: Some("Trek".to_string()),
        },
        &mut db,
    );
    assert_eq!(COUNTED_DECLARATIONS.load(Ordering::SeqCst), after_build);

    // Evicting the mapping validates it again on next use.
    assert!(mapper.remove_mapping::<Counted>());
    assert_ok!(mapper.validate::<Counted>());
    assert_eq!(COUNTED_DECLARATIONS.load(Ordering::SeqCst), after_build + 1);
}

#[test]
fn parameter_inside_table_mapping_is_rejected() {
    let err = assert_configuration_err!(Mapper::builder().register::<Misplaced>().build());
    assert!(err
        .to_string()
        .contains("property [frame] has a parameter mapping, which is not allowed inside a table mapping"));
}

#[test]
fn unregistered_type_is_not_mapped() {
    let mut db = setup();
    let mapper = Mapper::builder().build().unwrap();

    let err = assert_persistence_err!(mapper.load(&mut Bicycle::named("Trek"), &mut db));
    assert!(err.to_string().contains("type [Bicycle] is not mapped"));
}

#[test]
fn relation_to_unregistered_type_is_rejected() {
    let err = assert_configuration_err!(Mapper::builder().register::<Garage>().build());
    assert!(err.to_string().contains(
        "invalid relation on property [bicycles] of type [Garage]: the related type [Bicycle] is not registered"
    ));
}

#[test]
fn relation_to_unmapped_property_is_rejected() {
    let err = assert_configuration_err!(Mapper::builder()
        .register::<ParkedBike>()
        .register::<Lot>()
        .build());
    assert!(err.to_string().contains(
        "invalid relation on property [bikes] of type [Lot]: related property [lot] of [ParkedBike] is not mapped to a loadable column or input parameter"
    ));
}

#[test]
fn unknown_binder_is_a_configuration_error() {
    let mut db = setup();
    let mapper = Mapper::builder().register::<Orphan>().build().unwrap();

    let err = assert_configuration_err!(mapper.load(
        &mut Orphan {
            name: Some("Trek".to_string()),
        },
        &mut db
    ));
    assert!(err
        .to_string()
        .contains("no data binder is registered under the name [nosuch]"));
}

#[test]
fn column_type_mismatch_names_both_types() {
    let mut db = setup();
    let mapper = Mapper::builder().register::<Mistyped>().build().unwrap();

    let err = assert_configuration_err!(mapper.load(
        &mut Mistyped {
            name: Some("Trek".to_string()),
            frame: None,
        },
        &mut db
    ));
    assert!(
        err.to_string().contains(
            "the column [FRAME] in table [BICYCLES] is of type [TEXT] but is mapped to a property with type [i64]"
        ),
        "{err}"
    );
}

#[test]
fn missing_table_is_a_configuration_error() {
    let mut db = setup();
    let mapper = Mapper::builder().register::<Unicycle>().build().unwrap();

    let err = assert_configuration_err!(mapper.persist(
        &Unicycle {
            name: Some("Uno".to_string()),
        },
        &mut db
    ));
    assert!(err.to_string().contains("the table named [UNICYCLES] does not exist"));
}

#[test]
fn schema_validation_can_be_disabled() {
    let mut db = setup();
    let mapper = Mapper::builder()
        .register::<Unicycle>()
        .validate_schema(false)
        .build()
        .unwrap();

    // The statement itself fails instead.
    let err = assert_persistence_err!(mapper.persist(
        &Unicycle {
            name: Some("Uno".to_string()),
        },
        &mut db
    ));
    assert!(err.is_driver());
}

#[test]
fn every_test_model_validates() {
    let mapper = mapper();

    assert_ok!(mapper.validate::<Bicycle>());
    assert_ok!(mapper.validate::<Garage>());
    assert_ok!(mapper.validate::<Rider>());
    assert_ok!(mapper.validate::<Team>());
}
