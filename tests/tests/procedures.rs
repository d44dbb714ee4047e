use pretty_assertions::assert_eq;
use std_util::prelude::*;
use storm::{driver::Direction, SqlBinder};
use tests::{mapper, models::*, MockConnection};

#[test]
fn call_binds_inputs_and_reads_outputs() {
    let mut db = MockConnection::new();
    let mapper = mapper();

    let mut quote = Quote {
        base: 5,
        amount: 10,
        label: None,
    };
    assert_ok!(mapper.load(&mut quote, &mut db));

    assert_eq!(quote.base, 5);
    assert_eq!(quote.amount, 25);
    assert_eq!(quote.label.as_deref(), Some("base 5"));
    assert_eq!(db.count("ADJUST_PRICE"), 1);
}

#[test]
fn missing_procedure_is_a_configuration_error() {
    let mut db = MockConnection::new();
    db.remove_procedure("ADJUST_PRICE");
    let mapper = mapper();

    let err = assert_configuration_err!(mapper.load(&mut Quote::default(), &mut db));
    assert!(err
        .to_string()
        .contains("the procedure named [ADJUST_PRICE] does not exist"));
}

#[test]
fn parameter_direction_must_match() {
    let mut db = MockConnection::new();
    db.procedure(
        "ADJUST_PRICE",
        &[
            ("BASE", Direction::In, "INTEGER"),
            ("AMOUNT", Direction::In, "INTEGER"),
            ("LABEL", Direction::Out, "TEXT"),
        ],
        |_, _| Ok(()),
    );
    let mapper = mapper();

    let err = assert_configuration_err!(mapper.load(&mut Quote::default(), &mut db));
    assert!(err
        .to_string()
        .contains("the parameter [AMOUNT] of procedure [ADJUST_PRICE] has direction [In] but is mapped with direction [InOut]"));
}

#[test]
fn parameter_type_must_match() {
    let mut db = MockConnection::new();
    db.procedure(
        "ADJUST_PRICE",
        &[
            ("BASE", Direction::In, "INTEGER"),
            ("AMOUNT", Direction::InOut, "TEXT"),
            ("LABEL", Direction::Out, "TEXT"),
        ],
        |_, _| Ok(()),
    );
    let mapper = mapper();

    let err = assert_configuration_err!(mapper.load(&mut Quote::default(), &mut db));
    assert!(err
        .to_string()
        .contains("the parameter [AMOUNT] of procedure [ADJUST_PRICE] is of type [TEXT] but is mapped to a property with type [i64]"));
}

#[test]
fn parameter_of_unknown_type_is_rejected() {
    let mut db = MockConnection::new();
    db.procedure(
        "ADJUST_PRICE",
        &[
            ("BASE", Direction::In, "INTEGER"),
            ("AMOUNT", Direction::InOut, "INTEGER"),
            ("LABEL", Direction::Out, "XMLTYPE"),
        ],
        |_, _| Ok(()),
    );
    let mapper = mapper();

    let err = assert_configuration_err!(mapper.load(&mut Quote::default(), &mut db));
    assert!(err
        .to_string()
        .contains("the parameter [LABEL] of procedure [ADJUST_PRICE] has type [XMLTYPE], which the sqlite dialect cannot map to a property type"));
}

#[test]
fn procedure_mappings_cannot_be_persisted() {
    let mut db = MockConnection::new();
    let mapper = mapper();

    let err = assert_persistence_err!(mapper.persist(&Quote::default(), &mut db));
    assert!(err.to_string().contains("procedure mappings only support load"));

    assert_persistence_err!(mapper.delete(&Quote::default(), &mut db));
}

#[test]
fn sql_binder_rejects_procedure_mappings() {
    let mut db = MockConnection::new();
    let mapper = mapper();
    mapper.register_data_binder_factory("procedure", SqlBinder::new);

    let mut quote = Quote::default();
    let err = assert_persistence_err!(mapper.load(&mut quote, &mut db));
    assert!(err
        .to_string()
        .contains("the sql data binder does not support the procedure mapping of type [Quote]"));
}

#[test]
fn failed_call_is_a_persistence_error() {
    let mut db = MockConnection::new();
    db.fail_on("ADJUST_PRICE");
    let mapper = mapper();

    let err = assert_persistence_err!(mapper.load(&mut Quote::default(), &mut db));
    assert!(err.to_string().contains("injected failure"));
}
