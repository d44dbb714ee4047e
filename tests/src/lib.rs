pub use mock::MockConnection;

pub mod models;

pub use std_util::*;

use storm::{driver::Sqlite, Mapper};

/// Tables backing the test models.
pub const SCHEMA: &str = "
    CREATE TABLE BICYCLES (NAME VARCHAR(40) PRIMARY KEY, FRAME TEXT, FORK TEXT, GARAGE INTEGER);
    CREATE TABLE PARTS (ID INTEGER PRIMARY KEY, NAME TEXT, ORIGIN TEXT DEFAULT 'factory');
    CREATE TABLE GARAGES (ID INTEGER PRIMARY KEY, NAME TEXT);
    CREATE TABLE RIDERS (ID INTEGER PRIMARY KEY, NAME TEXT, TEAM_ID INTEGER);
    CREATE TABLE TEAMS (ID INTEGER PRIMARY KEY, NAME TEXT, CAPTAIN_ID INTEGER);
";

/// Opens a fresh in-memory database holding the test tables.
pub fn setup() -> Sqlite {
    init_tracing();

    let mut db = Sqlite::in_memory().unwrap();
    db.execute_batch(SCHEMA).unwrap();
    db
}

/// A mapper with every well-formed test model registered. `Depot` needs a
/// binder named `"depot"` registered before use.
pub fn mapper() -> Mapper {
    use models::*;

    Mapper::builder()
        .register::<Bicycle>()
        .register::<Part>()
        .register::<Garage>()
        .register::<Depot>()
        .register::<Rider>()
        .register::<Team>()
        .register::<Club>()
        .register::<Quote>()
        .build()
        .unwrap()
}

/// Installs a `tracing` subscriber filtered by `RUST_LOG`, once per test
/// binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
