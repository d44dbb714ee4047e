pub use storm_core::driver::*;

#[cfg(feature = "sqlite")]
pub use storm_driver_sqlite::Sqlite;
