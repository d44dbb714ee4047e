//! Data binders execute mapper operations against a database.
//!
//! The mapper resolves one [`DataBinder`] per (connection, binder name) and
//! hands it the validated [`ClassMapping`] together with a record holding one
//! value per property mapping. Binders read and write that record; they
//! never see the mapped instance itself.

mod call;

mod procedure;
pub use procedure::ProcedureBinder;

mod sql;
pub use sql::SqlBinder;

mod table;

mod verify;

use crate::{driver::Connection, Result};

use std::any::TypeId;
use storm_core::{mapping::ClassMapping, stmt::ValueRecord};

/// Executes load, persist and delete operations for mapped types.
///
/// Records passed to a binder are indexed like
/// [`ClassMapping::properties`]; relation entries are always null.
pub trait DataBinder: Send + Sync + 'static {
    /// Checks the mapping against the live database schema.
    fn validate_schema(&self, mapping: &ClassMapping, connection: &mut dyn Connection) -> Result<()>;

    /// Fills `record` with the stored values for its identifying values.
    fn load(
        &self,
        mapping: &ClassMapping,
        record: &mut ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()>;

    /// Returns one record per stored instance matching the non-null values
    /// of `example`.
    fn batch_load(
        &self,
        mapping: &ClassMapping,
        example: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<Vec<ValueRecord>>;

    fn persist(
        &self,
        mapping: &ClassMapping,
        record: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()>;

    fn delete(
        &self,
        mapping: &ClassMapping,
        record: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()>;

    /// Drops anything cached for a type whose mapping was evicted.
    fn forget(&self, ty: TypeId) {
        let _ = ty;
    }
}

/// How a table select identifies the rows to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLookupMode {
    /// Match the primary key columns.
    ByKeys,

    /// Match every column whose value is not null.
    ByNonNullProperties,
}
