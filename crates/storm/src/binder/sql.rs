use super::{table, verify, DataBinder};
use crate::{driver::Connection, Error, Result};

use std::{any::TypeId, sync::Arc};
use storm_core::{
    mapping::{ClassMapping, MappingKind},
    stmt::ValueRecord,
};
use storm_sql::{CommandCache, Commands};

/// Persists table mappings with generated SQL statements.
///
/// Registered as `"sql"`. Statements are built once per type and dialect and
/// re-bound for every operation.
#[derive(Debug, Default)]
pub struct SqlBinder {
    commands: CommandCache,
}

impl SqlBinder {
    pub fn new() -> SqlBinder {
        SqlBinder::default()
    }

    /// Number of types with cached statements.
    pub fn cached_types(&self) -> usize {
        self.commands.len()
    }

    fn commands(&self, mapping: &ClassMapping, connection: &dyn Connection) -> Result<Arc<Commands>> {
        if let MappingKind::Procedure(_) = mapping.kind {
            return Err(Error::persistence(format!(
                "the sql data binder does not support the procedure mapping of type [{}]",
                mapping.bound_type
            )));
        }

        self.commands.get_or_build(mapping, connection.dialect())
    }
}

impl DataBinder for SqlBinder {
    fn validate_schema(&self, mapping: &ClassMapping, connection: &mut dyn Connection) -> Result<()> {
        verify::table(mapping, connection)
    }

    fn load(
        &self,
        mapping: &ClassMapping,
        record: &mut ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()> {
        let commands = self.commands(mapping, connection)?;
        table::load(mapping, table::commands(mapping, &commands)?, record, connection)
    }

    fn batch_load(
        &self,
        mapping: &ClassMapping,
        example: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<Vec<ValueRecord>> {
        let commands = self.commands(mapping, connection)?;
        table::batch_load(mapping, table::commands(mapping, &commands)?, example, connection)
    }

    fn persist(
        &self,
        mapping: &ClassMapping,
        record: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()> {
        let commands = self.commands(mapping, connection)?;
        table::persist(mapping, table::commands(mapping, &commands)?, record, connection)
    }

    fn delete(
        &self,
        mapping: &ClassMapping,
        record: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()> {
        let commands = self.commands(mapping, connection)?;
        table::delete(mapping, table::commands(mapping, &commands)?, record, connection)
    }

    fn forget(&self, ty: TypeId) {
        self.commands.remove(ty);
    }
}
