use super::{call, verify, DataBinder, SqlBinder};
use crate::{driver::Connection, Error, Result};

use std::any::TypeId;
use storm_core::{
    mapping::{ClassMapping, MappingKind},
    stmt::ValueRecord,
};
use storm_sql::CommandCache;

/// Loads procedure mappings by calling their stored procedure.
///
/// Registered as `"procedure"`. Table mappings are handled as by
/// [`SqlBinder`]. Procedure mappings can only be loaded.
#[derive(Debug, Default)]
pub struct ProcedureBinder {
    tables: SqlBinder,
    procedures: CommandCache,
}

impl ProcedureBinder {
    pub fn new() -> ProcedureBinder {
        ProcedureBinder::default()
    }
}

fn unsupported(mapping: &ClassMapping, op: &str) -> Error {
    Error::persistence(format!(
        "the procedure data binder cannot {op} the procedure mapping of type [{}]; procedure mappings only support load",
        mapping.bound_type
    ))
}

impl DataBinder for ProcedureBinder {
    fn validate_schema(&self, mapping: &ClassMapping, connection: &mut dyn Connection) -> Result<()> {
        match mapping.kind {
            MappingKind::Table(_) => self.tables.validate_schema(mapping, connection),
            MappingKind::Procedure(_) => verify::procedure(mapping, connection),
        }
    }

    fn load(
        &self,
        mapping: &ClassMapping,
        record: &mut ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()> {
        match mapping.kind {
            MappingKind::Table(_) => self.tables.load(mapping, record, connection),
            MappingKind::Procedure(_) => {
                let commands = self.procedures.get_or_build(mapping, connection.dialect())?;
                call::load(mapping, call::commands(mapping, &commands)?, record, connection)
            }
        }
    }

    fn batch_load(
        &self,
        mapping: &ClassMapping,
        example: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<Vec<ValueRecord>> {
        match mapping.kind {
            MappingKind::Table(_) => self.tables.batch_load(mapping, example, connection),
            MappingKind::Procedure(_) => Err(unsupported(mapping, "batch load")),
        }
    }

    fn persist(
        &self,
        mapping: &ClassMapping,
        record: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()> {
        match mapping.kind {
            MappingKind::Table(_) => self.tables.persist(mapping, record, connection),
            MappingKind::Procedure(_) => Err(unsupported(mapping, "persist")),
        }
    }

    fn delete(
        &self,
        mapping: &ClassMapping,
        record: &ValueRecord,
        connection: &mut dyn Connection,
    ) -> Result<()> {
        match mapping.kind {
            MappingKind::Table(_) => self.tables.delete(mapping, record, connection),
            MappingKind::Procedure(_) => Err(unsupported(mapping, "delete")),
        }
    }

    fn forget(&self, ty: TypeId) {
        self.tables.forget(ty);
        self.procedures.remove(ty);
    }
}
