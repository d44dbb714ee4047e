use super::table::check_event;
use crate::{driver::Connection, Error, Result};

use storm_core::{
    mapping::{ClassMapping, PersistenceEvents},
    stmt::ValueRecord,
};
use storm_sql::{Commands, ProcedureCommands};

pub(super) fn commands<'a>(
    mapping: &ClassMapping,
    commands: &'a Commands,
) -> Result<&'a ProcedureCommands> {
    match commands {
        Commands::Procedure(commands) => Ok(commands),
        Commands::Table(_) => Err(Error::persistence(format!(
            "type [{}] is not mapped to a stored procedure",
            mapping.bound_type
        ))),
    }
}

/// Calls the procedure with the record's input values and maps the output
/// values back onto the record.
pub(super) fn load(
    mapping: &ClassMapping,
    commands: &ProcedureCommands,
    record: &mut ValueRecord,
    connection: &mut dyn Connection,
) -> Result<()> {
    check_event(mapping, PersistenceEvents::LOAD)?;

    let mut command = commands.call.lock();

    for (index, parameter) in mapping.parameters() {
        if !parameter.is_input() {
            continue;
        }
        if let Some(param) = command.param_mut(&parameter.parameter_name) {
            param.value = record[index].clone();
        }
    }

    connection.call(&mut command)?;

    for (index, parameter) in mapping.parameters() {
        if !parameter.is_output() {
            continue;
        }
        let Some(param) = command.param(&parameter.parameter_name) else {
            continue;
        };

        record[index] = param.value.clone().convert(parameter.ty).map_err(|err| {
            err.context(Error::persistence(format!(
                "unable to read parameter [{}] of procedure [{}]",
                parameter.parameter_name,
                mapping.storage_name()
            )))
        })?;
    }

    Ok(())
}
