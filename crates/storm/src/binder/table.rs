use super::RecordLookupMode;
use crate::{driver::Connection, Error, Result};

use storm_core::{
    driver::{Command, Rows},
    mapping::{ClassMapping, PersistenceEvents},
    stmt::{Value, ValueRecord},
};
use storm_sql::{Commands, Serializer, TableCommands};

pub(super) fn commands<'a>(mapping: &ClassMapping, commands: &'a Commands) -> Result<&'a TableCommands> {
    match commands {
        Commands::Table(commands) => Ok(commands),
        Commands::Procedure(_) => Err(Error::persistence(format!(
            "type [{}] is not mapped to a table",
            mapping.bound_type
        ))),
    }
}

pub(super) fn load(
    mapping: &ClassMapping,
    commands: &TableCommands,
    record: &mut ValueRecord,
    connection: &mut dyn Connection,
) -> Result<()> {
    check_event(mapping, PersistenceEvents::LOAD)?;
    check_keys(mapping, record)?;

    let rows = select(mapping, commands, record, RecordLookupMode::ByKeys, connection)?;
    let Some(row) = rows.iter().next() else {
        return Err(Error::record_not_found(format!(
            "table={}; key={}",
            mapping.storage_name(),
            describe_key(mapping, record)
        )));
    };

    read(mapping, &rows, row, record)
}

pub(super) fn batch_load(
    mapping: &ClassMapping,
    commands: &TableCommands,
    example: &ValueRecord,
    connection: &mut dyn Connection,
) -> Result<Vec<ValueRecord>> {
    check_event(mapping, PersistenceEvents::LOAD)?;

    let rows = select(
        mapping,
        commands,
        example,
        RecordLookupMode::ByNonNullProperties,
        connection,
    )?;

    if rows.is_empty() {
        return Err(Error::record_not_found(format!(
            "table={}; no row matches the example",
            mapping.storage_name()
        )));
    }

    rows.iter()
        .map(|row| {
            let mut record = ValueRecord::nulls(mapping.properties.len());
            read(mapping, &rows, row, &mut record)?;
            Ok(record)
        })
        .collect()
}

pub(super) fn persist(
    mapping: &ClassMapping,
    commands: &TableCommands,
    record: &ValueRecord,
    connection: &mut dyn Connection,
) -> Result<()> {
    check_keys(mapping, record)?;

    let count = {
        let mut command = commands.exists.lock();
        bind(mapping, record, &mut command);
        connection.query_scalar(&command)?
    };

    if i64::try_from(count)? > 0 {
        check_event(mapping, PersistenceEvents::UPDATE)?;

        let Some(update) = &commands.update else {
            tracing::trace!(ty = %mapping.bound_type, "no updatable column; skipping update");
            return Ok(());
        };

        let mut command = update.lock();
        bind(mapping, record, &mut command);
        connection.execute(&command)?;
    } else {
        check_event(mapping, PersistenceEvents::INSERT)?;

        let Some(insert) = &commands.insert else {
            return Err(Error::persistence(format!(
                "every column of type [{}] suppresses insert",
                mapping.bound_type
            )));
        };

        let mut command = insert.lock();
        bind(mapping, record, &mut command);
        connection.execute(&command)?;
    }

    Ok(())
}

pub(super) fn delete(
    mapping: &ClassMapping,
    commands: &TableCommands,
    record: &ValueRecord,
    connection: &mut dyn Connection,
) -> Result<()> {
    check_event(mapping, PersistenceEvents::DELETE)?;
    check_keys(mapping, record)?;

    let Some(delete) = &commands.delete else {
        return Err(Error::persistence(format!(
            "every primary key column of type [{}] suppresses delete",
            mapping.bound_type
        )));
    };

    let mut command = delete.lock();
    bind(mapping, record, &mut command);
    let deleted = connection.execute(&command)?;
    tracing::trace!(ty = %mapping.bound_type, deleted, "deleted");
    Ok(())
}

/// Fails when the whole class suppresses `event`.
pub(super) fn check_event(mapping: &ClassMapping, event: PersistenceEvents) -> Result<()> {
    if mapping.suppresses(event) {
        let event = event
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join("|");
        return Err(Error::persistence(format!(
            "type [{}] suppresses the {event} event",
            mapping.bound_type
        )));
    }
    Ok(())
}

fn check_keys(mapping: &ClassMapping, record: &ValueRecord) -> Result<()> {
    for (index, column) in mapping.primary_key() {
        if record[index].is_null() {
            return Err(Error::persistence(format!(
                "primary key column [{}] of type [{}] is null",
                column.column_name, mapping.bound_type
            )));
        }
    }
    Ok(())
}

fn select(
    mapping: &ClassMapping,
    commands: &TableCommands,
    record: &ValueRecord,
    mode: RecordLookupMode,
    connection: &mut dyn Connection,
) -> Result<Rows> {
    match mode {
        RecordLookupMode::ByKeys => {
            let Some(select) = &commands.select else {
                return Err(Error::persistence(format!(
                    "every primary key column of type [{}] suppresses load",
                    mapping.bound_type
                )));
            };

            let mut command = select.lock();
            bind(mapping, record, &mut command);
            connection.query(&command)
        }
        RecordLookupMode::ByNonNullProperties => {
            // The filtered columns depend on the example, so the command is
            // built per call.
            let command = Serializer::new(connection.dialect()).select_by_example(mapping, record)?;
            connection.query(&command)
        }
    }
}

/// Copies the record's column values into the command's parameters.
fn bind(mapping: &ClassMapping, record: &ValueRecord, command: &mut Command) {
    for (index, column) in mapping.columns() {
        if let Some(param) = command.param_mut(&column.column_name) {
            param.value = record[index].clone();
        }
    }
}

/// Maps a result row onto the record, converting each value to the type of
/// its property.
fn read(mapping: &ClassMapping, rows: &Rows, row: &[Value], record: &mut ValueRecord) -> Result<()> {
    for (index, column) in mapping.columns() {
        if column.suppresses(PersistenceEvents::LOAD) {
            continue;
        }

        let Some(position) = rows.column_index(&column.column_name) else {
            continue;
        };

        record[index] = row[position].clone().convert(column.ty).map_err(|err| {
            err.context(Error::persistence(format!(
                "unable to read column [{}] of table [{}]",
                column.column_name,
                mapping.storage_name()
            )))
        })?;
    }
    Ok(())
}

fn describe_key(mapping: &ClassMapping, record: &ValueRecord) -> String {
    mapping
        .primary_key()
        .map(|(index, column)| format!("{}={:?}", column.column_name, record[index]))
        .collect::<Vec<_>>()
        .join(", ")
}
