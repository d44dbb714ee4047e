#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{And, Comma};

mod ident;
use ident::Ident;

mod params;
use params::{Assign, Bind};

use storm_core::{
    driver::{Command, CommandKind, Dialect, Parameter},
    mapping::{ClassMapping, ColumnMapping, PersistenceEvents},
    stmt::{Value, ValueRecord},
    Error, Result,
};

/// Builds the commands a data binder executes for a mapped type.
///
/// Every command binds its parameters by column name, so a command built
/// once can be cached and re-bound for each operation.
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The dialect decides placeholder syntax, identifier quoting and
    /// parameter sizes.
    dialect: &'static Dialect,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut Vec<Parameter>,
}

impl Serializer {
    pub fn new(dialect: &'static Dialect) -> Serializer {
        Serializer { dialect }
    }

    pub fn sqlite() -> Serializer {
        Serializer::new(&Dialect::SQLITE)
    }

    pub fn postgresql() -> Serializer {
        Serializer::new(&Dialect::POSTGRESQL)
    }

    pub fn mysql() -> Serializer {
        Serializer::new(&Dialect::MYSQL)
    }

    pub fn oracle() -> Serializer {
        Serializer::new(&Dialect::ORACLE)
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// `SELECT <non-key columns> FROM <table> WHERE <key> = :<key> AND ...`
    ///
    /// Columns suppressing `LOAD` are neither selected nor bound. Returns
    /// `None` when every key column suppresses `LOAD`.
    pub fn select_by_key(&self, mapping: &ClassMapping) -> Result<Option<Command>> {
        let table = table_name(mapping)?;
        let keys: Vec<_> = loadable(mapping).filter(|c| c.primary_key).collect();

        if keys.is_empty() {
            return Ok(None);
        }

        let mut selected: Vec<_> = loadable(mapping).filter(|c| !c.primary_key).collect();
        if selected.is_empty() {
            selected = keys.clone();
        }

        Ok(Some(self.serialize(CommandKind::Text, |f| {
            fmt!(
                f,
                "SELECT ",
                Comma(selected.iter().map(|c| Ident(&c.column_name))),
                " FROM ",
                Ident(table),
                " WHERE ",
                And(keys.iter().map(|c| assign(c, Value::Null))),
            );
        })))
    }

    /// `SELECT <columns> FROM <table> [WHERE <column> = :<column> AND ...]`
    ///
    /// Filters on every loadable column whose value in `example` is not
    /// null, and binds those values. With no such column every row is
    /// selected.
    pub fn select_by_example(&self, mapping: &ClassMapping, example: &ValueRecord) -> Result<Command> {
        let table = table_name(mapping)?;
        let selected: Vec<_> = loadable(mapping).collect();

        let filters: Vec<_> = mapping
            .columns()
            .filter(|(_, c)| !c.suppresses(PersistenceEvents::LOAD))
            .filter_map(|(index, c)| {
                let value = example.get(index)?;
                (!value.is_null()).then(|| (c, value.clone()))
            })
            .collect();

        Ok(self.serialize(CommandKind::Text, |f| {
            fmt!(
                f,
                "SELECT ",
                Comma(selected.iter().map(|c| Ident(&c.column_name))),
                " FROM ",
                Ident(table),
            );

            if !filters.is_empty() {
                fmt!(
                    f,
                    " WHERE ",
                    And(filters.into_iter().map(|(c, value)| assign(c, value))),
                );
            }
        }))
    }

    /// `SELECT COUNT(*) FROM <table> WHERE <key> = :<key> AND ...`
    pub fn exists(&self, mapping: &ClassMapping) -> Result<Command> {
        let table = table_name(mapping)?;
        let keys: Vec<_> = mapping.primary_key().map(|(_, c)| c).collect();

        Ok(self.serialize(CommandKind::Text, |f| {
            fmt!(
                f,
                "SELECT COUNT(*) FROM ",
                Ident(table),
                " WHERE ",
                And(keys.iter().map(|c| assign(c, Value::Null))),
            );
        }))
    }

    /// `INSERT INTO <table> (<columns>) VALUES (:<column>, ...)`
    ///
    /// Columns suppressing `INSERT` are omitted. Returns `None` when no
    /// column remains.
    pub fn insert(&self, mapping: &ClassMapping) -> Result<Option<Command>> {
        let table = table_name(mapping)?;
        let columns: Vec<_> = mapping
            .columns()
            .map(|(_, c)| c)
            .filter(|c| !c.suppresses(PersistenceEvents::INSERT))
            .collect();

        if columns.is_empty() {
            return Ok(None);
        }

        Ok(Some(self.serialize(CommandKind::Text, |f| {
            fmt!(
                f,
                "INSERT INTO ",
                Ident(table),
                " (",
                Comma(columns.iter().map(|c| Ident(&c.column_name))),
                ") VALUES (",
                Comma(columns.iter().map(|c| bind(c, Value::Null))),
                ")",
            );
        })))
    }

    /// `UPDATE <table> SET <column> = :<column>, ... WHERE <key> = :<key> AND ...`
    ///
    /// Non-key columns suppressing `UPDATE` are not assigned. Returns `None`
    /// when nothing is left to assign.
    pub fn update(&self, mapping: &ClassMapping) -> Result<Option<Command>> {
        let table = table_name(mapping)?;
        let assigned: Vec<_> = mapping
            .columns()
            .map(|(_, c)| c)
            .filter(|c| !c.primary_key && !c.suppresses(PersistenceEvents::UPDATE))
            .collect();
        let keys: Vec<_> = mapping.primary_key().map(|(_, c)| c).collect();

        if assigned.is_empty() {
            return Ok(None);
        }

        Ok(Some(self.serialize(CommandKind::Text, |f| {
            fmt!(
                f,
                "UPDATE ",
                Ident(table),
                " SET ",
                Comma(assigned.iter().map(|c| assign(c, Value::Null))),
                " WHERE ",
                And(keys.iter().map(|c| assign(c, Value::Null))),
            );
        })))
    }

    /// `DELETE FROM <table> WHERE <key> = :<key> AND ...`
    ///
    /// Key columns suppressing `DELETE` are not part of the condition.
    /// Returns `None` when no key column remains.
    pub fn delete(&self, mapping: &ClassMapping) -> Result<Option<Command>> {
        let table = table_name(mapping)?;
        let keys: Vec<_> = mapping
            .primary_key()
            .map(|(_, c)| c)
            .filter(|c| !c.suppresses(PersistenceEvents::DELETE))
            .collect();

        if keys.is_empty() {
            return Ok(None);
        }

        Ok(Some(self.serialize(CommandKind::Text, |f| {
            fmt!(
                f,
                "DELETE FROM ",
                Ident(table),
                " WHERE ",
                And(keys.iter().map(|c| assign(c, Value::Null))),
            );
        })))
    }

    /// A stored-procedure call with one parameter per parameter mapping not
    /// suppressing `LOAD`.
    pub fn call(&self, mapping: &ClassMapping) -> Result<Command> {
        let Some(procedure_name) = mapping.procedure_name() else {
            return Err(Error::persistence(format!(
                "type [{}] is not mapped to a stored procedure",
                mapping.bound_type
            )));
        };

        let mut command = Command::procedure(procedure_name.to_string());
        for (_, parameter) in mapping.parameters() {
            if parameter.suppresses(PersistenceEvents::LOAD) {
                continue;
            }

            command.params.push(Parameter {
                name: parameter.parameter_name.clone(),
                placeholder: parameter.parameter_name.clone(),
                direction: parameter.direction,
                ty: parameter.ty,
                size: self.dialect.parameter_size(parameter.ty),
                value: Value::Null,
            });
        }

        Ok(command)
    }

    fn serialize(&self, kind: CommandKind, f: impl FnOnce(&mut Formatter<'_>)) -> Command {
        let mut text = String::new();
        let mut params = vec![];

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut text,
            params: &mut params,
        };

        f(&mut fmt);

        Command { kind, text, params }
    }
}

fn table_name(mapping: &ClassMapping) -> Result<&str> {
    mapping.table_name().ok_or_else(|| {
        Error::persistence(format!(
            "type [{}] is not mapped to a table",
            mapping.bound_type
        ))
    })
}

fn loadable(mapping: &ClassMapping) -> impl Iterator<Item = &ColumnMapping> + '_ {
    mapping
        .columns()
        .map(|(_, c)| c)
        .filter(|c| !c.suppresses(PersistenceEvents::LOAD))
}

fn bind(column: &ColumnMapping, value: Value) -> Bind<'_> {
    Bind {
        name: &column.column_name,
        ty: column.ty,
        value,
    }
}

fn assign(column: &ColumnMapping, value: Value) -> Assign<'_> {
    Assign(bind(column, value))
}
