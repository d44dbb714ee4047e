mod command;
pub use command::{Command, CommandKind, Direction, Parameter};

mod dialect;
pub use dialect::{Dialect, Placeholder, TypeSizes};

mod response;
pub use response::Rows;

mod schema;
pub use schema::{ColumnInfo, ParameterInfo, ProcedureInfo, TableInfo};

use crate::{mapping::ProcedureName, stmt::Value, Error, Result};

use std::borrow::Cow;

/// A live database connection.
///
/// Storm never opens or closes connections itself; callers hand one to every
/// operation. Implementations execute prepared [`Command`]s and describe the
/// database schema for validation.
pub trait Connection: Send {
    /// Returns `true` while the connection can execute commands.
    fn is_open(&self) -> bool;

    /// Identifies the database the connection points to. Data binders are
    /// cached per connection string.
    fn connection_string(&self) -> Cow<'_, str>;

    /// SQL dialect spoken by the connection.
    fn dialect(&self) -> &'static Dialect;

    /// Executes a command and returns every row it produces.
    fn query(&mut self, command: &Command) -> Result<Rows>;

    /// Executes a command and returns the first column of the first row, or
    /// null if there are no rows.
    fn query_scalar(&mut self, command: &Command) -> Result<Value> {
        let rows = self.query(command)?;
        let value = rows
            .iter()
            .next()
            .and_then(|row| row.first())
            .cloned()
            .unwrap_or_default();
        Ok(value)
    }

    /// Executes a command that does not produce rows and returns the number
    /// of affected rows.
    fn execute(&mut self, command: &Command) -> Result<u64>;

    /// Invokes a stored procedure, writing output values back into the
    /// command's `Out` and `InOut` parameters.
    fn call(&mut self, command: &mut Command) -> Result<()> {
        Err(Error::persistence(format!(
            "the connection to [{}] does not support stored procedures; procedure={}",
            self.connection_string(),
            command.text
        )))
    }

    /// Describes a table, or returns `None` if it does not exist.
    fn describe_table(&mut self, table_name: &str) -> Result<Option<TableInfo>>;

    /// Describes a stored procedure, or returns `None` if it does not exist.
    fn describe_procedure(&mut self, _name: &ProcedureName) -> Result<Option<ProcedureInfo>> {
        Ok(None)
    }
}
