mod value;
use value::Value;

use rusqlite::{Connection as RusqliteConnection, Statement};
use std::{
    borrow::Cow,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};
use storm_core::{
    driver::{ColumnInfo, Command, CommandKind, Connection, Dialect, Rows, TableInfo},
    Error, Result,
};
use url::Url;

/// Distinguishes in-memory databases, which otherwise share a URL.
static NEXT_IN_MEMORY_ID: AtomicUsize = AtomicUsize::new(1);

/// A SQLite connection.
#[derive(Debug)]
pub struct Sqlite {
    connection: Option<RusqliteConnection>,
    url: String,
}

impl Sqlite {
    /// Opens a connection from a URL: `sqlite::memory:` or `sqlite:<path>`.
    pub fn connect(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(Error::configuration(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(url.path())
        }
    }

    /// Opens a fresh in-memory database.
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        let id = NEXT_IN_MEMORY_ID.fetch_add(1, Ordering::Relaxed);

        Ok(Self {
            connection: Some(connection),
            url: format!("sqlite::memory:#{id}"),
        })
    }

    /// Opens the SQLite database at the specified file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path.as_ref()).map_err(Error::driver)?;

        Ok(Self {
            connection: Some(connection),
            url: format!("sqlite:{}", path.as_ref().display()),
        })
    }

    /// Runs one or more SQL statements without parameters, such as DDL.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.connection()?.execute_batch(sql).map_err(Error::driver)
    }

    /// Closes the connection. Later operations fail.
    pub fn close(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            connection.close().map_err(|(_, err)| Error::driver(err))?;
        }
        Ok(())
    }

    fn connection(&self) -> Result<&RusqliteConnection> {
        self.connection.as_ref().ok_or_else(|| {
            Error::persistence(format!("the connection to [{}] is closed", self.url))
        })
    }

    fn prepare<'a>(
        connection: &'a RusqliteConnection,
        command: &Command,
    ) -> Result<rusqlite::CachedStatement<'a>> {
        if command.kind != CommandKind::Text {
            return Err(Error::persistence(format!(
                "SQLite does not support stored procedures; procedure={}",
                command.text
            )));
        }

        let mut stmt = connection
            .prepare_cached(&command.text)
            .map_err(Error::driver)?;
        bind(&mut stmt, command)?;
        Ok(stmt)
    }
}

impl Connection for Sqlite {
    fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    fn connection_string(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn dialect(&self) -> &'static Dialect {
        &Dialect::SQLITE
    }

    fn query(&mut self, command: &Command) -> Result<Rows> {
        tracing::trace!(sql = %command.text, params = command.params.len(), "query");

        let connection = self.connection()?;
        let mut stmt = Self::prepare(connection, command)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut values = vec![];
        let mut rows = stmt.raw_query();

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let mut record = Vec::with_capacity(width);
            for index in 0..width {
                record.push(Value::from_sql(row.get_ref(index).map_err(Error::driver)?));
            }
            values.push(record);
        }

        Ok(Rows::new(columns, values))
    }

    fn execute(&mut self, command: &Command) -> Result<u64> {
        tracing::trace!(sql = %command.text, params = command.params.len(), "execute");

        let connection = self.connection()?;
        let mut stmt = Self::prepare(connection, command)?;
        let count = stmt.raw_execute().map_err(Error::driver)?;
        Ok(count as u64)
    }

    fn describe_table(&mut self, table_name: &str) -> Result<Option<TableInfo>> {
        let connection = self.connection()?;
        let sql = format!("PRAGMA table_info(\"{}\")", table_name.replace('"', "\"\""));

        let mut stmt = connection.prepare(&sql).map_err(Error::driver)?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    name: row.get("name")?,
                    data_type: row.get("type")?,
                })
            })
            .map_err(Error::driver)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::driver)?;

        if columns.is_empty() {
            return Ok(None);
        }

        Ok(Some(TableInfo {
            name: table_name.to_string(),
            columns,
        }))
    }
}

/// Binds command parameters by placeholder name, or by position for `?`
/// placeholders.
fn bind(stmt: &mut Statement<'_>, command: &Command) -> Result<()> {
    for (position, param) in command.params.iter().enumerate() {
        let index = if param.placeholder.starts_with([':', '@', '$']) {
            stmt.parameter_index(&param.placeholder)
                .map_err(Error::driver)?
                .ok_or_else(|| {
                    Error::persistence(format!(
                        "statement has no parameter [{}]; sql={}",
                        param.placeholder, command.text
                    ))
                })?
        } else {
            position + 1
        };

        stmt.raw_bind_parameter(index, Value(&param.value))
            .map_err(Error::driver)?;
    }

    Ok(())
}
