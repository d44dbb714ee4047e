use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use storm_core::stmt::Value as CoreValue;

/// Bridges storm values and SQLite values.
#[derive(Debug)]
pub struct Value<'a>(pub(crate) &'a CoreValue);

impl Value<'_> {
    /// Converts a SQLite value as stored in a row. SQLite has no type
    /// declarations on values, so integers come back as `I64`, reals as
    /// `F64`; the data binder converts them to the declared property type.
    pub fn from_sql(value: ValueRef<'_>) -> CoreValue {
        match value {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => CoreValue::String(String::from_utf8_lossy(value).into_owned()),
            ValueRef::Blob(value) => CoreValue::Bytes(value.to_vec()),
        }
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            CoreValue::Bool(true) => ToSqlOutput::Owned(SqlValue::Integer(1)),
            CoreValue::Bool(false) => ToSqlOutput::Owned(SqlValue::Integer(0)),
            CoreValue::I16(v) => ToSqlOutput::Owned(SqlValue::Integer(*v as i64)),
            CoreValue::I32(v) => ToSqlOutput::Owned(SqlValue::Integer(*v as i64)),
            CoreValue::I64(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            CoreValue::F32(v) => ToSqlOutput::Owned(SqlValue::Real(*v as f64)),
            CoreValue::F64(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            CoreValue::String(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            CoreValue::Bytes(v) => ToSqlOutput::Borrowed(ValueRef::Blob(&v[..])),
            CoreValue::Null => ToSqlOutput::Owned(SqlValue::Null),
        })
    }
}
