use super::Direction;
use crate::mapping::ProcedureName;

/// A table as described by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,

    /// Database type name, such as `VARCHAR(40)`.
    pub data_type: String,
}

/// A stored procedure as described by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureInfo {
    pub name: ProcedureName,
    pub parameters: Vec<ParameterInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    pub name: String,
    pub direction: Direction,
    pub data_type: String,
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }
}

impl ProcedureInfo {
    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name.eq_ignore_ascii_case(name))
    }
}
