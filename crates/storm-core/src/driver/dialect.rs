use crate::stmt::Type;

/// Describes the SQL dialect of a connection: how parameters are written,
/// how database type names map to property types and how large bound
/// parameters are declared.
#[derive(Debug)]
pub struct Dialect {
    pub name: &'static str,

    pub placeholder: Placeholder,

    /// True when the database supports stored procedures.
    pub procedures: bool,

    /// Database type names and the property types each one accepts. A name
    /// accepting several types is listed once per type, its canonical type
    /// first. Lookups ignore case and any `(n)` length suffix.
    pub type_names: &'static [(&'static str, Type)],

    pub type_sizes: TypeSizes,
}

/// How parameter placeholders are written in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `:NAME`
    Colon,

    /// `@NAME`
    At,

    /// `$1`, `$2`, ...
    Numbered,

    /// `?`
    Positional,
}

/// Parameter sizes by property type.
#[derive(Debug, Clone, Copy)]
pub struct TypeSizes {
    pub bool: usize,
    pub i16: usize,
    pub i32: usize,
    pub i64: usize,
    pub f32: usize,
    pub f64: usize,

    /// Size of string and byte parameters. Zero means unbounded.
    pub text: usize,
}

impl Dialect {
    /// SQLite dialect.
    pub const SQLITE: Self = Self {
        name: "sqlite",
        placeholder: Placeholder::Colon,
        procedures: false,
        type_names: &[
            ("BOOLEAN", Type::Bool),
            ("SMALLINT", Type::I16),
            ("INT", Type::I64),
            ("INT", Type::I32),
            ("INTEGER", Type::I64),
            ("INTEGER", Type::I32),
            ("BIGINT", Type::I64),
            ("REAL", Type::F64),
            ("FLOAT", Type::F64),
            ("DOUBLE", Type::F64),
            ("TEXT", Type::String),
            ("VARCHAR", Type::String),
            ("CHAR", Type::String),
            ("BLOB", Type::Bytes),
        ],
        type_sizes: TypeSizes::UNBOUNDED_TEXT,
    };

    /// PostgreSQL dialect.
    pub const POSTGRESQL: Self = Self {
        name: "postgresql",
        placeholder: Placeholder::Numbered,
        procedures: true,
        type_names: &[
            ("BOOLEAN", Type::Bool),
            ("SMALLINT", Type::I16),
            ("INTEGER", Type::I32),
            ("BIGINT", Type::I64),
            ("REAL", Type::F32),
            ("DOUBLE PRECISION", Type::F64),
            ("TEXT", Type::String),
            ("CHARACTER VARYING", Type::String),
            ("BYTEA", Type::Bytes),
        ],
        type_sizes: TypeSizes::UNBOUNDED_TEXT,
    };

    /// MySQL dialect.
    pub const MYSQL: Self = Self {
        name: "mysql",
        placeholder: Placeholder::Positional,
        procedures: true,
        type_names: &[
            ("TINYINT", Type::Bool),
            ("SMALLINT", Type::I16),
            ("INT", Type::I32),
            ("BIGINT", Type::I64),
            ("FLOAT", Type::F32),
            ("DOUBLE", Type::F64),
            ("VARCHAR", Type::String),
            ("TEXT", Type::String),
            ("BLOB", Type::Bytes),
        ],
        type_sizes: TypeSizes::BOUNDED_TEXT,
    };

    /// Oracle dialect.
    pub const ORACLE: Self = Self {
        name: "oracle",
        placeholder: Placeholder::Colon,
        procedures: true,
        type_names: &[
            ("CHAR", Type::String),
            ("VARCHAR2", Type::String),
            ("NVARCHAR2", Type::String),
            ("NUMBER", Type::I64),
            ("NUMBER", Type::I32),
            ("NUMBER", Type::I16),
            ("NUMBER", Type::Bool),
            ("BINARY_FLOAT", Type::F32),
            ("BINARY_DOUBLE", Type::F64),
            ("RAW", Type::Bytes),
            ("BLOB", Type::Bytes),
        ],
        type_sizes: TypeSizes::BOUNDED_TEXT,
    };

    /// Maps a database type name to its canonical property type.
    pub fn translate(&self, db_type: &str) -> Option<Type> {
        self.accepted(db_type).next()
    }

    /// Whether a value of type `ty` may be stored in a column or parameter
    /// declared as `db_type`. `None` when the type name is unknown.
    pub fn accepts(&self, db_type: &str, ty: Type) -> Option<bool> {
        let mut accepted = self.accepted(db_type).peekable();
        accepted.peek()?;
        Some(accepted.any(|candidate| candidate == ty))
    }

    fn accepted<'a>(&self, db_type: &'a str) -> impl Iterator<Item = Type> + 'a {
        let base = db_type.split('(').next().unwrap_or(db_type).trim();
        let names: &'static [(&'static str, Type)] = self.type_names;

        names
            .iter()
            .filter(move |(name, _)| name.eq_ignore_ascii_case(base))
            .map(|(_, ty)| *ty)
    }

    /// Size used when declaring a parameter of type `ty`.
    pub fn parameter_size(&self, ty: Type) -> usize {
        let sizes = &self.type_sizes;
        match ty {
            Type::Bool => sizes.bool,
            Type::I16 => sizes.i16,
            Type::I32 => sizes.i32,
            Type::I64 => sizes.i64,
            Type::F32 => sizes.f32,
            Type::F64 => sizes.f64,
            Type::String | Type::Bytes => sizes.text,
        }
    }
}

impl TypeSizes {
    pub const UNBOUNDED_TEXT: Self = Self {
        bool: 1,
        i16: 2,
        i32: 4,
        i64: 8,
        f32: 4,
        f64: 8,
        text: 0,
    };

    pub const BOUNDED_TEXT: Self = Self {
        text: 2048,
        ..Self::UNBOUNDED_TEXT
    };
}
