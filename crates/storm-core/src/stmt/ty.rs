/// The storage-independent type of a mapped property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 16-bit integer
    I16,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// 32-bit floating point
    F32,

    /// 64-bit floating point
    F64,

    /// String type
    String,

    /// Raw bytes
    Bytes,
}

impl Type {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Type::I16 | Type::I32 | Type::I64 | Type::F32 | Type::F64
        )
    }
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(match self {
            Type::Bool => "bool",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F32 => "f32",
            Type::F64 => "f64",
            Type::String => "String",
            Type::Bytes => "Vec<u8>",
        })
    }
}
