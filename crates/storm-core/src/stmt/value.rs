use super::Type;
use crate::{Error, Result};

use std::hash::{Hash, Hasher};

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 32-bit floating point
    F32(f32),

    /// 64-bit floating point
    F64(f64),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    /// Returns the type of the value, or `None` for null.
    pub fn infer_ty(&self) -> Option<Type> {
        Some(match self {
            Self::Bool(_) => Type::Bool,
            Self::I16(_) => Type::I16,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::F32(_) => Type::F32,
            Self::F64(_) => Type::F64,
            Self::String(_) => Type::String,
            Self::Bytes(_) => Type::Bytes,
            Self::Null => return None,
        })
    }

    pub(crate) fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::I16(_) => "I16",
            Self::I32(_) => "I32",
            Self::I64(_) => "I64",
            Self::F32(_) => "F32",
            Self::F64(_) => "F64",
            Self::String(_) => "String",
            Self::Bytes(_) => "Bytes",
            Self::Null => "Null",
        }
    }

    /// Converts a value returned by a driver into the given type.
    ///
    /// Null converts to null for every type. Integer narrowing is checked and
    /// fails if the value does not fit.
    pub fn convert(self, ty: Type) -> Result<Value> {
        use Value::*;

        if self.infer_ty() == Some(ty) {
            return Ok(self);
        }

        let converted = match (&self, ty) {
            (Null, _) => Some(Null),
            (Bool(v), Type::I16) => Some(I16(*v as i16)),
            (Bool(v), Type::I32) => Some(I32(*v as i32)),
            (Bool(v), Type::I64) => Some(I64(*v as i64)),
            (I16(v), Type::Bool) => Some(Bool(*v != 0)),
            (I32(v), Type::Bool) => Some(Bool(*v != 0)),
            (I64(v), Type::Bool) => Some(Bool(*v != 0)),
            (I16(v), Type::I32) => Some(I32((*v).into())),
            (I16(v), Type::I64) => Some(I64((*v).into())),
            (I32(v), Type::I16) => i16::try_from(*v).ok().map(I16),
            (I32(v), Type::I64) => Some(I64((*v).into())),
            (I64(v), Type::I16) => i16::try_from(*v).ok().map(I16),
            (I64(v), Type::I32) => i32::try_from(*v).ok().map(I32),
            (I16(v), Type::F32) => Some(F32((*v).into())),
            (I16(v), Type::F64) => Some(F64((*v).into())),
            (I32(v), Type::F64) => Some(F64((*v).into())),
            (I32(v), Type::F32) => Some(F32(*v as f32)),
            (I64(v), Type::F32) => Some(F32(*v as f32)),
            (I64(v), Type::F64) => Some(F64(*v as f64)),
            (F32(v), Type::F64) => Some(F64((*v).into())),
            (F64(v), Type::F32) => Some(F32(*v as f32)),
            (String(v), Type::Bytes) => Some(Bytes(v.as_bytes().to_vec())),
            (Bytes(v), Type::String) => std::str::from_utf8(v)
                .ok()
                .map(|s| String(s.to_string())),
            _ => None,
        };

        converted.ok_or_else(|| Error::type_conversion(self, ty))
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);

        match self {
            Value::Bool(v) => v.hash(state),
            Value::I16(v) => v.hash(state),
            Value::I32(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::F32(v) => v.to_bits().hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Bytes(v) => v.hash(state),
            Value::Null => {}
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
