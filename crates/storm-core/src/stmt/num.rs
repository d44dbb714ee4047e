use super::{Type, Value};
use crate::Error;

macro_rules! impl_num {
    (
        $(
            $variant:ident($ty:ty) {
                $is:ident
            } )*
    ) => {
        impl Type {
            $(
                pub fn $is(&self) -> bool {
                    matches!(self, Self::$variant)
                }
            )*
        }

        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<&$ty> for Value {
                fn from(value: &$ty) -> Self {
                    Self::$variant(*value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value.convert(Type::$variant)? {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::type_conversion(other, Type::$variant)),
                    }
                }
            }
        )*
    };
}

impl_num! {
    I16(i16) {
        is_i16
    }
    I32(i32) {
        is_i32
    }
    I64(i64) {
        is_i64
    }
    F32(f32) {
        is_f32
    }
    F64(f64) {
        is_f64
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.convert(Type::Bool)? {
            Value::Bool(v) => Ok(v),
            other => Err(Error::type_conversion(other, Type::Bool)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.convert(Type::String)? {
            Value::String(v) => Ok(v),
            other => Err(Error::type_conversion(other, Type::String)),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.convert(Type::Bytes)? {
            Value::Bytes(v) => Ok(v),
            other => Err(Error::type_conversion(other, Type::Bytes)),
        }
    }
}
