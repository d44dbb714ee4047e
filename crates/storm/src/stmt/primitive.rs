use crate::Result;

use storm_core::stmt;

/// A property type that maps to a single column or parameter value.
///
/// Non-optional primitives load a database null as their default value;
/// wrap the type in `Option` to keep nulls distinguishable.
pub trait Primitive: Sized + Send + Sync + 'static {
    const TYPE: stmt::Type;

    fn to_value(&self) -> stmt::Value;

    fn load(value: stmt::Value) -> Result<Self>;
}

macro_rules! impl_primitive {
    ( $( $ty:ty => $variant:ident, )* ) => {
        $(
            impl Primitive for $ty {
                const TYPE: stmt::Type = stmt::Type::$variant;

                fn to_value(&self) -> stmt::Value {
                    stmt::Value::$variant(self.clone())
                }

                fn load(value: stmt::Value) -> Result<Self> {
                    if value.is_null() {
                        return Ok(Self::default());
                    }
                    value.try_into()
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec<u8> => Bytes,
}

impl<T: Primitive> Primitive for Option<T> {
    const TYPE: stmt::Type = T::TYPE;

    fn to_value(&self) -> stmt::Value {
        match self {
            Some(value) => value.to_value(),
            None => stmt::Value::Null,
        }
    }

    fn load(value: stmt::Value) -> Result<Self> {
        match value {
            stmt::Value::Null => Ok(None),
            value => Ok(Some(T::load(value)?)),
        }
    }
}
