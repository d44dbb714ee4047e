use crate::{stmt::Primitive, Result};

use storm_core::stmt::{Type, Value};

/// Reads and writes one scalar property of `M` as a [`Value`].
pub(crate) trait FieldAccess<M>: Send + Sync {
    fn ty(&self) -> Type;

    fn get(&self, instance: &M) -> Value;

    fn set(&self, instance: &mut M, value: Value) -> Result<()>;
}

pub(crate) struct Field<M, T> {
    get: fn(&M) -> &T,
    get_mut: fn(&mut M) -> &mut T,
}

impl<M, T> Field<M, T> {
    pub(crate) fn new(get: fn(&M) -> &T, get_mut: fn(&mut M) -> &mut T) -> Self {
        Field { get, get_mut }
    }
}

impl<M: 'static, T: Primitive> FieldAccess<M> for Field<M, T> {
    fn ty(&self) -> Type {
        T::TYPE
    }

    fn get(&self, instance: &M) -> Value {
        (self.get)(instance).to_value()
    }

    fn set(&self, instance: &mut M, value: Value) -> Result<()> {
        *(self.get_mut)(instance) = T::load(value)?;
        Ok(())
    }
}
