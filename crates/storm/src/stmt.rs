mod primitive;
pub use primitive::Primitive;

pub use storm_core::stmt::{Type, Value, ValueRecord};
