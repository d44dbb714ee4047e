mod declaration;
pub use declaration::Declaration;
pub(crate) use declaration::Access;

mod field;
pub(crate) use field::{Field, FieldAccess};

mod relation;
pub(crate) use relation::{HasMany, HasOne, RelationAccess};
