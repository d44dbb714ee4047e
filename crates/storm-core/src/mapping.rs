//! Mapping descriptors.
//!
//! A [`ClassDeclaration`] is what a type declares about itself: where it is
//! stored, which binder handles it and how each property maps to storage.
//! Validating a declaration produces a [`ClassMapping`], the immutable
//! descriptor every data binder works from.

mod attribute;
pub use attribute::{Attribute, Column, Parameter, Relation};

mod bound_type;
pub use bound_type::BoundType;

mod class;
pub use class::{ClassMapping, MappingKind, ProcedureMapping, TableMapping};

mod declaration;
pub use declaration::{
    Cardinality, ClassDeclaration, DeclarationKind, DeclaredProperty, PropertySignature,
    PropertyTy, RelationTarget,
};

mod events;
pub use events::PersistenceEvents;

mod procedure_name;
pub use procedure_name::ProcedureName;

mod property;
pub use property::{
    ColumnMapping, ParameterMapping, PropertyMapping, PropertyMappingKind, RelationMapping,
    ResolvedProperty,
};

mod validate;

pub use crate::driver::Direction;
