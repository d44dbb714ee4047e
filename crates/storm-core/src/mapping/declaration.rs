use super::{Attribute, BoundType, PersistenceEvents};
use crate::stmt::Type;

/// Everything a type declares about its mapping.
#[derive(Debug, Clone)]
pub struct ClassDeclaration {
    pub kind: DeclarationKind,

    /// Name of the data binder that persists instances of the type.
    pub binder_name: String,

    /// Operations suppressed for the whole type.
    pub suppressed_events: PersistenceEvents,

    pub bound_type: BoundType,

    /// Declared properties, in declaration order. A property's position is
    /// its index.
    pub properties: Vec<DeclaredProperty>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Table { table_name: String },
    Procedure { procedure_name: String },
}

#[derive(Debug, Clone)]
pub struct DeclaredProperty {
    pub name: &'static str,
    pub ty: PropertyTy,

    /// Mapping attributes attached to the property. May be empty.
    pub attributes: Vec<Attribute>,
}

/// Name and type of a property, as seen from another type's relation.
#[derive(Debug, Clone)]
pub struct PropertySignature {
    pub name: &'static str,
    pub ty: PropertyTy,

    /// The property is mapped to a column or input parameter that can
    /// locate stored instances.
    pub lookup: bool,
}

#[derive(Debug, Clone)]
pub enum PropertyTy {
    Scalar(Type),
    Relation(RelationTarget),
}

/// The type on the other side of a relation property.
#[derive(Debug, Clone)]
pub struct RelationTarget {
    pub bound_type: BoundType,
    pub cardinality: Cardinality,

    /// Lists the target type's properties. Resolved lazily so that mutually
    /// related types can be declared.
    pub properties: fn() -> Vec<PropertySignature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

impl ClassDeclaration {
    pub fn property(&self, name: &str) -> Option<(usize, &DeclaredProperty)> {
        self.properties
            .iter()
            .enumerate()
            .find(|(_, property)| property.name == name)
    }

    pub fn signatures(&self) -> Vec<PropertySignature> {
        self.properties
            .iter()
            .map(|property| PropertySignature {
                name: property.name,
                ty: property.ty.clone(),
                lookup: property.attributes.iter().any(Attribute::is_lookup),
            })
            .collect()
    }
}

impl PropertyTy {
    pub fn as_scalar(&self) -> Option<Type> {
        match self {
            PropertyTy::Scalar(ty) => Some(*ty),
            PropertyTy::Relation(_) => None,
        }
    }
}
