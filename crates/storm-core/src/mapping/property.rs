use super::{BoundType, Cardinality, Direction, PersistenceEvents};
use crate::stmt::Type;

/// A validated property mapping.
#[derive(Debug, Clone)]
pub struct PropertyMapping {
    /// Name of the mapped property.
    pub property_name: &'static str,

    /// Index of the property in its type's declaration.
    pub property_index: usize,

    pub kind: PropertyMappingKind,
}

#[derive(Debug, Clone)]
pub enum PropertyMappingKind {
    Column(ColumnMapping),
    Parameter(ParameterMapping),
    Relation(RelationMapping),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub column_name: String,
    pub primary_key: bool,
    pub suppressed_events: PersistenceEvents,

    /// Declared type of the property.
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMapping {
    pub parameter_name: String,
    pub direction: Direction,
    pub suppressed_events: PersistenceEvents,

    /// Declared type of the property.
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct RelationMapping {
    pub local_property: String,
    pub related_property: String,

    /// The local property, resolved on the declaring type.
    pub resolved_local: ResolvedProperty,

    /// The related property, resolved on the target type.
    pub resolved_related: ResolvedProperty,

    pub target: BoundType,
    pub cardinality: Cardinality,
}

/// A property found by name during relation validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperty {
    pub name: &'static str,
    pub index: usize,
    pub ty: Type,
}

impl PropertyMapping {
    pub fn as_column(&self) -> Option<&ColumnMapping> {
        match &self.kind {
            PropertyMappingKind::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterMapping> {
        match &self.kind {
            PropertyMappingKind::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationMapping> {
        match &self.kind {
            PropertyMappingKind::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.kind, PropertyMappingKind::Relation(_))
    }

    /// Declared type of the mapped property, `None` for relations.
    pub fn ty(&self) -> Option<Type> {
        match &self.kind {
            PropertyMappingKind::Column(column) => Some(column.ty),
            PropertyMappingKind::Parameter(parameter) => Some(parameter.ty),
            PropertyMappingKind::Relation(_) => None,
        }
    }

    /// Column or parameter name, `None` for relations.
    pub fn storage_name(&self) -> Option<&str> {
        match &self.kind {
            PropertyMappingKind::Column(column) => Some(&column.column_name),
            PropertyMappingKind::Parameter(parameter) => Some(&parameter.parameter_name),
            PropertyMappingKind::Relation(_) => None,
        }
    }

    pub fn suppressed_events(&self) -> PersistenceEvents {
        match &self.kind {
            PropertyMappingKind::Column(column) => column.suppressed_events,
            PropertyMappingKind::Parameter(parameter) => parameter.suppressed_events,
            PropertyMappingKind::Relation(_) => PersistenceEvents::empty(),
        }
    }
}

impl ColumnMapping {
    pub fn suppresses(&self, event: PersistenceEvents) -> bool {
        self.suppressed_events.suppresses(event)
    }
}

impl ParameterMapping {
    pub fn suppresses(&self, event: PersistenceEvents) -> bool {
        self.suppressed_events.suppresses(event)
    }

    /// True when the parameter carries a value into the call.
    pub fn is_input(&self) -> bool {
        matches!(self.direction, Direction::In | Direction::InOut)
    }

    /// True when the call writes a value back into the parameter.
    pub fn is_output(&self) -> bool {
        matches!(self.direction, Direction::Out | Direction::InOut)
    }
}
