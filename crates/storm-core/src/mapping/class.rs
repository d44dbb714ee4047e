use super::{
    BoundType, ColumnMapping, ParameterMapping, PersistenceEvents, ProcedureName,
    PropertyMapping, RelationMapping,
};

/// A validated class-level mapping.
///
/// Produced once per type by validating its declaration, then shared
/// read-only by every operation on that type.
#[derive(Debug, Clone)]
pub struct ClassMapping {
    pub kind: MappingKind,

    /// Name of the data binder that persists instances of the type.
    pub binder_name: String,

    /// Operations suppressed for the whole type.
    pub suppressed_events: PersistenceEvents,

    pub bound_type: BoundType,

    /// Property mappings in declaration order. A property carrying several
    /// attributes contributes one entry per attribute.
    pub properties: Vec<PropertyMapping>,

    pub(super) supports_cascade: bool,
    pub(super) validated: bool,
}

#[derive(Debug, Clone)]
pub enum MappingKind {
    Table(TableMapping),
    Procedure(ProcedureMapping),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableMapping {
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureMapping {
    pub procedure_name: ProcedureName,
}

impl ClassMapping {
    /// True once the mapping has passed validation. Mappings are only built
    /// by validation, so this holds for every instance handed out.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// True when at least one property is a relation.
    pub fn supports_cascade(&self) -> bool {
        self.supports_cascade
    }

    pub fn suppresses(&self, event: PersistenceEvents) -> bool {
        self.suppressed_events.suppresses(event)
    }

    pub fn table_name(&self) -> Option<&str> {
        match &self.kind {
            MappingKind::Table(table) => Some(&table.table_name),
            MappingKind::Procedure(_) => None,
        }
    }

    pub fn procedure_name(&self) -> Option<&ProcedureName> {
        match &self.kind {
            MappingKind::Table(_) => None,
            MappingKind::Procedure(procedure) => Some(&procedure.procedure_name),
        }
    }

    /// Column mappings, with their index into [`ClassMapping::properties`].
    pub fn columns(&self) -> impl Iterator<Item = (usize, &ColumnMapping)> + '_ {
        self.properties
            .iter()
            .enumerate()
            .filter_map(|(index, property)| property.as_column().map(|column| (index, column)))
    }

    /// Parameter mappings, with their index into [`ClassMapping::properties`].
    pub fn parameters(&self) -> impl Iterator<Item = (usize, &ParameterMapping)> + '_ {
        self.properties.iter().enumerate().filter_map(|(index, property)| {
            property.as_parameter().map(|parameter| (index, parameter))
        })
    }

    /// Relation mappings, with their index into [`ClassMapping::properties`].
    pub fn relations(&self) -> impl Iterator<Item = (usize, &RelationMapping)> + '_ {
        self.properties.iter().enumerate().filter_map(|(index, property)| {
            property.as_relation().map(|relation| (index, relation))
        })
    }

    /// Primary key column mappings.
    pub fn primary_key(&self) -> impl Iterator<Item = (usize, &ColumnMapping)> + '_ {
        self.columns().filter(|(_, column)| column.primary_key)
    }

    /// Name of the storage object (table or procedure) for messages.
    pub fn storage_name(&self) -> String {
        match &self.kind {
            MappingKind::Table(table) => table.table_name.clone(),
            MappingKind::Procedure(procedure) => procedure.procedure_name.to_string(),
        }
    }
}
