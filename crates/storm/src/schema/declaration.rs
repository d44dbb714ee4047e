use super::{Field, FieldAccess, HasMany, HasOne, RelationAccess};
use crate::{stmt::Primitive, Model};

use std::{marker::PhantomData, sync::Arc};
use storm_core::mapping::{
    Attribute, BoundType, Cardinality, ClassDeclaration, Column, DeclarationKind,
    DeclaredProperty, Parameter, PersistenceEvents, PropertySignature, PropertyTy, Relation,
    RelationTarget,
};

/// Describes how a [`Model`] type is mapped.
///
/// Built by [`Model::declare`]. Each property is declared with a name, a
/// pair of accessor functions and the mapping attributes attached to it.
/// Declaring a property without attributes makes it visible to relations
/// without mapping it to storage.
pub struct Declaration<M> {
    kind: DeclarationKind,
    binder_name: String,
    suppressed_events: PersistenceEvents,
    properties: Vec<Property<M>>,
    _p: PhantomData<fn() -> M>,
}

pub(crate) struct Property<M> {
    pub(crate) name: &'static str,
    pub(crate) access: Access<M>,
    pub(crate) attributes: Vec<Attribute>,
}

pub(crate) enum Access<M> {
    Field(Box<dyn FieldAccess<M>>),
    Relation(Box<dyn RelationAccess<M>>),
}

impl<M: Model> Declaration<M> {
    /// Maps the type to a table, persisted by the named data binder.
    pub fn table(table_name: impl Into<String>, binder_name: impl Into<String>) -> Self {
        let kind = DeclarationKind::Table {
            table_name: table_name.into(),
        };
        Self::new(kind, binder_name.into())
    }

    /// Maps the type to a stored procedure, invoked by the named data
    /// binder. The name may be qualified as `[schema.][package.]name`.
    pub fn procedure(procedure_name: impl Into<String>, binder_name: impl Into<String>) -> Self {
        let kind = DeclarationKind::Procedure {
            procedure_name: procedure_name.into(),
        };
        Self::new(kind, binder_name.into())
    }

    fn new(kind: DeclarationKind, binder_name: String) -> Self {
        Declaration {
            kind,
            binder_name,
            suppressed_events: PersistenceEvents::empty(),
            properties: vec![],
            _p: PhantomData,
        }
    }

    /// Suppresses persistence events for the whole type.
    pub fn suppress(mut self, events: PersistenceEvents) -> Self {
        self.suppressed_events |= events;
        self
    }

    /// Declares a property mapped to a column.
    pub fn column<T: Primitive>(
        self,
        name: &'static str,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
        column: Column,
    ) -> Self {
        self.field(name, get, get_mut, [Attribute::Column(column)])
    }

    /// Declares a property mapped to a stored-procedure parameter.
    pub fn parameter<T: Primitive>(
        self,
        name: &'static str,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
        parameter: Parameter,
    ) -> Self {
        self.field(name, get, get_mut, [Attribute::Parameter(parameter)])
    }

    /// Declares an unmapped property.
    pub fn property<T: Primitive>(
        self,
        name: &'static str,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
    ) -> Self {
        self.field(name, get, get_mut, [])
    }

    /// Declares a property with any number of mapping attributes.
    pub fn field<T: Primitive>(
        mut self,
        name: &'static str,
        get: fn(&M) -> &T,
        get_mut: fn(&mut M) -> &mut T,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> Self {
        self.properties.push(Property {
            name,
            access: Access::Field(Box::new(Field::new(get, get_mut))),
            attributes: attributes.into_iter().collect(),
        });
        self
    }

    /// Declares a property holding at most one related instance.
    pub fn relation_one<R: Model>(
        mut self,
        name: &'static str,
        get: fn(&M) -> &Option<Arc<R>>,
        get_mut: fn(&mut M) -> &mut Option<Arc<R>>,
        relation: Relation,
    ) -> Self {
        self.properties.push(Property {
            name,
            access: Access::Relation(Box::new(HasOne::new(get, get_mut))),
            attributes: vec![Attribute::Relation(relation)],
        });
        self
    }

    /// Declares a property holding a list of related instances.
    pub fn relation_many<R: Model>(
        mut self,
        name: &'static str,
        get: fn(&M) -> &Vec<Arc<R>>,
        get_mut: fn(&mut M) -> &mut Vec<Arc<R>>,
        relation: Relation,
    ) -> Self {
        self.properties.push(Property {
            name,
            access: Access::Relation(Box::new(HasMany::new(get, get_mut))),
            attributes: vec![Attribute::Relation(relation)],
        });
        self
    }

    /// Splits the declaration into its storage description and the property
    /// accessors, indexed alike.
    pub(crate) fn into_parts(self) -> (ClassDeclaration, Vec<Access<M>>) {
        let mut properties = Vec::with_capacity(self.properties.len());
        let mut access = Vec::with_capacity(self.properties.len());

        for property in self.properties {
            properties.push(DeclaredProperty {
                name: property.name,
                ty: property.access.ty(),
                attributes: property.attributes,
            });
            access.push(property.access);
        }

        let declaration = ClassDeclaration {
            kind: self.kind,
            binder_name: self.binder_name,
            suppressed_events: self.suppressed_events,
            bound_type: BoundType::of::<M>(),
            properties,
        };

        (declaration, access)
    }
}

impl<M> Access<M> {
    pub(crate) fn ty(&self) -> PropertyTy {
        match self {
            Access::Field(field) => PropertyTy::Scalar(field.ty()),
            Access::Relation(relation) => PropertyTy::Relation(relation.target()),
        }
    }
}

/// Property names and types of `R`, for resolving relations that target it.
pub(crate) fn signatures<R: Model>() -> Vec<PropertySignature> {
    R::declare()
        .properties
        .iter()
        .map(|property| PropertySignature {
            name: property.name,
            ty: property.access.ty(),
            lookup: property.attributes.iter().any(Attribute::is_lookup),
        })
        .collect()
}

pub(crate) fn relation_target<R: Model>(cardinality: Cardinality) -> RelationTarget {
    RelationTarget {
        bound_type: BoundType::of::<R>(),
        cardinality,
        properties: signatures::<R>,
    }
}
