use crate::{
    schema::{Access, FieldAccess, RelationAccess},
    Error, Model, Result,
};

use super::Cascade;

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use storm_core::{
    mapping::{ClassMapping, MappingKind, RelationMapping},
    stmt::{Value, ValueRecord},
};

/// A validated mapping together with the accessors for the type's
/// properties.
pub(crate) struct Mapping<M> {
    pub(crate) class: Arc<ClassMapping>,

    /// Accessors indexed by property index.
    access: Vec<Access<M>>,
}

/// Validated mappings by type.
#[derive(Default)]
pub(crate) struct MappingCache {
    entries: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

/// Identifies one instance during a cascade: primary key values for tables,
/// input parameter values for procedures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    ty: TypeId,
    values: Vec<Value>,
}

/// A relation property with its accessor.
struct Related<'a, M> {
    name: &'static str,
    mapping: &'a RelationMapping,
    access: &'a dyn RelationAccess<M>,
}

impl<M: Model> Mapping<M> {
    pub(crate) fn new(class: ClassMapping, access: Vec<Access<M>>) -> Mapping<M> {
        Mapping {
            class: Arc::new(class),
            access,
        }
    }

    /// Value of the property at `index`. Relation properties read as null.
    pub(crate) fn get(&self, instance: &M, index: usize) -> Value {
        match self.field(index) {
            Some(field) => field.get(instance),
            None => Value::Null,
        }
    }

    pub(crate) fn set(&self, instance: &mut M, index: usize, value: Value) -> Result<()> {
        let Some(field) = self.field(index) else {
            return Err(Error::persistence(format!(
                "property #{index} of type [{}] is not a scalar property",
                self.class.bound_type
            )));
        };
        field.set(instance, value)
    }

    /// One value per property mapping, read from `instance`.
    pub(crate) fn record(&self, instance: &M) -> ValueRecord {
        ValueRecord::from_vec(
            self.class
                .properties
                .iter()
                .map(|property| self.get(instance, property.property_index))
                .collect(),
        )
    }

    /// A record that is null everywhere except the mappings of the property
    /// at `index`. Fails when no mapping of that property can filter.
    pub(crate) fn example(&self, index: usize, value: Value) -> Result<ValueRecord> {
        let mut record = ValueRecord::nulls(self.class.properties.len());
        let mut matched = false;

        for (position, property) in self.class.properties.iter().enumerate() {
            if property.property_index == index && !property.is_relation() {
                record[position] = value.clone();
                matched = true;
            }
        }

        if !matched {
            return Err(Error::persistence(format!(
                "property #{index} of type [{}] is not mapped and cannot filter a batch load",
                self.class.bound_type
            )));
        }
        Ok(record)
    }

    /// Writes a record produced by a data binder back into `instance`.
    pub(crate) fn apply(&self, instance: &mut M, record: &ValueRecord) -> Result<()> {
        for (property, value) in self.class.properties.iter().zip(record.iter()) {
            if property.is_relation() {
                continue;
            }

            self.set(instance, property.property_index, value.clone())
                .map_err(|err| {
                    err.context(Error::persistence(format!(
                        "unable to assign property [{}] of type [{}]",
                        property.property_name, self.class.bound_type
                    )))
                })?;
        }
        Ok(())
    }

    /// `None` while any identifying value is null.
    pub(crate) fn node_key(&self, instance: &M) -> Option<NodeKey> {
        let values: Vec<Value> = match &self.class.kind {
            MappingKind::Table(_) => self
                .class
                .primary_key()
                .map(|(index, _)| self.get(instance, self.class.properties[index].property_index))
                .collect(),
            MappingKind::Procedure(_) => self
                .class
                .parameters()
                .filter(|(_, parameter)| parameter.is_input())
                .map(|(index, _)| self.get(instance, self.class.properties[index].property_index))
                .collect(),
        };

        if values.iter().any(Value::is_null) {
            return None;
        }

        Some(NodeKey {
            ty: self.class.bound_type.id,
            values,
        })
    }

    pub(crate) fn load_relations(&self, instance: &mut M, cx: &mut Cascade<'_>) -> Result<()> {
        for relation in self.relations() {
            let join = self.get(instance, relation.mapping.resolved_local.index);
            relation
                .access
                .load(instance, join, relation.mapping, cx)
                .map_err(|err| self.cascade_failed(err, &relation, "load"))?;
        }
        Ok(())
    }

    pub(crate) fn persist_relations(&self, instance: &M, cx: &mut Cascade<'_>) -> Result<()> {
        for relation in self.relations() {
            relation
                .access
                .persist(instance, cx)
                .map_err(|err| self.cascade_failed(err, &relation, "persist"))?;
        }
        Ok(())
    }

    pub(crate) fn delete_relations(&self, instance: &M, cx: &mut Cascade<'_>) -> Result<()> {
        for relation in self.relations() {
            relation
                .access
                .delete(instance, cx)
                .map_err(|err| self.cascade_failed(err, &relation, "delete"))?;
        }
        Ok(())
    }

    fn field(&self, index: usize) -> Option<&dyn FieldAccess<M>> {
        match self.access.get(index)? {
            Access::Field(field) => Some(&**field),
            Access::Relation(_) => None,
        }
    }

    fn relations(&self) -> impl Iterator<Item = Related<'_, M>> + '_ {
        self.class.relations().filter_map(|(index, mapping)| {
            let property = &self.class.properties[index];
            match self.access.get(property.property_index)? {
                Access::Relation(access) => Some(Related {
                    name: property.property_name,
                    mapping,
                    access: &**access,
                }),
                Access::Field(_) => None,
            }
        })
    }

    fn cascade_failed(&self, err: Error, relation: &Related<'_, M>, op: &str) -> Error {
        err.context(Error::persistence(format!(
            "unable to {op} relation [{}] of type [{}]",
            relation.name, self.class.bound_type
        )))
    }
}

impl MappingCache {
    /// Returns the mapping of `M`, building it with `build` on first use.
    ///
    /// The cache stays locked while `build` runs, so concurrent first uses
    /// of a type validate it once. A failed build leaves no entry behind.
    pub(crate) fn get_or_build<M: Model>(
        &self,
        build: impl FnOnce() -> Result<Mapping<M>>,
    ) -> Result<Arc<Mapping<M>>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let entry = match entries.get(&TypeId::of::<M>()) {
            Some(entry) => entry.clone(),
            None => {
                let mapping: Arc<dyn Any + Send + Sync> = Arc::new(build()?);
                entries.insert(TypeId::of::<M>(), mapping.clone());
                mapping
            }
        };

        entry.downcast::<Mapping<M>>().map_err(|_| {
            Error::persistence(format!(
                "cached mapping has an unexpected type; expected={}",
                std::any::type_name::<M>()
            ))
        })
    }

    pub(crate) fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub(crate) fn remove(&self, ty: TypeId) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&ty)
            .is_some()
    }
}
