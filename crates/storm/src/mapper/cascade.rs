use super::{Mapper, Mapping, NodeKey};
use crate::{driver::Connection, tracker, Model, Result};

use by_address::ByAddress;
use std::{
    any::Any,
    collections::{HashMap, HashSet},
    sync::Arc,
};
use storm_core::stmt::{Value, ValueRecord};

type Node = Arc<dyn Any + Send + Sync>;

/// State of one mapper operation as it walks relation properties.
///
/// Loaded instances are remembered by [`NodeKey`], so an instance reached
/// twice is loaded once and shared. An instance whose relations are still
/// being loaded is loaded again without its relations instead of being
/// re-entered. Persist and delete visit each related instance at most once.
pub(crate) struct Cascade<'a> {
    mapper: &'a Mapper,
    connection: &'a mut dyn Connection,

    /// Walk relation properties at all.
    enabled: bool,

    /// Instances whose relations are being loaded.
    loading: HashSet<NodeKey>,

    /// Related instances that finished loading.
    loaded: HashMap<NodeKey, Node>,

    /// Related instances already persisted or deleted.
    visited: HashSet<ByAddress<Node>>,
}

impl<'a> Cascade<'a> {
    pub(crate) fn new(mapper: &'a Mapper, connection: &'a mut dyn Connection, enabled: bool) -> Self {
        Cascade {
            mapper,
            connection,
            enabled,
            loading: HashSet::new(),
            loaded: HashMap::new(),
            visited: HashSet::new(),
        }
    }

    pub(crate) fn load<M: Model>(&mut self, instance: &mut M) -> Result<()> {
        let (mapping, binder) = self.mapper.resolve::<M>(self.connection)?;

        let mut record = mapping.record(instance);
        binder.load(&mapping.class, &mut record, self.connection)?;
        mapping.apply(instance, &record)?;
        tracker::capture(&*mapping, instance);

        let key = mapping.node_key(instance);
        self.load_relations(&*mapping, instance, key.as_ref())
    }

    /// Loads every instance matching `example`, or all of them without one.
    pub(crate) fn batch_load<M: Model>(&mut self, example: Option<&M>) -> Result<Vec<M>> {
        let (mapping, binder) = self.mapper.resolve::<M>(self.connection)?;

        let example = match example {
            Some(example) => mapping.record(example),
            None => ValueRecord::nulls(mapping.class.properties.len()),
        };
        let records = binder.batch_load(&mapping.class, &example, self.connection)?;

        let mut instances = Vec::with_capacity(records.len());
        for record in records {
            let mut instance = M::default();
            mapping.apply(&mut instance, &record)?;
            tracker::capture(&*mapping, &mut instance);

            let key = mapping.node_key(&instance);
            self.load_relations(&*mapping, &mut instance, key.as_ref())?;
            instances.push(instance);
        }

        Ok(instances)
    }

    pub(crate) fn persist<M: Model>(&mut self, instance: &M) -> Result<()> {
        let (mapping, binder) = self.mapper.resolve::<M>(self.connection)?;

        binder.persist(&mapping.class, &mapping.record(instance), self.connection)?;

        if self.enabled && mapping.class.supports_cascade() {
            mapping.persist_relations(instance, self)?;
        }
        Ok(())
    }

    pub(crate) fn delete<M: Model>(&mut self, instance: &M) -> Result<()> {
        let (mapping, binder) = self.mapper.resolve::<M>(self.connection)?;

        if self.enabled && mapping.class.supports_cascade() {
            mapping.delete_relations(instance, self)?;
        }

        binder.delete(&mapping.class, &mapping.record(instance), self.connection)
    }

    /// Loads the instance of `R` whose property at `index` holds `join`.
    ///
    /// A missing record leaves the relation empty.
    pub(crate) fn load_one<R: Model>(&mut self, index: usize, join: Value) -> Result<Option<Arc<R>>> {
        let (mapping, binder) = self.mapper.resolve::<R>(self.connection)?;

        let mut instance = R::default();
        mapping.set(&mut instance, index, join)?;

        if let Some(done) = mapping.node_key(&instance).and_then(|key| self.reuse::<R>(&key)) {
            return Ok(Some(done));
        }

        let mut record = mapping.record(&instance);
        match binder.load(&mapping.class, &mut record, self.connection) {
            Ok(()) => {}
            Err(err) if err.is_record_not_found() => return Ok(None),
            Err(err) => return Err(err),
        }
        mapping.apply(&mut instance, &record)?;

        self.complete(&*mapping, instance).map(Some)
    }

    /// Loads every instance of `R` whose property at `index` holds `join`.
    ///
    /// No matching record leaves the relation empty.
    pub(crate) fn load_many<R: Model>(&mut self, index: usize, join: Value) -> Result<Vec<Arc<R>>> {
        let (mapping, binder) = self.mapper.resolve::<R>(self.connection)?;

        let example = mapping.example(index, join)?;
        let records = match binder.batch_load(&mapping.class, &example, self.connection) {
            Ok(records) => records,
            Err(err) if err.is_record_not_found() => return Ok(vec![]),
            Err(err) => return Err(err),
        };

        let mut related = Vec::with_capacity(records.len());
        for record in records {
            let mut instance = R::default();
            mapping.apply(&mut instance, &record)?;

            match mapping.node_key(&instance).and_then(|key| self.reuse::<R>(&key)) {
                Some(done) => related.push(done),
                None => related.push(self.complete(&*mapping, instance)?),
            }
        }

        Ok(related)
    }

    pub(crate) fn persist_related<R: Model>(&mut self, related: &Arc<R>) -> Result<()> {
        if !self.visit(related) {
            return Ok(());
        }
        self.persist(&**related)
    }

    pub(crate) fn delete_related<R: Model>(&mut self, related: &Arc<R>) -> Result<()> {
        if !self.visit(related) {
            return Ok(());
        }
        self.delete(&**related)
    }

    /// Finishes a related instance: captures its snapshot, loads its own
    /// relations and remembers it for reuse.
    fn complete<R: Model>(&mut self, mapping: &Mapping<R>, mut instance: R) -> Result<Arc<R>> {
        tracker::capture(mapping, &mut instance);

        let key = mapping.node_key(&instance);
        self.load_relations(mapping, &mut instance, key.as_ref())?;

        let instance = Arc::new(instance);
        if let Some(key) = key {
            self.loaded.insert(key, instance.clone());
        }
        Ok(instance)
    }

    fn load_relations<M: Model>(
        &mut self,
        mapping: &Mapping<M>,
        instance: &mut M,
        key: Option<&NodeKey>,
    ) -> Result<()> {
        if !self.enabled || !mapping.class.supports_cascade() {
            return Ok(());
        }

        let Some(key) = key else {
            return mapping.load_relations(instance, self);
        };

        if !self.loading.insert(key.clone()) {
            tracing::trace!(ty = %mapping.class.bound_type, "relations already loading; skipping");
            return Ok(());
        }

        let res = mapping.load_relations(instance, self);
        self.loading.remove(key);
        res
    }

    fn reuse<R: Model>(&self, key: &NodeKey) -> Option<Arc<R>> {
        self.loaded.get(key)?.clone().downcast::<R>().ok()
    }

    /// Returns `true` the first time `related` is visited.
    fn visit<R: Model>(&mut self, related: &Arc<R>) -> bool {
        let node: Node = related.clone();
        self.visited.insert(ByAddress(node))
    }
}
