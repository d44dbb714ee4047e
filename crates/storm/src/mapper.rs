mod binders;
use binders::Binders;
pub use binders::Factory;

mod builder;
pub use builder::Builder;

mod cascade;
pub(crate) use cascade::Cascade;

mod mapping;
pub(crate) use mapping::{Mapping, MappingCache, NodeKey};

use crate::{binder::DataBinder, driver::Connection, tracker, Error, Model, Result};

use indexmap::IndexMap;
use std::{
    any::TypeId,
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};
use storm_core::mapping::{BoundType, ClassMapping};

/// Loads, persists and deletes mapped instances.
///
/// A mapper owns every cache: validated mappings, data binder instances and
/// the record of which mappings were checked against which database. Mappers
/// are independent of each other and safe to share between threads.
/// Connections are supplied per call and never opened or closed here.
pub struct Mapper {
    models: IndexMap<TypeId, Registration>,
    mappings: MappingCache,
    binders: Binders,

    /// (type, connection string, binder name) triples whose schema has been
    /// validated.
    schema_validated: Mutex<HashSet<(TypeId, String, String)>>,

    validate_schema: bool,
    default_cascade: bool,
}

struct Registration {
    bound_type: BoundType,
    validate: fn(&Mapper) -> Result<()>,
}

impl Mapper {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Validates the mapping of `M`. Later calls reuse the first result.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %BoundType::of::<M>()))]
    pub fn validate<M: Model>(&self) -> Result<()> {
        self.mapping::<M>().map(drop)
    }

    /// Loads `instance` by its primary key, or by calling its stored
    /// procedure, then loads its relations.
    ///
    /// Instances reached more than once during the cascade are shared. The
    /// root is the exception: a relation cycle leading back to it gets a
    /// separately loaded copy whose relations are left empty.
    pub fn load<M: Model>(&self, instance: &mut M, connection: &mut dyn Connection) -> Result<()> {
        self.load_with(instance, connection, self.default_cascade)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(ty = %BoundType::of::<M>(), cascade = cascade))]
    pub fn load_with<M: Model>(
        &self,
        instance: &mut M,
        connection: &mut dyn Connection,
        cascade: bool,
    ) -> Result<()> {
        Cascade::new(self, connection, cascade)
            .load(instance)
            .map_err(|err| failed::<M>(err, "load"))
    }

    /// Loads every instance matching the non-null mapped properties of
    /// `example`. Finding nothing is an error.
    pub fn batch_load<M: Model>(
        &self,
        example: &M,
        connection: &mut dyn Connection,
    ) -> Result<Vec<M>> {
        self.batch_load_with(example, connection, self.default_cascade)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(ty = %BoundType::of::<M>(), cascade = cascade))]
    pub fn batch_load_with<M: Model>(
        &self,
        example: &M,
        connection: &mut dyn Connection,
        cascade: bool,
    ) -> Result<Vec<M>> {
        let instances = Cascade::new(self, connection, cascade)
            .batch_load(Some(example))
            .map_err(|err| failed::<M>(err, "batch load"))?;

        tracing::debug!(count = instances.len(), "batch loaded");
        Ok(instances)
    }

    /// Loads every stored instance of `M`.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %BoundType::of::<M>()))]
    pub fn batch_load_all<M: Model>(&self, connection: &mut dyn Connection) -> Result<Vec<M>> {
        Cascade::new(self, connection, self.default_cascade)
            .batch_load::<M>(None)
            .map_err(|err| failed::<M>(err, "batch load"))
    }

    /// Updates `instance` if a record with its primary key exists, inserts it
    /// otherwise.
    pub fn persist<M: Model>(&self, instance: &M, connection: &mut dyn Connection) -> Result<()> {
        self.persist_with(instance, connection, self.default_cascade)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(ty = %BoundType::of::<M>(), cascade = cascade))]
    pub fn persist_with<M: Model>(
        &self,
        instance: &M,
        connection: &mut dyn Connection,
        cascade: bool,
    ) -> Result<()> {
        Cascade::new(self, connection, cascade)
            .persist(instance)
            .map_err(|err| failed::<M>(err, "persist"))
    }

    /// Persists `instance` only when it differs from its snapshot, then
    /// captures a new snapshot. Returns `true` if anything was written.
    pub fn persist_if_changed<M: Model>(
        &self,
        instance: &mut M,
        connection: &mut dyn Connection,
    ) -> Result<bool> {
        if !self.has_changes(instance)? {
            tracing::debug!(ty = %BoundType::of::<M>(), "unchanged; skipping persist");
            return Ok(false);
        }

        self.persist(instance, connection)?;
        self.capture_snapshot(instance)?;
        Ok(true)
    }

    /// Deletes `instance` by its primary key.
    pub fn delete<M: Model>(&self, instance: &M, connection: &mut dyn Connection) -> Result<()> {
        self.delete_with(instance, connection, self.default_cascade)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(ty = %BoundType::of::<M>(), cascade = cascade))]
    pub fn delete_with<M: Model>(
        &self,
        instance: &M,
        connection: &mut dyn Connection,
        cascade: bool,
    ) -> Result<()> {
        Cascade::new(self, connection, cascade)
            .delete(instance)
            .map_err(|err| failed::<M>(err, "delete"))
    }

    /// Returns `true` unless `instance` carries a snapshot matching its
    /// current mapped values.
    pub fn has_changes<M: Model>(&self, instance: &M) -> Result<bool> {
        Ok(tracker::has_changes(&*self.mapping::<M>()?, instance))
    }

    /// Records the current mapped values of `instance` in its snapshot.
    pub fn capture_snapshot<M: Model>(&self, instance: &mut M) -> Result<()> {
        tracker::capture(&*self.mapping::<M>()?, instance);
        Ok(())
    }

    /// Registers a data binder instance shared by every connection. Replaces
    /// any binder already known under `name`.
    pub fn register_data_binder(&self, name: &str, binder: impl DataBinder) {
        self.forget_schemas(name);
        self.binders.register(name, Arc::new(binder));
    }

    /// Registers a factory creating one data binder instance per connection.
    pub fn register_data_binder_factory<B, F>(&self, name: &str, factory: F)
    where
        B: DataBinder,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.forget_schemas(name);
        self.binders.register_factory(
            name,
            Arc::new(move || Arc::new(factory()) as Arc<dyn DataBinder>),
        );
    }

    /// Forgets the binder known under `name`. Returns `false` if there was
    /// none.
    pub fn remove_data_binder(&self, name: &str) -> bool {
        self.forget_schemas(name);
        self.binders.remove(name)
    }

    /// Evicts the validated mapping of `M`. The next use validates it again.
    pub fn remove_mapping<M: Model>(&self) -> bool {
        let ty = TypeId::of::<M>();
        self.schema_validated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(validated, _, _)| *validated != ty);
        self.binders.forget(ty);
        self.mappings.remove(ty)
    }

    /// Number of data binder instances created for the connections seen so
    /// far.
    pub fn loaded_binder_count(&self) -> usize {
        self.binders.loaded_count()
    }

    /// Drops every cached binder instance, command template, validated
    /// mapping and record of validated schemas. Registered binders and
    /// factories stay registered; the next operation rebuilds what it needs.
    pub fn cleanup(&self) {
        self.binders.clear(self.models.keys().copied());
        self.mappings.clear();
        self.schema_validated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Schemas validated through the binder known under `name` must be
    /// validated again by whatever binder takes that name next.
    fn forget_schemas(&self, name: &str) {
        let name = binders::key(name);
        self.schema_validated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(_, _, binder)| *binder != name);
    }

    pub(crate) fn mapping<M: Model>(&self) -> Result<Arc<Mapping<M>>> {
        let bound_type = BoundType::of::<M>();
        if !self.models.contains_key(&bound_type.id) {
            return Err(Error::persistence(format!(
                "type [{bound_type}] is not mapped; register it with `Mapper::builder().register::<{bound_type}>()`"
            )));
        }

        self.mappings.get_or_build(|| {
            let (declaration, access) = M::declare().into_parts();
            let class = declaration.validate()?;
            self.check_relation_targets(&class)?;

            tracing::debug!(
                ty = %class.bound_type,
                storage = %class.storage_name(),
                binder = %class.binder_name,
                "validated mapping"
            );
            Ok(Mapping::new(class, access))
        })
    }

    /// Resolves the mapping and data binder for an operation on `M`,
    /// validating the schema on first use with this connection.
    pub(crate) fn resolve<M: Model>(
        &self,
        connection: &mut dyn Connection,
    ) -> Result<(Arc<Mapping<M>>, Arc<dyn DataBinder>)> {
        let mapping = self.mapping::<M>()?;

        if !connection.is_open() {
            return Err(Error::persistence(format!(
                "the connection to [{}] is not open",
                connection.connection_string()
            )));
        }

        let connection_string = connection.connection_string().into_owned();
        let binder = self
            .binders
            .get(&connection_string, &mapping.class.binder_name)?;

        if self.validate_schema {
            self.validate_schema_once(&mapping.class, &*binder, connection, connection_string)?;
        }

        Ok((mapping, binder))
    }

    fn validate_schema_once(
        &self,
        class: &ClassMapping,
        binder: &dyn DataBinder,
        connection: &mut dyn Connection,
        connection_string: String,
    ) -> Result<()> {
        let key = (
            class.bound_type.id,
            connection_string,
            binders::key(&class.binder_name),
        );

        let mut validated = self
            .schema_validated
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if validated.contains(&key) {
            return Ok(());
        }

        binder.validate_schema(class, connection)?;
        tracing::debug!(
            ty = %class.bound_type,
            connection = %key.1,
            "validated schema"
        );
        validated.insert(key);
        Ok(())
    }

    fn check_relation_targets(&self, class: &ClassMapping) -> Result<()> {
        for (index, relation) in class.relations() {
            if !self.models.contains_key(&relation.target.id) {
                return Err(Error::configuration(format!(
                    "invalid relation on property [{}] of type [{}]: the related type [{}] is not registered",
                    class.properties[index].property_name, class.bound_type, relation.target
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field(
                "models",
                &self
                    .models
                    .values()
                    .map(|registration| registration.bound_type)
                    .collect::<Vec<_>>(),
            )
            .field("validate_schema", &self.validate_schema)
            .field("default_cascade", &self.default_cascade)
            .finish()
    }
}

/// Adds the failed operation to an error, keeping its category.
fn failed<M: Model>(err: Error, op: &str) -> Error {
    let message = format!("unable to {op} instance of type [{}]", BoundType::of::<M>());
    if err.is_configuration() {
        err.context(Error::configuration(message))
    } else {
        err.context(Error::persistence(message))
    }
}
