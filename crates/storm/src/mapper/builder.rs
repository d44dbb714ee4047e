use super::{binders::key, Binders, Factory, Mapper, MappingCache, Registration};
use crate::{binder::DataBinder, Model, Result};

use indexmap::IndexMap;
use std::{
    any::TypeId,
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};
use storm_core::mapping::BoundType;

pub struct Builder {
    /// Types the mapper may load and persist.
    models: IndexMap<TypeId, Registration>,

    factories: IndexMap<String, Factory>,

    binders: HashMap<String, Arc<dyn DataBinder>>,

    validate_schema: bool,

    default_cascade: bool,
}

impl Builder {
    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.models.insert(
            TypeId::of::<M>(),
            Registration {
                bound_type: BoundType::of::<M>(),
                validate: |mapper| mapper.validate::<M>(),
            },
        );
        self
    }

    /// Registers a data binder instance under `name`. The instance is shared
    /// by every connection.
    pub fn register_data_binder(&mut self, name: &str, binder: impl DataBinder) -> &mut Self {
        self.binders.insert(key(name), Arc::new(binder));
        self
    }

    /// Registers a factory creating one data binder instance per connection.
    pub fn register_data_binder_factory<B, F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        B: DataBinder,
        F: Fn() -> B + Send + Sync + 'static,
    {
        self.factories.insert(
            key(name),
            Arc::new(move || Arc::new(factory()) as Arc<dyn DataBinder>),
        );
        self
    }

    /// Check each mapping against the live schema the first time it is used
    /// with a connection. Enabled by default.
    pub fn validate_schema(&mut self, enabled: bool) -> &mut Self {
        self.validate_schema = enabled;
        self
    }

    /// Whether `load`, `batch_load`, `persist` and `delete` cascade through
    /// relation properties. Enabled by default.
    pub fn default_cascade(&mut self, enabled: bool) -> &mut Self {
        self.default_cascade = enabled;
        self
    }

    /// Builds the mapper, validating the mapping of every registered type.
    pub fn build(&mut self) -> Result<Mapper> {
        let mapper = Mapper {
            models: std::mem::take(&mut self.models),
            mappings: MappingCache::default(),
            binders: Binders::new(
                std::mem::replace(&mut self.factories, Binders::builtin()),
                std::mem::take(&mut self.binders),
            ),
            schema_validated: Mutex::new(HashSet::new()),
            validate_schema: self.validate_schema,
            default_cascade: self.default_cascade,
        };

        for registration in mapper.models.values() {
            (registration.validate)(&mapper)?;
        }

        Ok(mapper)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            models: IndexMap::new(),
            factories: Binders::builtin(),
            binders: HashMap::new(),
            validate_schema: true,
            default_cascade: true,
        }
    }
}
