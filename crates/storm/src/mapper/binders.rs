use crate::{binder::DataBinder, Error, ProcedureBinder, Result, SqlBinder};

use indexmap::IndexMap;
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

/// Creates data binder instances.
pub type Factory = Arc<dyn Fn() -> Arc<dyn DataBinder> + Send + Sync>;

/// Data binders known to a mapper.
///
/// A binder is resolved by name, first among registered instances, then
/// among factories. The resolved instance is cached per connection string,
/// so its command cache is shared by every operation on that database.
pub(crate) struct Binders {
    factories: RwLock<IndexMap<String, Factory>>,

    /// Instances registered up front. Shared by every connection.
    registered: RwLock<HashMap<String, Arc<dyn DataBinder>>>,

    /// Instances in use, by (connection string, binder name).
    loaded: Mutex<HashMap<(String, String), Arc<dyn DataBinder>>>,
}

impl Binders {
    pub(crate) fn new(
        factories: IndexMap<String, Factory>,
        registered: HashMap<String, Arc<dyn DataBinder>>,
    ) -> Binders {
        Binders {
            factories: RwLock::new(factories),
            registered: RwLock::new(registered),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// The built-in binders: `"sql"` and `"procedure"`.
    pub(crate) fn builtin() -> IndexMap<String, Factory> {
        let mut factories: IndexMap<String, Factory> = IndexMap::new();
        factories.insert(
            key("sql"),
            Arc::new(|| Arc::new(SqlBinder::new()) as Arc<dyn DataBinder>),
        );
        factories.insert(
            key("procedure"),
            Arc::new(|| Arc::new(ProcedureBinder::new()) as Arc<dyn DataBinder>),
        );
        factories
    }

    pub(crate) fn get(&self, connection_string: &str, name: &str) -> Result<Arc<dyn DataBinder>> {
        let name = key(name);
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);

        let cache_key = (connection_string.to_string(), name);
        if let Some(binder) = loaded.get(&cache_key) {
            return Ok(binder.clone());
        }

        let binder = self.create(&cache_key.1)?;
        tracing::debug!(
            binder = %cache_key.1,
            connection = %cache_key.0,
            "loaded data binder"
        );
        loaded.insert(cache_key, binder.clone());
        Ok(binder)
    }

    fn create(&self, name: &str) -> Result<Arc<dyn DataBinder>> {
        if let Some(binder) = self
            .registered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(binder.clone());
        }

        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        match factories.get(name) {
            Some(factory) => Ok(factory()),
            None => Err(Error::configuration(format!(
                "no data binder is registered under the name [{name}]; registered={:?}",
                factories.keys().collect::<Vec<_>>()
            ))),
        }
    }

    pub(crate) fn register(&self, name: &str, binder: Arc<dyn DataBinder>) {
        let name = key(name);
        self.evict(&name);
        self.registered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, binder);
    }

    pub(crate) fn register_factory(&self, name: &str, factory: Factory) {
        let name = key(name);
        self.evict(&name);
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, factory);
    }

    /// Forgets the binder registered under `name`, along with every
    /// instance created for it.
    pub(crate) fn remove(&self, name: &str) -> bool {
        let name = key(name);
        self.evict(&name);

        let registered = self
            .registered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name)
            .is_some();
        let factory = self
            .factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(&name)
            .is_some();

        registered || factory
    }

    /// Drops the cached commands of `ty` from every loaded or registered
    /// binder.
    pub(crate) fn forget(&self, ty: TypeId) {
        for binder in self
            .loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            binder.forget(ty);
        }

        for binder in self
            .registered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            binder.forget(ty);
        }
    }

    pub(crate) fn loaded_count(&self) -> usize {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every loaded instance, and the cached commands of `types` held
    /// by registered instances.
    pub(crate) fn clear(&self, types: impl IntoIterator<Item = TypeId>) {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        let registered = self.registered.read().unwrap_or_else(PoisonError::into_inner);
        for ty in types {
            for binder in registered.values() {
                binder.forget(ty);
            }
        }
    }

    fn evict(&self, name: &str) {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(_, loaded), _| loaded != name);
    }
}

/// Binder names compare case-insensitively.
pub(crate) fn key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
