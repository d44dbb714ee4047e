use super::declaration::relation_target;
use crate::{mapper::Cascade, Model, Result};

use std::sync::Arc;
use storm_core::{
    mapping::{Cardinality, RelationMapping, RelationTarget},
    stmt::Value,
};

/// Loads, persists and deletes the instances held by one relation property
/// of `M`.
pub(crate) trait RelationAccess<M>: Send + Sync {
    fn target(&self) -> RelationTarget;

    /// Replaces the property's contents with the instances joined to `join`.
    /// A null join value empties the property.
    fn load(
        &self,
        owner: &mut M,
        join: Value,
        relation: &RelationMapping,
        cx: &mut Cascade<'_>,
    ) -> Result<()>;

    fn persist(&self, owner: &M, cx: &mut Cascade<'_>) -> Result<()>;

    fn delete(&self, owner: &M, cx: &mut Cascade<'_>) -> Result<()>;
}

/// A property holding at most one related instance.
pub(crate) struct HasOne<M, R> {
    get: fn(&M) -> &Option<Arc<R>>,
    get_mut: fn(&mut M) -> &mut Option<Arc<R>>,
}

/// A property holding a list of related instances.
pub(crate) struct HasMany<M, R> {
    get: fn(&M) -> &Vec<Arc<R>>,
    get_mut: fn(&mut M) -> &mut Vec<Arc<R>>,
}

impl<M, R> HasOne<M, R> {
    pub(crate) fn new(
        get: fn(&M) -> &Option<Arc<R>>,
        get_mut: fn(&mut M) -> &mut Option<Arc<R>>,
    ) -> Self {
        HasOne { get, get_mut }
    }
}

impl<M: Model, R: Model> RelationAccess<M> for HasOne<M, R> {
    fn target(&self) -> RelationTarget {
        relation_target::<R>(Cardinality::One)
    }

    fn load(
        &self,
        owner: &mut M,
        join: Value,
        relation: &RelationMapping,
        cx: &mut Cascade<'_>,
    ) -> Result<()> {
        let related = if join.is_null() {
            None
        } else {
            cx.load_one::<R>(relation.resolved_related.index, join)?
        };

        *(self.get_mut)(owner) = related;
        Ok(())
    }

    fn persist(&self, owner: &M, cx: &mut Cascade<'_>) -> Result<()> {
        match (self.get)(owner) {
            Some(related) => cx.persist_related(related),
            None => Ok(()),
        }
    }

    fn delete(&self, owner: &M, cx: &mut Cascade<'_>) -> Result<()> {
        match (self.get)(owner) {
            Some(related) => cx.delete_related(related),
            None => Ok(()),
        }
    }
}

impl<M, R> HasMany<M, R> {
    pub(crate) fn new(get: fn(&M) -> &Vec<Arc<R>>, get_mut: fn(&mut M) -> &mut Vec<Arc<R>>) -> Self {
        HasMany { get, get_mut }
    }
}

impl<M: Model, R: Model> RelationAccess<M> for HasMany<M, R> {
    fn target(&self) -> RelationTarget {
        relation_target::<R>(Cardinality::Many)
    }

    fn load(
        &self,
        owner: &mut M,
        join: Value,
        relation: &RelationMapping,
        cx: &mut Cascade<'_>,
    ) -> Result<()> {
        let related = if join.is_null() {
            vec![]
        } else {
            cx.load_many::<R>(relation.resolved_related.index, join)?
        };

        *(self.get_mut)(owner) = related;
        Ok(())
    }

    fn persist(&self, owner: &M, cx: &mut Cascade<'_>) -> Result<()> {
        for related in (self.get)(owner) {
            cx.persist_related(related)?;
        }
        Ok(())
    }

    fn delete(&self, owner: &M, cx: &mut Cascade<'_>) -> Result<()> {
        for related in (self.get)(owner) {
            cx.delete_related(related)?;
        }
        Ok(())
    }
}
