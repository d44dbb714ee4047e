//! Change tracking.
//!
//! A model opts in by embedding a [`Snapshot`] and returning it from
//! [`Model::snapshot`](crate::Model::snapshot) and
//! [`Model::snapshot_mut`](crate::Model::snapshot_mut). The mapper captures
//! the mapped property values after every load and after a successful
//! [`persist_if_changed`](crate::Mapper::persist_if_changed).

use crate::{mapper::Mapping, mapping::PersistenceEvents, Model};

use storm_core::stmt::Value;

/// Mapped property values of an instance at the time it was last loaded or
/// saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// `(property index, value)` pairs, or `None` before the first capture.
    values: Option<Vec<(usize, Value)>>,
}

impl Snapshot {
    pub fn new() -> Snapshot {
        Snapshot::default()
    }

    /// Returns `true` once values have been captured.
    pub fn is_captured(&self) -> bool {
        self.values.is_some()
    }

    /// Forgets the captured values. The instance then reports changes until
    /// the next capture.
    pub fn clear(&mut self) {
        self.values = None;
    }
}

/// Records the current values of `instance` in its snapshot.
///
/// Types that can neither be inserted nor updated are never captured.
pub(crate) fn capture<M: Model>(mapping: &Mapping<M>, instance: &mut M) {
    let class = &mapping.class;
    if class.suppresses(PersistenceEvents::INSERT) && class.suppresses(PersistenceEvents::UPDATE) {
        return;
    }

    let values = tracked_values(mapping, instance);
    if let Some(snapshot) = instance.snapshot_mut() {
        snapshot.values = Some(values);
    }
}

/// Returns `true` unless `instance` carries a snapshot whose values all
/// match the current ones.
pub(crate) fn has_changes<M: Model>(mapping: &Mapping<M>, instance: &M) -> bool {
    let Some(captured) = instance.snapshot().and_then(|snapshot| snapshot.values.as_ref()) else {
        return true;
    };

    *captured != tracked_values(mapping, instance)
}

fn tracked_values<M: Model>(mapping: &Mapping<M>, instance: &M) -> Vec<(usize, Value)> {
    let mut values: Vec<(usize, Value)> = vec![];

    for property in &mapping.class.properties {
        if property.is_relation() {
            continue;
        }

        let index = property.property_index;
        if values.iter().any(|(seen, _)| *seen == index) {
            continue;
        }

        values.push((index, mapping.get(instance, index)));
    }

    values
}
