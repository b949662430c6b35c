use crate::Resource;

use indexmap::IndexMap;
use parking_lot::Mutex;

/// Canonical instance per `(type, id)`.
///
/// Each datastore owns one store. There is no eviction: entries live as long
/// as the datastore. Inserting a second instance for a key replaces the first.
#[derive(Debug, Default)]
pub struct IdentityStore {
    types: Mutex<IndexMap<String, IndexMap<String, Resource>>>,
}

impl IdentityStore {
    pub fn new() -> IdentityStore {
        IdentityStore::default()
    }

    /// Inserts or replaces the instance stored for the resource's key.
    /// Resources without an id are not stored.
    pub fn upsert(&self, resource: &Resource) {
        let Some(id) = resource.id() else {
            return;
        };

        tracing::trace!(resource_type = resource.resource_type(), %id, "identity store upsert");

        self.types
            .lock()
            .entry(resource.resource_type().to_string())
            .or_default()
            .insert(id, resource.clone());
    }

    pub fn lookup(&self, resource_type: &str, id: &str) -> Option<Resource> {
        self.types.lock().get(resource_type)?.get(id).cloned()
    }

    /// Every stored instance of a type, in insertion order.
    pub fn lookup_all(&self, resource_type: &str) -> Vec<Resource> {
        self.types
            .lock()
            .get(resource_type)
            .map(|by_id| by_id.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every stored instance, across types.
    pub(crate) fn resources(&self) -> Vec<Resource> {
        self.types
            .lock()
            .values()
            .flat_map(|by_id| by_id.values().cloned())
            .collect()
    }

    /// Total number of stored instances.
    pub fn len(&self) -> usize {
        self.types.lock().values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.types.lock().clear();
    }
}
