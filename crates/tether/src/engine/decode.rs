use crate::{IdentityStore, Resource};

use tether_core::{
    document::{PrimaryData, ResourceObject},
    schema, Document, Error, Result, Schema,
};

use std::{collections::HashSet, sync::Arc};

/// Decodes one document into resources.
///
/// A decoder lives for a single response. It owns the candidate pool
/// (primary resources followed by included ones) and remembers which
/// resources it has already materialized, so each `(type, id)` is hydrated
/// and resolved at most once per document.
pub(crate) struct Decoder<'a> {
    pub(super) schema: &'a Schema,
    pub(super) store: &'a IdentityStore,
    document: &'a Document,
    pub(super) pool: Vec<&'a ResourceObject>,
    pub(super) visited: HashSet<(String, String)>,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        store: &'a IdentityStore,
        document: &'a Document,
    ) -> Decoder<'a> {
        tracing::debug!(
            primary = document.primary().len(),
            included = document.included().len(),
            "decoding document"
        );

        Decoder {
            schema,
            store,
            document,
            pool: document.pool().collect(),
            visited: HashSet::new(),
        }
    }

    /// Decodes every primary resource, in wire order.
    pub(crate) fn decode_collection(&mut self) -> Vec<Resource> {
        let document = self.document;
        document
            .primary()
            .iter()
            .map(|raw| self.materialize(raw))
            .collect()
    }

    /// Decodes the single primary resource of the document.
    pub(crate) fn decode_single(&mut self) -> Result<Resource> {
        let raw = self.single_primary()?;
        Ok(self.materialize(raw))
    }

    /// Applies a save response to the instance that was saved.
    ///
    /// The instance takes the server id (if it had none), the returned
    /// attributes and relationships, and becomes the canonical instance for
    /// its key. Links held by stored resources that pointed at a previous
    /// instance for that key are moved over to it.
    pub(crate) fn reconcile(&mut self, resource: &Resource) -> Result<()> {
        let raw = self.single_primary()?;

        if let Some(id) = raw.id.as_deref() {
            resource.assign_id(id);
        }

        if let Some(id) = resource.id() {
            let resource_type = resource.resource_type();

            if let Some(previous) = self.store.lookup(resource_type, &id) {
                if !previous.ptr_eq(resource) {
                    tracing::trace!(resource_type, %id, "replacing stored instance with saved one");
                    for holder in self.store.resources() {
                        holder.replace_link_target(&previous, resource);
                    }
                }
            }

            self.visited.insert((resource_type.to_string(), id));
        }

        resource.clear_dirty();
        resource.hydrate(&raw.attributes);
        self.store.upsert(resource);
        self.resolve(resource, raw);

        Ok(())
    }

    fn single_primary(&self) -> Result<&'a ResourceObject> {
        match &self.document.data {
            Some(PrimaryData::One(raw)) => Ok(raw),
            Some(PrimaryData::Many(_)) => Err(Error::malformed_response(
                "expected a single resource, found a collection",
            )),
            None => Err(Error::malformed_response("expected data in response")),
        }
    }

    /// Builds (or refreshes) the instance for a raw resource, registers it in
    /// the identity store and resolves its relationships.
    ///
    /// Registration happens before resolution so that a cycle leading back to
    /// this resource finds it instead of recursing.
    pub(super) fn materialize(&mut self, raw: &ResourceObject) -> Resource {
        let resource = match raw.id.as_deref() {
            Some(id) => {
                self.visited.insert((raw.ty.clone(), id.to_string()));

                match self.store.lookup(&raw.ty, id) {
                    Some(existing) => existing,
                    None => Resource::loaded(self.model(&raw.ty), id),
                }
            }
            None => Resource::new(self.model(&raw.ty)),
        };

        resource.hydrate(&raw.attributes);
        self.store.upsert(&resource);
        self.resolve(&resource, raw);

        resource
    }

    /// Schema of a resource type. Types the datastore does not know get an
    /// empty schema: their instances carry type and id only.
    pub(super) fn model(&self, resource_type: &str) -> Arc<schema::Model> {
        match self.schema.model(resource_type) {
            Some(model) => model.clone(),
            None => {
                tracing::debug!(resource_type, "resource type not registered; keeping type and id only");
                Arc::new(schema::Model::new(resource_type))
            }
        }
    }
}
