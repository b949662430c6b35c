use super::Decoder;
use crate::Resource;

use tether_core::{
    document::{Linkage, ResourceIdentifier, ResourceObject},
    schema::Cardinality,
};

impl<'a> Decoder<'a> {
    /// Links every declared relation of `owner` from the relationships of its
    /// raw resource.
    ///
    /// Relations missing from the payload, or present without `data`, are
    /// left untouched.
    pub(super) fn resolve(&mut self, owner: &Resource, raw: &ResourceObject) {
        let model = owner.model().clone();

        for field in model.relations() {
            let Some(linkage) = raw
                .relationship(field.name.wire_name())
                .and_then(|relationship| relationship.data.as_ref())
            else {
                continue;
            };

            let name = &field.name.app_name;
            let target = field.relation_target().unwrap_or_default();

            match (field.cardinality(), linkage) {
                (Some(Cardinality::One), Linkage::Null) => owner.link_one(name, None),
                (Some(Cardinality::One), Linkage::One(identifier)) => {
                    if !targets(identifier, target) {
                        skip_mismatch(owner, name, identifier, target);
                        continue;
                    }
                    let related = self.resolve_identifier(identifier);
                    owner.link_one(name, related);
                }
                (Some(Cardinality::Many), Linkage::Many(identifiers)) => {
                    let related = identifiers
                        .iter()
                        .filter(|identifier| {
                            let matches = targets(identifier, target);
                            if !matches {
                                skip_mismatch(owner, name, identifier, target);
                            }
                            matches
                        })
                        .filter_map(|identifier| self.resolve_identifier(identifier))
                        .collect();
                    owner.link_many(name, related);
                }
                (Some(Cardinality::Many), Linkage::Null) => owner.link_many(name, vec![]),
                _ => {
                    tracing::debug!(
                        resource_type = owner.resource_type(),
                        relation = %name,
                        "relationship linkage does not match declared cardinality; skipping"
                    );
                }
            }
        }
    }

    /// Finds or builds the instance a resource identifier points at.
    ///
    /// Lookup order: the identity store, the document's pool, and finally a
    /// stub. A stored instance is used as is, unless it is a stub and the pool
    /// carries its full representation, in which case the stub is upgraded in
    /// place. Identifiers without an id resolve to nothing.
    fn resolve_identifier(&mut self, identifier: &ResourceIdentifier) -> Option<Resource> {
        let Some(id) = identifier.id.as_deref() else {
            tracing::trace!(resource_type = %identifier.ty, "skipping identifier without id");
            return None;
        };

        let key = (identifier.ty.clone(), id.to_string());
        let raw = self.find_in_pool(&identifier.ty, id);

        if let Some(existing) = self.store.lookup(&identifier.ty, id) {
            match raw {
                Some(raw) if existing.is_stub() && !self.visited.contains(&key) => {
                    return Some(self.materialize(raw));
                }
                _ => return Some(existing),
            }
        }

        if let Some(raw) = raw {
            return Some(self.materialize(raw));
        }

        tracing::trace!(resource_type = %identifier.ty, id, "creating stub");
        let stub = Resource::stub(self.model(&identifier.ty), id);
        self.store.upsert(&stub);
        Some(stub)
    }

    fn find_in_pool(&self, resource_type: &str, id: &str) -> Option<&'a ResourceObject> {
        self.pool
            .iter()
            .find(|raw| raw.key() == Some((resource_type, id)))
            .copied()
    }
}

fn targets(identifier: &ResourceIdentifier, target: &str) -> bool {
    identifier.ty == target
}

fn skip_mismatch(owner: &Resource, relation: &str, identifier: &ResourceIdentifier, target: &str) {
    tracing::debug!(
        resource_type = owner.resource_type(),
        relation,
        expected = target,
        received = %identifier.ty,
        "relationship identifier has the wrong type; skipping"
    );
}
