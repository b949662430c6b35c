use crate::{Link, Resource};

use tether_core::{
    document::{Linkage, Relationship, ResourceIdentifier, ResourceObject},
    schema::FieldTy,
    Document, Schema,
};

use indexmap::IndexMap;

/// Builds the request document for saving `resource`.
///
/// Attributes are the pending ones (see [`Resource::pending_attributes`]).
/// Relationships are emitted in three passes: to-one relations holding an
/// instance, non-empty to-many relations, then relations that were
/// explicitly cleared. Relations that were never loaded nor assigned are
/// omitted.
pub(crate) fn build_request_body(resource: &Resource) -> Document {
    let mut body = ResourceObject::new(resource.resource_type());
    body.id = resource.id();
    body.attributes = resource.pending_attributes();

    let relationships = relationships(resource);
    if !relationships.is_empty() {
        body.relationships = Some(relationships);
    }

    tracing::trace!(
        resource_type = resource.resource_type(),
        attributes = body.attributes.len(),
        relationships = body.relationships.as_ref().map_or(0, |r| r.len()),
        "built request body"
    );

    Document::single(body)
}

fn relationships(resource: &Resource) -> IndexMap<String, Relationship> {
    let model = resource.model().clone();
    let mut out = IndexMap::new();

    for field in model.relations() {
        if let (FieldTy::BelongsTo(_), Some(Link::One(Some(related)))) =
            (&field.ty, resource.link(&field.name.app_name))
        {
            out.insert(
                field.name.wire_name().to_string(),
                Relationship::new(Linkage::One(identifier(&related))),
            );
        }
    }

    for field in model.relations() {
        if let (FieldTy::HasMany(_), Some(Link::Many(members))) =
            (&field.ty, resource.link(&field.name.app_name))
        {
            if members.is_empty() {
                continue;
            }

            let identifiers = members
                .iter()
                .filter_map(|member| {
                    let id = member.id()?;
                    Some(ResourceIdentifier::new(member.resource_type(), id))
                })
                .collect();

            out.insert(
                field.name.wire_name().to_string(),
                Relationship::new(Linkage::Many(identifiers)),
            );
        }
    }

    for field in model.relations() {
        let cleared = match (&field.ty, resource.link(&field.name.app_name)) {
            (FieldTy::BelongsTo(_), Some(Link::One(None))) => Linkage::Null,
            (FieldTy::HasMany(_), Some(Link::Many(members))) if members.is_empty() => {
                Linkage::Many(vec![])
            }
            _ => continue,
        };

        out.insert(field.name.wire_name().to_string(), Relationship::new(cleared));
    }

    out
}

/// Reference to a related resource. Unsaved resources are embedded with
/// their pending attributes so the server can create them alongside.
fn identifier(related: &Resource) -> ResourceIdentifier {
    match related.id() {
        Some(id) => ResourceIdentifier::new(related.resource_type(), id),
        None => ResourceIdentifier::pending(related.resource_type(), related.pending_attributes()),
    }
}

/// After a save, adds `resource` to the inverse to-many relation of every
/// instance its to-one relations point at.
pub(crate) fn backfill_inverse(schema: &Schema, resource: &Resource) {
    let model = resource.model().clone();

    for field in model.relations() {
        let FieldTy::BelongsTo(_) = &field.ty else {
            continue;
        };
        let Some(Link::One(Some(related))) = resource.link(&field.name.app_name) else {
            continue;
        };
        let Some(inverse) = schema.inverse_has_many(related.resource_type(), resource.resource_type())
        else {
            continue;
        };

        tracing::trace!(
            resource_type = related.resource_type(),
            relation = %inverse.name.app_name,
            "back-filling inverse relation"
        );
        related.upsert_member(&inverse.name.app_name, resource);
    }
}
