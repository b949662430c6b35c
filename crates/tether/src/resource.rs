mod tracker;
pub use tracker::{FieldChange, FieldTracker};

use tether_core::{
    schema::{self, FieldTy},
    Value,
};

use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};
use std::{fmt, sync::Arc};

/// A model instance: one resource of a given type.
///
/// `Resource` is a cheap, shared handle. Clones point at the same instance,
/// which is what the identity store hands out and what relationships link
/// to. Its resource type never changes; its id is assigned at most once.
#[derive(Clone)]
pub struct Resource {
    shared: Arc<Shared>,
}

struct Shared {
    model: Arc<schema::Model>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    id: Option<String>,

    /// Attribute values keyed by field name.
    attributes: IndexMap<String, Value>,

    /// Relationship values keyed by field name. A missing entry means the
    /// relationship was never loaded nor assigned.
    links: IndexMap<String, Link>,

    tracker: FieldTracker,

    /// Only type and id are known.
    stub: bool,
}

/// Value of a relationship field.
#[derive(Clone)]
pub enum Link {
    One(Option<Resource>),
    Many(Vec<Resource>),
}

impl Resource {
    /// A new, unsaved resource.
    pub(crate) fn new(model: Arc<schema::Model>) -> Resource {
        Resource::from_state(model, State::default())
    }

    /// A resource known by type and id only.
    pub(crate) fn stub(model: Arc<schema::Model>, id: &str) -> Resource {
        Resource::from_state(
            model,
            State {
                id: Some(id.to_string()),
                stub: true,
                ..State::default()
            },
        )
    }

    /// A resource about to be hydrated from server data.
    pub(crate) fn loaded(model: Arc<schema::Model>, id: &str) -> Resource {
        Resource::from_state(
            model,
            State {
                id: Some(id.to_string()),
                ..State::default()
            },
        )
    }

    fn from_state(model: Arc<schema::Model>, state: State) -> Resource {
        Resource {
            shared: Arc::new(Shared {
                model,
                state: Mutex::new(state),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.shared.state.lock()
    }

    pub fn resource_type(&self) -> &str {
        &self.shared.model.resource_type
    }

    /// The schema of this resource's type.
    pub fn model(&self) -> &Arc<schema::Model> {
        &self.shared.model
    }

    pub fn id(&self) -> Option<String> {
        self.state().id.clone()
    }

    /// Returns `true` until the server assigns an id.
    pub fn is_new(&self) -> bool {
        self.state().id.is_none()
    }

    /// Returns `true` for a placeholder created for a reference whose data was
    /// not part of any response.
    pub fn is_stub(&self) -> bool {
        self.state().stub
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Resource) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Same instance, or same `(type, id)`.
    pub(crate) fn same_identity(&self, other: &Resource) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        if self.resource_type() != other.resource_type() {
            return false;
        }

        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.state().attributes.get(name).cloned()
    }

    /// Assigns an attribute.
    ///
    /// Nothing is recorded when the value equals the one already stored.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not an attribute declared on this resource's type.
    #[track_caller]
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let codec = match self.model().field_by_name(name).and_then(|f| f.codec()) {
            Some(codec) => codec,
            None => panic!(
                "`{}` has no attribute named `{name}`",
                self.resource_type()
            ),
        };

        let value = codec.normalize(value.into());

        let mut state = self.state();
        let previous = state.attributes.get(name).cloned();

        if previous.as_ref() == Some(&value) {
            return;
        }

        let is_new = state.id.is_none();
        state
            .tracker
            .record_assignment(name, codec, previous, &value, is_new);
        state.attributes.insert(name.to_string(), value);
    }

    /// The relationship value, or `None` if it was never loaded or assigned.
    pub fn link(&self, name: &str) -> Option<Link> {
        self.state().links.get(name).cloned()
    }

    /// Assigns a to-one relationship. `None` unlinks it.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a to-one relation of this resource's type, or
    /// if `related` is not of the relation's target type.
    #[track_caller]
    pub fn set_one(&self, name: &str, related: Option<&Resource>) {
        match self.model().field_by_name(name).map(|f| &f.ty) {
            Some(FieldTy::BelongsTo(belongs_to)) => {
                if let Some(related) = related {
                    assert_eq!(
                        related.resource_type(),
                        belongs_to.target,
                        "`{}.{name}` cannot hold a `{}`",
                        self.resource_type(),
                        related.resource_type()
                    );
                }
            }
            _ => panic!(
                "`{}` has no to-one relation named `{name}`",
                self.resource_type()
            ),
        }

        self.link_one(name, related.cloned());
    }

    /// Assigns a to-many relationship. An empty list clears it.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a to-many relation of this resource's type, or
    /// if a member is not of the relation's target type.
    #[track_caller]
    pub fn set_many(&self, name: &str, related: impl IntoIterator<Item = Resource>) {
        let related = related.into_iter().collect::<Vec<_>>();

        match self.model().field_by_name(name).map(|f| &f.ty) {
            Some(FieldTy::HasMany(has_many)) => {
                for member in &related {
                    assert_eq!(
                        member.resource_type(),
                        has_many.target,
                        "`{}.{name}` cannot hold a `{}`",
                        self.resource_type(),
                        member.resource_type()
                    );
                }
            }
            _ => panic!(
                "`{}` has no to-many relation named `{name}`",
                self.resource_type()
            ),
        }

        self.link_many(name, related);
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.state().tracker.is_dirty(name)
    }

    pub fn has_dirty_attributes(&self) -> bool {
        self.state().tracker.has_dirty()
    }

    /// Snapshot of the mutation state of every tracked attribute.
    pub fn changes(&self) -> Vec<(String, FieldChange)> {
        self.state()
            .tracker
            .iter()
            .map(|(field, change)| (field.to_string(), change.clone()))
            .collect()
    }

    /// Marks every attribute clean. Called once a save has been reconciled.
    pub fn clear_dirty(&self) {
        self.state().tracker.clear_dirty();
    }

    /// Attributes that a request should carry, keyed by wire name: every
    /// assigned attribute while the resource is new, only the dirty ones
    /// afterwards.
    pub(crate) fn pending_attributes(&self) -> IndexMap<String, serde_json::Value> {
        let state = self.state();
        let is_new = state.id.is_none();

        state
            .tracker
            .iter()
            .filter(|(_, change)| is_new || change.dirty)
            .map(|(field, change)| {
                let wire_name = self
                    .model()
                    .field_by_name(field)
                    .map(|f| f.name.wire_name())
                    .unwrap_or(field);
                (wire_name.to_string(), change.wire.clone())
            })
            .collect()
    }

    /// Loads server attributes, keyed by wire name, into the resource. Fields
    /// touched this way are clean. Dirty fields keep the caller's value and
    /// undeclared attributes are ignored.
    pub(crate) fn hydrate(&self, attributes: &IndexMap<String, serde_json::Value>) {
        let mut state = self.state();
        state.stub = false;

        for (wire_name, wire) in attributes {
            let Some(field) = self.model().field_by_wire_name(wire_name) else {
                continue;
            };
            let Some(codec) = field.codec() else {
                continue;
            };

            if state.tracker.is_dirty(&field.name.app_name) {
                tracing::trace!(
                    resource_type = self.resource_type(),
                    field = %field.name.app_name,
                    "keeping unsaved value over server data"
                );
                continue;
            }

            let value = codec.decode(wire);
            state
                .tracker
                .record_hydration(&field.name.app_name, codec, &value);
            state.attributes.insert(field.name.app_name.clone(), value);
        }
    }

    /// Assigns the server id. An id, once set, is never replaced.
    pub(crate) fn assign_id(&self, id: &str) {
        let mut state = self.state();
        match &state.id {
            None => state.id = Some(id.to_string()),
            Some(existing) if existing != id => {
                tracing::warn!(
                    resource_type = self.resource_type(),
                    existing = %existing,
                    received = %id,
                    "ignoring id change for an already identified resource"
                );
            }
            Some(_) => {}
        }
    }

    pub(crate) fn link_one(&self, name: &str, related: Option<Resource>) {
        self.state()
            .links
            .insert(name.to_string(), Link::One(related));
    }

    pub(crate) fn link_many(&self, name: &str, related: Vec<Resource>) {
        self.state()
            .links
            .insert(name.to_string(), Link::Many(related));
    }

    /// Adds `member` to a to-many relationship, replacing an entry with the
    /// same identity.
    pub(crate) fn upsert_member(&self, name: &str, member: &Resource) {
        let mut members = match self.link(name) {
            Some(Link::Many(members)) => members,
            _ => vec![],
        };

        match members.iter().position(|m| m.same_identity(member)) {
            Some(index) => members[index] = member.clone(),
            None => members.push(member.clone()),
        }

        self.link_many(name, members);
    }

    /// Points every link at `old` to `new` instead.
    pub(crate) fn replace_link_target(&self, old: &Resource, new: &Resource) {
        for link in self.state().links.values_mut() {
            match link {
                Link::One(Some(related)) if related.ptr_eq(old) => *related = new.clone(),
                Link::One(_) => {}
                Link::Many(members) => {
                    for member in members.iter_mut().filter(|m| m.ptr_eq(old)) {
                        *member = new.clone();
                    }
                }
            }
        }
    }
}

impl Link {
    pub fn as_one(&self) -> Option<Option<&Resource>> {
        match self {
            Link::One(related) => Some(related.as_ref()),
            Link::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Resource]> {
        match self {
            Link::Many(related) => Some(related),
            Link::One(_) => None,
        }
    }
}

struct Reference<'a>(&'a Resource);

impl fmt::Debug for Reference<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.id() {
            Some(id) => write!(fmt, "{}/{id}", self.0.resource_type()),
            None => write!(fmt, "{}/<new>", self.0.resource_type()),
        }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::One(Some(related)) => Reference(related).fmt(fmt),
            Link::One(None) => fmt.write_str("null"),
            Link::Many(related) => fmt.debug_list().entries(related.iter().map(Reference)).finish(),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Related resources are printed as references so cycles terminate.
        // The lock is released first: a resource may link to itself.
        let (id, stub, attributes, links) = {
            let state = self.state();
            (
                state.id.clone(),
                state.stub,
                state.attributes.clone(),
                state.links.clone(),
            )
        };

        fmt.debug_struct("Resource")
            .field("type", &self.resource_type())
            .field("id", &id)
            .field("stub", &stub)
            .field("attributes", &attributes)
            .field("links", &links)
            .finish()
    }
}
