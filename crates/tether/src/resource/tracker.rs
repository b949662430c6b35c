use tether_core::{Codec, Value};

use indexmap::IndexMap;

/// Mutation state of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// The value differs from the last server-synced value.
    pub dirty: bool,

    /// Value held before the last assignment; `None` if the field was unset.
    pub previous: Option<Value>,

    /// Value held now.
    pub current: Value,

    /// `current` encoded by the attribute's codec, computed at assignment.
    pub wire: serde_json::Value,
}

/// Per-resource record of attribute assignments.
#[derive(Debug, Clone, Default)]
pub struct FieldTracker {
    fields: IndexMap<String, FieldChange>,
}

impl FieldTracker {
    /// Records a caller assignment that changed the stored value.
    ///
    /// Resources without an id do not mark fields dirty, and neither does the
    /// first assignment of a field on a loaded resource (it is treated as
    /// hydration). Once dirty, a field stays dirty until
    /// [`clear_dirty`](Self::clear_dirty).
    pub fn record_assignment(
        &mut self,
        field: &str,
        codec: Codec,
        previous: Option<Value>,
        current: &Value,
        is_new: bool,
    ) {
        let changed = match &previous {
            Some(previous) => !is_new && previous != current,
            None => false,
        };

        let dirty = changed || self.is_dirty(field);

        self.fields.insert(
            field.to_string(),
            FieldChange {
                dirty,
                previous,
                current: current.clone(),
                wire: codec.encode(current),
            },
        );
    }

    /// Records a value loaded from the server. The field is clean afterwards.
    pub fn record_hydration(&mut self, field: &str, codec: Codec, current: &Value) {
        let previous = self.fields.get(field).map(|change| change.current.clone());

        self.fields.insert(
            field.to_string(),
            FieldChange {
                dirty: false,
                previous,
                current: current.clone(),
                wire: codec.encode(current),
            },
        );
    }

    /// Resets every dirty flag, leaving values untouched.
    pub fn clear_dirty(&mut self) {
        for change in self.fields.values_mut() {
            change.dirty = false;
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.fields.get(field)
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|change| change.dirty)
    }

    pub fn has_dirty(&self) -> bool {
        self.fields.values().any(|change| change.dirty)
    }

    /// Every tracked field, in first-assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldChange)> + '_ {
        self.fields
            .iter()
            .map(|(field, change)| (field.as_str(), change))
    }

    pub fn dirty(&self) -> impl Iterator<Item = (&str, &FieldChange)> + '_ {
        self.iter().filter(|(_, change)| change.dirty)
    }
}
