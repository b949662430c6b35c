use crate::{Link, Model, Resource};

use std::fmt;

/// Typed value of a to-one relation.
pub struct BelongsTo<T> {
    /// `None` when not loaded, `Some(None)` when explicitly empty.
    value: Option<Option<T>>,
}

impl<T: Model> BelongsTo<T> {
    pub fn load(owner: &Resource, name: &str) -> Self {
        match owner.link(name) {
            Some(Link::One(related)) => Self {
                value: Some(related.map(T::from_resource)),
            },
            _ => Self::default(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }

    #[track_caller]
    pub fn get(&self) -> Option<&T> {
        self.value
            .as_ref()
            .expect("association not loaded")
            .as_ref()
    }

    pub fn into_inner(self) -> Option<Option<T>> {
        self.value
    }
}

impl<T> Default for BelongsTo<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T: fmt::Debug> fmt::Debug for BelongsTo<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.as_ref() {
            Some(Some(t)) => t.fmt(fmt),
            Some(None) => write!(fmt, "None"),
            None => write!(fmt, "<not loaded>"),
        }
    }
}
