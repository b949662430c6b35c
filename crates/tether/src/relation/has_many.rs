use crate::{Link, Model, Resource};

use std::fmt;

/// Typed members of a to-many relation.
pub struct HasMany<T> {
    values: Option<Vec<T>>,
}

impl<T: Model> HasMany<T> {
    pub fn load(owner: &Resource, name: &str) -> Self {
        match owner.link(name) {
            Some(Link::Many(members)) => Self {
                values: Some(members.into_iter().map(T::from_resource).collect()),
            },
            _ => Self::default(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.values.is_some()
    }

    #[track_caller]
    pub fn get(&self) -> &[T] {
        self.values
            .as_ref()
            .expect("association not loaded")
            .as_slice()
    }

    pub fn into_inner(self) -> Option<Vec<T>> {
        self.values
    }
}

impl<T> Default for HasMany<T> {
    fn default() -> Self {
        Self { values: None }
    }
}

impl<T: fmt::Debug> fmt::Debug for HasMany<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.values.as_ref() {
            Some(values) => fmt.debug_list().entries(values).finish(),
            None => write!(fmt, "<not loaded>"),
        }
    }
}
