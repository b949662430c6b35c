use crate::Result;

use serde::de::DeserializeOwned;

/// Models returned by a collection fetch, with the document's top-level
/// `meta` and `links`.
#[derive(Debug)]
pub struct QueryData<M> {
    models: Vec<M>,
    meta: Option<serde_json::Value>,
    links: Option<serde_json::Value>,
}

impl<M> QueryData<M> {
    pub(crate) fn new(
        models: Vec<M>,
        meta: Option<serde_json::Value>,
        links: Option<serde_json::Value>,
    ) -> QueryData<M> {
        QueryData {
            models,
            meta,
            links,
        }
    }

    pub fn models(&self) -> &[M] {
        &self.models
    }

    pub fn into_models(self) -> Vec<M> {
        self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.models.iter()
    }

    pub fn meta(&self) -> Option<&serde_json::Value> {
        self.meta.as_ref()
    }

    pub fn links(&self) -> Option<&serde_json::Value> {
        self.links.as_ref()
    }

    /// Deserializes `meta` into a caller-defined summary type.
    pub fn meta_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.meta {
            Some(meta) => Ok(Some(T::deserialize(meta)?)),
            None => Ok(None),
        }
    }
}

impl<M> IntoIterator for QueryData<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}

impl<'a, M> IntoIterator for &'a QueryData<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}
