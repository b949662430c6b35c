use super::Relationship;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A resource object as found in `data` or `included`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<IndexMap<String, Relationship>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ResourceObject {
    pub fn new(ty: impl Into<String>) -> ResourceObject {
        ResourceObject {
            ty: ty.into(),
            id: None,
            attributes: IndexMap::new(),
            relationships: None,
            links: None,
            meta: None,
        }
    }

    /// The `(type, id)` pair identifying this resource, if it has an id.
    pub fn key(&self) -> Option<(&str, &str)> {
        self.id.as_deref().map(|id| (self.ty.as_str(), id))
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.as_ref()?.get(name)
    }
}
