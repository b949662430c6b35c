use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A relationship object.
///
/// `data` distinguishes three states: the member is absent (`None`, e.g. a
/// relationship that only carries `links`), explicitly `null`
/// (`Some(Linkage::Null)`), or present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<Linkage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Resource linkage of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    Many(Vec<ResourceIdentifier>),
    One(ResourceIdentifier),
    Null,
}

/// A `{type, id}` pointer to a resource.
///
/// When a request embeds a related resource that has not been created yet,
/// `id` is absent and `attributes` carries the pending values instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<IndexMap<String, serde_json::Value>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Linkage>, D::Error>
where
    D: Deserializer<'de>,
{
    Linkage::deserialize(deserializer).map(Some)
}

impl Relationship {
    pub fn new(data: Linkage) -> Relationship {
        Relationship {
            data: Some(data),
            ..Relationship::default()
        }
    }
}

impl ResourceIdentifier {
    pub fn new(ty: impl Into<String>, id: impl Into<String>) -> ResourceIdentifier {
        ResourceIdentifier {
            ty: ty.into(),
            id: Some(id.into()),
            attributes: None,
        }
    }

    /// An identifier for a resource the server has not assigned an id to yet.
    pub fn pending(
        ty: impl Into<String>,
        attributes: IndexMap<String, serde_json::Value>,
    ) -> ResourceIdentifier {
        ResourceIdentifier {
            ty: ty.into(),
            id: None,
            attributes: Some(attributes),
        }
    }
}
