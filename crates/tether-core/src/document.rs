//! Wire format of JSON:API documents.
//!
//! These types mirror the document exactly as it travels over HTTP. They are
//! consumed by the engine while decoding and produced by it when building
//! request bodies; nothing keeps them around afterwards.

mod error_object;
pub use error_object::ErrorObject;

mod linkage;
pub use linkage::{Linkage, Relationship, ResourceIdentifier};

mod resource;
pub use resource::ResourceObject;

use crate::Result;

use serde::{Deserialize, Serialize};

/// A top-level JSON:API document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Primary data. `None` when the member is absent or `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,

    /// Side-loaded resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Value>,
}

/// The `data` member: one resource or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<ResourceObject>),
    One(Box<ResourceObject>),
}

impl Document {
    /// Decodes a document from a response body.
    pub fn from_value(body: serde_json::Value) -> Result<Document> {
        Ok(serde_json::from_value(body)?)
    }

    /// Builds a request document around a single resource.
    pub fn single(resource: ResourceObject) -> Document {
        Document {
            data: Some(PrimaryData::One(Box::new(resource))),
            ..Document::default()
        }
    }

    /// Primary resources in wire order. Empty when there is no primary data.
    pub fn primary(&self) -> &[ResourceObject] {
        match &self.data {
            Some(PrimaryData::Many(resources)) => resources,
            Some(PrimaryData::One(resource)) => std::slice::from_ref(resource.as_ref()),
            None => &[],
        }
    }

    /// Side-loaded resources, or an empty slice.
    pub fn included(&self) -> &[ResourceObject] {
        self.included.as_deref().unwrap_or_default()
    }

    /// The candidate pool used to resolve relationships: primary resources
    /// followed by included ones.
    pub fn pool(&self) -> impl Iterator<Item = &ResourceObject> + '_ {
        self.primary().iter().chain(self.included())
    }

    /// Returns `true` if the document is an error document.
    pub fn is_error(&self) -> bool {
        self.errors.is_some()
    }
}
