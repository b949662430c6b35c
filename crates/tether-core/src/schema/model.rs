use super::{Field, FieldTy};

/// Declaration of one resource type.
#[derive(Debug, Clone)]
pub struct Model {
    /// The JSON:API `type` of the resource. Never changes.
    pub resource_type: String,

    /// Overrides the datastore's base URL for this model.
    pub base_url: Option<String>,

    /// Overrides the datastore's API version segment for this model.
    pub api_version: Option<String>,

    /// Path segment used instead of the resource type when building URLs.
    pub endpoint_path: Option<String>,

    /// Attributes and relationships, in declaration order.
    pub fields: Vec<Field>,
}

impl Model {
    pub fn new(resource_type: impl Into<String>) -> Model {
        Model {
            resource_type: resource_type.into(),
            base_url: None,
            api_version: None,
            endpoint_path: None,
            fields: vec![],
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Model {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Model {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn endpoint_path(mut self, endpoint_path: impl Into<String>) -> Model {
        self.endpoint_path = Some(endpoint_path.into());
        self
    }

    pub fn field(mut self, field: Field) -> Model {
        self.fields.push(field);
        self
    }

    /// The URL path segment for this model's collection.
    pub fn endpoint(&self) -> &str {
        self.endpoint_path.as_deref().unwrap_or(&self.resource_type)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name.app_name == name)
    }

    pub fn field_by_wire_name(&self, wire_name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name.wire_name() == wire_name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields
            .iter()
            .filter(|field| matches!(field.ty, FieldTy::Attribute(_)))
    }

    pub fn relations(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.is_relation())
    }
}
