//! Static metadata describing each resource type: its attributes, their
//! codecs and wire names, and its relationships.

mod field;
pub use field::{Attribute, Field, FieldName, FieldTy};

mod model;
pub use model::Model;

mod relation;
pub use relation::{BelongsTo, Cardinality, HasMany};

use crate::{Error, Result};

use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Registry of every model known to a datastore, keyed by resource type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    models: IndexMap<String, Arc<Model>>,
}

impl Schema {
    /// Builds and verifies a schema from model declarations.
    pub fn from_models(models: impl IntoIterator<Item = Model>) -> Result<Schema> {
        let mut schema = Schema::default();

        for model in models {
            if schema.models.contains_key(&model.resource_type) {
                return Err(Error::invalid_schema(format!(
                    "resource type `{}` is registered twice",
                    model.resource_type
                )));
            }

            schema
                .models
                .insert(model.resource_type.clone(), Arc::new(model));
        }

        schema.verify()?;
        Ok(schema)
    }

    pub fn model(&self, resource_type: &str) -> Option<&Arc<Model>> {
        self.models.get(resource_type)
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Arc<Model>> + '_ {
        self.models.values()
    }

    /// Finds the to-many field on `related_type` that points back at
    /// `owner_type`, i.e. the inverse of a to-one relation declared on
    /// `owner_type`.
    pub fn inverse_has_many(&self, related_type: &str, owner_type: &str) -> Option<&Field> {
        self.model(related_type)?.fields.iter().find(|field| {
            matches!(&field.ty, FieldTy::HasMany(has_many) if has_many.target == owner_type)
        })
    }

    fn verify(&self) -> Result<()> {
        for model in self.models.values() {
            let mut names = IndexSet::new();
            let mut wire_names = IndexSet::new();

            for field in &model.fields {
                if !names.insert(field.name.app_name.as_str()) {
                    return Err(Error::invalid_schema(format!(
                        "field `{}` is declared twice on `{}`",
                        field.name.app_name, model.resource_type
                    )));
                }

                if !wire_names.insert(field.name.wire_name()) {
                    return Err(Error::invalid_schema(format!(
                        "wire name `{}` is used by two fields of `{}`",
                        field.name.wire_name(),
                        model.resource_type
                    )));
                }

                if let Some(target) = field.relation_target() {
                    if !self.models.contains_key(target) {
                        return Err(Error::invalid_schema(format!(
                            "relation `{}.{}` targets unregistered resource type `{target}`",
                            model.resource_type, field.name.app_name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
