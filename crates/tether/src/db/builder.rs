use super::{Datastore, Shared};
use crate::{
    query::{self, Params},
    IdentityStore, Model, Result,
};

use tether_core::{schema, transport::Headers, Schema, Transport};

use parking_lot::Mutex;
use std::{fmt, sync::Arc};

/// Encodes request parameters into a query string (without the leading `?`).
pub type QueryEncoder = Arc<dyn Fn(&Params) -> String + Send + Sync>;

#[derive(Default)]
pub struct Builder {
    models: Vec<schema::Model>,
    config: Config,
}

/// Datastore-wide request configuration.
#[derive(Clone)]
pub(crate) struct Config {
    pub(crate) base_url: Option<String>,
    pub(crate) api_version: Option<String>,
    pub(crate) headers: Headers,
    pub(crate) query_encoder: QueryEncoder,
}

impl Builder {
    pub fn register<T: Model>(&mut self) -> &mut Self {
        self.models.push(T::schema());
        self
    }

    /// Registers an untyped model declaration.
    pub fn register_schema(&mut self, model: schema::Model) -> &mut Self {
        self.models.push(model);
        self
    }

    pub fn base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    pub fn api_version(&mut self, api_version: impl Into<String>) -> &mut Self {
        self.config.api_version = Some(api_version.into());
        self
    }

    /// Adds a header sent with every request.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.config.headers.set(name, value);
        self
    }

    pub fn query_encoder(
        &mut self,
        encoder: impl Fn(&Params) -> String + Send + Sync + 'static,
    ) -> &mut Self {
        self.config.query_encoder = Arc::new(encoder);
        self
    }

    /// Verifies the registered models and builds the datastore.
    pub fn build(&self, transport: impl Transport) -> Result<Datastore> {
        let schema = Schema::from_models(self.models.iter().cloned())?;

        tracing::debug!(models = schema.models().len(), "datastore built");

        Ok(Datastore {
            shared: Arc::new(Shared {
                schema: Arc::new(schema),
                transport: Box::new(transport),
                store: IdentityStore::new(),
                headers: Mutex::new(self.config.headers.clone()),
                config: self.config.clone(),
            }),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: None,
            api_version: None,
            headers: Headers::new(),
            query_encoder: Arc::new(query::to_query_string),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
