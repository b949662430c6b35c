mod builder;
pub use builder::{Builder, QueryEncoder};

mod options;
pub use options::RequestOptions;

use crate::{
    engine::{self, Decoder},
    IdentityStore, Model, QueryData, Resource, Result,
};

use tether_core::{
    document::ErrorObject,
    schema,
    transport::{Headers, Method, Request, Response},
    Document, Error, Schema, Transport, Value,
};

use parking_lot::Mutex;
use std::sync::Arc;

const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Shared state between all `Datastore` clones.
pub(crate) struct Shared {
    pub(crate) schema: Arc<Schema>,
    pub(crate) transport: Box<dyn Transport>,
    pub(crate) store: IdentityStore,
    /// Global headers. Starts from the builder's and can be replaced.
    pub(crate) headers: Mutex<Headers>,
    pub(crate) config: builder::Config,
}

/// Entry point for talking to a JSON:API server.
///
/// Clones share the schema, transport and identity store.
#[derive(Clone)]
pub struct Datastore {
    shared: Arc<Shared>,
}

impl Datastore {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn store(&self) -> &IdentityStore {
        &self.shared.store
    }

    /// Replaces the global headers sent with every request.
    pub fn set_headers(&self, headers: Headers) {
        *self.shared.headers.lock() = headers;
    }

    /// Fetches one resource by id.
    pub async fn find<M: Model>(&self, id: &str, options: RequestOptions) -> Result<M> {
        let model = self.model_schema(M::TYPE)?;
        let url = self.build_url(&model, Some(id), &options);

        let response = self.exec(Method::Get, url, &options, None).await?;
        let document = parse_document(response.body)?;

        let resource =
            Decoder::new(&self.shared.schema, &self.shared.store, &document).decode_single()?;
        Ok(M::from_resource(resource))
    }

    /// Fetches a collection.
    pub async fn find_all<M: Model>(&self, options: RequestOptions) -> Result<QueryData<M>> {
        let model = self.model_schema(M::TYPE)?;
        let url = self.build_url(&model, None, &options);

        let response = self.exec(Method::Get, url, &options, None).await?;
        let document = parse_document(response.body)?;
        if document.data.is_none() {
            return Err(Error::malformed_response("expected data in response"));
        }

        let resources =
            Decoder::new(&self.shared.schema, &self.shared.store, &document).decode_collection();

        Ok(QueryData::new(
            resources.into_iter().map(M::from_resource).collect(),
            document.meta,
            document.links,
        ))
    }

    /// Builds a new, unsaved instance. Nothing is sent and the instance is
    /// not added to the identity store until it is saved.
    ///
    /// # Panics
    ///
    /// Panics if `M` is not registered or an attribute is not declared on it.
    #[track_caller]
    pub fn create<'a, M: Model>(&self, attributes: impl IntoIterator<Item = (&'a str, Value)>) -> M {
        let Some(model) = self.shared.schema.model(M::TYPE) else {
            panic!("resource type `{}` is not registered with this datastore", M::TYPE);
        };

        let resource = Resource::new(model.clone());
        for (name, value) in attributes {
            resource.set(name, value);
        }

        M::from_resource(resource)
    }

    /// Persists a model: `POST` when it has no id, `PATCH` otherwise.
    ///
    /// The saved instance is updated in place from the response and returned.
    pub async fn save<M: Model>(&self, model: &M, options: RequestOptions) -> Result<M> {
        let resource = model.as_resource();
        let schema_model = self.model_schema(resource.resource_type())?;

        let id = resource.id();
        let method = match id {
            Some(_) => Method::Patch,
            None => Method::Post,
        };

        let url = self.build_url(&schema_model, id.as_deref(), &options);
        let body = serde_json::to_value(engine::build_request_body(resource))?;

        let response = self.exec(method, url, &options, Some(body)).await?;
        self.reconcile(resource, method, response)?;

        resource.clear_dirty();
        engine::backfill_inverse(&self.shared.schema, resource);

        Ok(M::from_resource(resource.clone()))
    }

    /// Deletes a resource by id. The identity store is left untouched.
    pub async fn delete<M: Model>(&self, id: &str, options: RequestOptions) -> Result<()> {
        let model = self.model_schema(M::TYPE)?;
        let url = self.build_url(&model, Some(id), &options);

        self.exec(Method::Delete, url, &options, None).await?;
        Ok(())
    }

    /// Looks up a cached instance without any network access.
    pub fn peek<M: Model>(&self, id: &str) -> Option<M> {
        self.shared.store.lookup(M::TYPE, id).map(M::from_resource)
    }

    /// Every cached instance of a type, in insertion order.
    pub fn peek_all<M: Model>(&self) -> Vec<M> {
        self.shared
            .store
            .lookup_all(M::TYPE)
            .into_iter()
            .map(M::from_resource)
            .collect()
    }

    /// The document `save` would send for `model`.
    pub fn request_body<M: Model>(&self, model: &M) -> Document {
        engine::build_request_body(model.as_resource())
    }

    /// Empties the identity store. Instances already handed out stay usable.
    pub fn clear_store(&self) {
        self.shared.store.clear();
    }

    fn model_schema(&self, resource_type: &str) -> Result<Arc<schema::Model>> {
        self.shared
            .schema
            .model(resource_type)
            .cloned()
            .ok_or_else(|| Error::unknown_model(resource_type))
    }

    /// Non-empty parts of `[base_url, api_version, endpoint, id]` joined with
    /// `/`, unless the call supplies its own URL, then the encoded query.
    fn build_url(&self, model: &schema::Model, id: Option<&str>, options: &RequestOptions) -> String {
        let config = &self.shared.config;

        let mut url = match &options.url {
            Some(url) => url.clone(),
            None => [
                model.base_url.as_deref().or(config.base_url.as_deref()),
                model.api_version.as_deref().or(config.api_version.as_deref()),
                Some(model.endpoint()),
                id,
            ]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/"),
        };

        let query = (config.query_encoder)(&options.params);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        url
    }

    /// JSON:API defaults, then global headers, then per-call headers.
    fn request_headers(&self, options: &RequestOptions) -> Headers {
        let mut headers = Headers::new();
        headers.set("Accept", MEDIA_TYPE).set("Content-Type", MEDIA_TYPE);
        headers.merge(&self.shared.headers.lock());
        headers.merge(&options.headers);
        headers
    }

    async fn exec(
        &self,
        method: Method,
        url: String,
        options: &RequestOptions,
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let request = Request {
            method,
            url,
            headers: self.request_headers(options),
            body,
        };

        tracing::debug!(%method, url = %request.url, "sending request");

        let response = self
            .shared
            .transport
            .send(request)
            .await
            .map_err(transport_error)?;

        if !response.is_success() {
            return Err(status_error(response));
        }

        Ok(response)
    }

    /// Applies a save response to the saved instance.
    ///
    /// `200`/`201` with a body carry the canonical state. Creating requires
    /// one. Any other success status, or an update answered without data,
    /// leaves the instance as it is.
    fn reconcile(&self, resource: &Resource, method: Method, response: Response) -> Result<()> {
        if !matches!(response.status, 200 | 201) {
            return Ok(());
        }

        let requires_data = method == Method::Post || response.status == 201;

        let document = match response.body {
            Some(body) => Document::from_value(body)?,
            None if requires_data => {
                return Err(Error::malformed_response("no body in response"));
            }
            None => return Ok(()),
        };

        if document.data.is_none() {
            if requires_data {
                return Err(Error::malformed_response("expected data in response"));
            }
            return Ok(());
        }

        Decoder::new(&self.shared.schema, &self.shared.store, &document).reconcile(resource)
    }
}

fn parse_document(body: Option<serde_json::Value>) -> Result<Document> {
    match body {
        Some(body) => Document::from_value(body),
        None => Err(Error::malformed_response("no body in response")),
    }
}

/// Error objects of a JSON:API error document, if `body` is one.
fn error_objects(body: &serde_json::Value) -> Option<Vec<ErrorObject>> {
    let errors = body.get("errors")?;
    serde_json::from_value(errors.clone()).ok()
}

fn status_error(response: Response) -> Error {
    let status = response.status;

    if let Some(errors) = response.body.as_ref().and_then(error_objects) {
        return Error::api(status, errors);
    }

    Error::transport(
        Some(status),
        format!("request failed with status {status}"),
        response.body,
    )
}

/// Transport failures carrying an error document surface as API errors.
fn transport_error(err: Error) -> Error {
    if err.is_transport() {
        if let Some(errors) = err.transport_body().and_then(error_objects) {
            return Error::api(err.status().unwrap_or_default(), errors);
        }
    }

    err
}
