pub mod db;
pub use db::{Builder, Datastore, RequestOptions};

mod engine;

mod identity;
pub use identity::IdentityStore;

mod model;
pub use model::Model;

pub mod query;

mod query_data;
pub use query_data::QueryData;

pub mod relation;
pub use relation::{BelongsTo, HasMany};

mod resource;
pub use resource::{FieldChange, FieldTracker, Link, Resource};

pub use tether_core::{
    async_trait, bail, document, err, schema, transport, Codec, Document, Error, Result, Schema,
    Transport, Value,
};
