#[macro_use]
mod macros;

mod codec;
pub use codec::Codec;

pub mod document;
pub use document::Document;

mod error;
pub use error::Error;

pub mod schema;
pub use schema::Schema;

pub mod transport;
pub use transport::Transport;

mod value;
pub use value::Value;

/// A Result type alias that uses Tether's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
