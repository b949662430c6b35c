use crate::query::Params;

use tether_core::transport::Headers;

/// Per-call request configuration.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters appended to the URL.
    pub params: Params,

    /// Headers overriding the global and default ones.
    pub headers: Headers,

    /// Replaces the computed URL. Parameters are still appended.
    pub url: Option<String>,
}

impl RequestOptions {
    pub fn new() -> RequestOptions {
        RequestOptions::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Merges every member of a JSON object into the parameters. Anything
    /// other than an object is ignored.
    pub fn params(mut self, params: serde_json::Value) -> Self {
        if let serde_json::Value::Object(params) = params {
            self.params.extend(params);
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
