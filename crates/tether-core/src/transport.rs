//! Boundary with the HTTP layer.
//!
//! Tether does not speak HTTP itself. A [`Transport`] receives a fully built
//! [`Request`] and hands back the raw [`Response`]; retries, timeouts and
//! cancellation all belong to the implementation.

use crate::{async_trait, Result};

use std::fmt;

#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync + 'static {
    /// Performs one HTTP exchange.
    ///
    /// Network failures are reported as [`Error::transport`](crate::Error::transport).
    /// Responses with a non-2xx status may be returned as-is; the datastore
    /// turns them into errors.
    async fn send(&self, request: Request) -> Result<Response>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    /// Parsed JSON body. `None` for an empty body.
    pub body: Option<serde_json::Value>,
}

/// Header map with case-insensitive names, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Response {
    pub fn new(status: u16, body: Option<serde_json::Value>) -> Response {
        Response {
            status,
            headers: Headers::default(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Headers {
    pub fn new() -> Headers {
        Headers::default()
    }

    /// Sets a header, replacing any existing header with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Headers {
        let name = name.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }

        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Applies every header of `other` on top of `self`.
    pub fn merge(&mut self, other: &Headers) -> &mut Headers {
        for (name, value) in &other.entries {
            self.set(name.as_str(), value.as_str());
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Headers {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}
