use std::fmt;

use reqwest::Url;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::ClientError;

/// HTTP method of a [`Request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// Description of one logical API call.
///
/// Built once per call and never mutated afterwards; every attempt of the
/// call transmits the same descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Server-relative path, e.g. `/api/login`.
    pub path: String,
    /// Query pairs appended to the URL in order.
    pub query: Vec<(String, String)>,
    /// JSON body, sent verbatim.
    pub body: Option<JsonValue>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends query pairs.
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.query.extend(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.to_string())),
        );
        self
    }

    /// Sets a raw JSON body.
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` into the JSON body.
    pub fn with_json<B: Serialize>(self, body: &B) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body).map_err(|err| {
            ClientError::new(
                format!("request body could not be serialized: {err}"),
                0,
                JsonValue::Null,
            )
        })?;
        Ok(self.with_body(value))
    }

    /// Resolves the descriptor against `base_url` into what goes on the wire.
    pub(crate) fn prepare(&self, base_url: &str) -> Result<PreparedRequest, ClientError> {
        let url = join_url(base_url, &self.path, &self.query)?;
        let body = match &self.body {
            Some(value) => Some(serde_json::to_vec(value).map_err(|err| {
                ClientError::new(
                    format!("request body could not be serialized: {err}"),
                    0,
                    JsonValue::Null,
                )
            })?),
            None => None,
        };
        Ok(PreparedRequest {
            method: self.method,
            url,
            body,
        })
    }
}

/// A [`Request`] resolved to an absolute URL with an encoded body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

/// Joins `base_url` and a server-relative `path` with exactly one `/`.
fn join_url(base_url: &str, path: &str, query: &[(String, String)]) -> Result<String, ClientError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).map_err(|err| {
        ClientError::new(
            format!("invalid request URL '{joined}': {err}"),
            0,
            JsonValue::Null,
        )
    })?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(key, value)| (key.as_str(), value.as_str())));
    }
    Ok(url.into())
}
