//! HTTP transport seam.
//!
//! [`GalaxyClient`](crate::GalaxyClient) only needs to send one request and
//! read back status, content type and body. Anything able to do that can
//! stand in for the default [`ReqwestTransport`], which is how tests drive
//! the client without a network.

use std::future::Future;

use reqwest::header;

use crate::{PreparedRequest, TransportError};

/// A minimal async HTTP transport.
///
/// The client's per-attempt deadline wraps the whole future returned by
/// [`Transport::send`], body download included: a response whose body is
/// still streaming when the deadline passes counts as timed out. Dropping
/// the future must abort the in-flight request.
pub trait Transport: Clone + Send + Sync + 'static {
    /// Sends `request` with `Content-Type: application/json` and session
    /// credentials, returning whatever response the server produced.
    ///
    /// Non-success statuses are responses, not errors. `Err` is reserved for
    /// failures where no usable response arrived.
    fn send(
        &self,
        request: &PreparedRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// A response as read off the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Canonical reason phrase, e.g. `"Not Found"`.
    pub status_text: String,
    /// The `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// The response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A [`reqwest`]-backed [`Transport`] with a persistent cookie store, so the
/// session cookie set by `/api/login` rides along on every later call.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { http })
    }

    /// Wraps an already configured client. Cookie handling is up to the caller.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method.into(), &request.url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            content_type,
            body,
        })
    }
}
