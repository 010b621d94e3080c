use serde_json::Value as JsonValue;

/// Message used when no response arrived at all.
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";
/// Message used when the local per-attempt deadline expires.
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";
/// Message used when a response arrived but its body could not be read or parsed.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server.";

/// Status reported when no response was received.
pub const STATUS_NETWORK: u16 = 0;
/// Status reported when the local deadline expired.
pub const STATUS_TIMEOUT: u16 = 408;

/// Failure returned by [`GalaxyClient::execute`](crate::GalaxyClient::execute).
///
/// Every failure, whether it came from the network, the local deadline or
/// the server, is normalized into this one shape. `status` is always set and
/// `message` is never empty.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    /// Human-readable message, taken from the server payload when present.
    pub message: String,
    /// `0` for network failure, `408` for local timeout, otherwise HTTP status.
    pub status: u16,
    /// Server payload that accompanied the failure, `Null` when there was none.
    pub data: JsonValue,
}

/// Coarse classification of a [`ClientError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received (status 0).
    Network,
    /// Status 408, whether from the local deadline or sent by the server.
    Timeout,
    /// 4xx other than 408. Never retried.
    Client,
    /// 5xx. Retried while the attempt budget lasts.
    Server,
}

impl ClientError {
    /// Builds an error, substituting a status-derived message when `message` is blank.
    pub fn new(message: impl Into<String>, status: u16, data: JsonValue) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            default_message(status)
        } else {
            message
        };
        Self {
            message,
            status,
            data,
        }
    }

    /// No response arrived. `detail` is kept in `data` for diagnostics.
    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(
            NETWORK_MESSAGE,
            STATUS_NETWORK,
            serde_json::json!({ "detail": detail.into() }),
        )
    }

    pub fn timeout() -> Self {
        Self::new(TIMEOUT_MESSAGE, STATUS_TIMEOUT, JsonValue::Null)
    }

    /// A response arrived but its body could not be read or decoded.
    pub fn unexpected_response(detail: impl Into<String>) -> Self {
        Self::new(
            UNEXPECTED_RESPONSE_MESSAGE,
            STATUS_NETWORK,
            serde_json::json!({ "detail": detail.into() }),
        )
    }

    /// Builds the error for a non-success HTTP response.
    ///
    /// A JSON body contributes its `error` (or `message`) field as the
    /// message and is kept whole as `data`. A non-JSON body yields
    /// `"HTTP <status> <status_text>"`.
    pub fn from_response(status: u16, status_text: &str, body: &[u8]) -> Self {
        match serde_json::from_slice::<JsonValue>(body) {
            Ok(payload) => {
                let message = ["error", "message"]
                    .iter()
                    .find_map(|field| payload.get(field).and_then(JsonValue::as_str))
                    .filter(|text| !text.trim().is_empty())
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                Self::new(message, status, payload)
            }
            Err(_) => {
                let message = format!("HTTP {status} {status_text}").trim_end().to_owned();
                let data = serde_json::json!({ "error": message });
                Self::new(message, status, data)
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.status {
            STATUS_NETWORK => ErrorKind::Network,
            STATUS_TIMEOUT => ErrorKind::Timeout,
            status if status >= 500 => ErrorKind::Server,
            _ => ErrorKind::Client,
        }
    }

    /// 401 or 403: the session is missing or lacks permission.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status, 401 | 403)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// No response, or a server-side failure.
    pub fn is_network_error(&self) -> bool {
        self.status == STATUS_NETWORK || self.status >= 500
    }

    /// Status 408. The local deadline and a 408 sent by the server both
    /// count; neither is retried.
    pub fn is_timeout(&self) -> bool {
        self.status == STATUS_TIMEOUT
    }
}

fn default_message(status: u16) -> String {
    match status {
        STATUS_NETWORK => NETWORK_MESSAGE.to_owned(),
        STATUS_TIMEOUT => TIMEOUT_MESSAGE.to_owned(),
        other => format!("HTTP {other}"),
    }
}

/// Failure of the underlying HTTP transport: nothing usable came back.
#[derive(Debug, thiserror::Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Error raised while building a client from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("missing {0} environment variable")]
    MissingVar(&'static str),
    /// Environment variable is set but cannot be used.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
    /// The HTTP transport could not be constructed.
    #[error("failed to build transport: {0}")]
    Transport(#[from] TransportError),
}
