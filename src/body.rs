use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::ClientError;

/// Successful response payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Response declared `application/json`.
    Json(JsonValue),
    /// Any other content type, as text.
    Text(String),
}

impl Body {
    /// Parses a 2xx payload according to its content type.
    ///
    /// Only a body declared as JSON can fail. Text bodies are decoded
    /// lossily, so a successful response is never turned into an error.
    pub(crate) fn parse(content_type: Option<&str>, bytes: &[u8]) -> Result<Self, ClientError> {
        let is_json = content_type.is_some_and(|value| value.contains("application/json"));
        if is_json {
            serde_json::from_slice(bytes)
                .map(Self::Json)
                .map_err(|err| {
                    ClientError::unexpected_response(format!("invalid JSON body: {err}"))
                })
        } else {
            Ok(Self::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Reads the application-level `success` flag; absent or non-JSON is `false`.
    pub fn is_success(&self) -> bool {
        self.field("success").and_then(JsonValue::as_bool).unwrap_or(false)
    }

    /// Returns a top-level field of a JSON object body.
    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.as_json()?.get(name)
    }

    /// Decodes a JSON body into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let value = self
            .as_json()
            .ok_or_else(|| ClientError::unexpected_response("expected a JSON body, got text"))?;
        serde_json::from_value(value.clone())
            .map_err(|err| {
                ClientError::unexpected_response(format!("unexpected body shape: {err}"))
            })
    }
}
