use reqwest::Url;

use crate::ConfigError;

/// Base URL used when the application is served from a loopback host.
pub const LOCAL_BASE_URL: &str = "http://localhost:5000";

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total number of attempts, including the first one.
    pub max_attempts: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_attempts: 3,
        }
    }
}

impl ClientOptions {
    /// Reads overrides from the environment, keeping defaults for unset variables.
    ///
    /// Reads:
    /// - `GALAXY_API_TIMEOUT_MS` — per-attempt timeout in milliseconds
    /// - `GALAXY_API_MAX_ATTEMPTS` — total attempts per call
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::default();
        if let Some(timeout_ms) = read_number("GALAXY_API_TIMEOUT_MS")? {
            options.timeout_ms = timeout_ms;
        }
        if let Some(max_attempts) = read_number("GALAXY_API_MAX_ATTEMPTS")? {
            options.max_attempts = max_attempts;
        }
        Ok(options)
    }
}

fn read_number<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err: T::Err| ConfigError::InvalidVar {
                name,
                reason: err.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

/// Derives the API base URL from the origin the application is served from.
///
/// Loopback hosts talk to the local development server; any other origin is
/// its own API host.
///
/// Example: `"http://127.0.0.1:8080"` → `"http://localhost:5000"`
pub fn resolve_base_url(origin: &str) -> Result<String, ConfigError> {
    let url = Url::parse(origin.trim()).map_err(|err| ConfigError::InvalidVar {
        name: "GALAXY_ORIGIN",
        reason: err.to_string(),
    })?;

    match url.host_str() {
        Some("localhost") | Some("127.0.0.1") => Ok(LOCAL_BASE_URL.to_owned()),
        Some(_) => Ok(url.origin().ascii_serialization()),
        None => Err(ConfigError::InvalidVar {
            name: "GALAXY_ORIGIN",
            reason: format!("origin '{origin}' has no host"),
        }),
    }
}
