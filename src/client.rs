use std::fmt;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::{
    options::resolve_base_url,
    retry::{RetryPolicy, RetryState},
    Body, ClientError, ClientOptions, ConfigError, PreparedRequest, Request, ReqwestTransport,
    Result, Transport,
};

#[derive(Clone)]
/// HTTP client for the AI Agent Galaxy JSON API.
///
/// Construct one instance per application and hand it to whatever needs to
/// talk to the server; clones share the underlying transport (and therefore
/// the session cookie jar).
pub struct GalaxyClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    options: ClientOptions,
}

impl<T> fmt::Debug for GalaxyClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalaxyClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl GalaxyClient<ReqwestTransport> {
    /// Creates a client backed by `reqwest` with a session cookie store.
    pub fn new(base_url: impl Into<String>) -> std::result::Result<Self, ConfigError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(base_url, transport))
    }

    /// Creates a client for an application served from `origin`.
    ///
    /// Loopback origins are pointed at the local development server, see
    /// [`resolve_base_url`].
    pub fn for_origin(origin: &str) -> std::result::Result<Self, ConfigError> {
        Self::new(resolve_base_url(origin)?)
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `GALAXY_API_BASE_URL` — API base URL, used as-is
    /// - `GALAXY_ORIGIN` — application origin, used when no base URL is set
    /// - `GALAXY_API_TIMEOUT_MS`, `GALAXY_API_MAX_ATTEMPTS` — see
    ///   [`ClientOptions::from_env`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_client::GalaxyClient;
    ///
    /// let api = GalaxyClient::from_env().expect("missing GALAXY_* env vars");
    /// ```
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        let base_url = match non_empty_var("GALAXY_API_BASE_URL") {
            Some(url) => url,
            None => {
                let origin = non_empty_var("GALAXY_ORIGIN")
                    .ok_or(ConfigError::MissingVar("GALAXY_API_BASE_URL"))?;
                resolve_base_url(&origin)?
            }
        };
        Ok(Self::new(base_url)?.with_options(ClientOptions::from_env()?))
    }
}

impl<T: Transport> GalaxyClient<T> {
    /// Creates a client over a custom [`Transport`].
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            options: ClientOptions::default(),
        }
    }

    /// Applies client options such as timeout and attempt budget.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Performs one logical API call.
    ///
    /// Network failures and 5xx responses are retried with a linear backoff
    /// of one second per failed attempt until `max_attempts` is spent, after
    /// which the last error is returned. Any other failure, including the
    /// local timeout, is returned at once.
    pub async fn execute(&self, request: &Request) -> Result<Body> {
        let prepared = request.prepare(&self.base_url)?;
        let policy = RetryPolicy::new(self.options.max_attempts);
        let mut state = RetryState::start();
        let mut outcome = None;

        loop {
            match state {
                RetryState::Attempting { attempt } => {
                    let result = self.attempt(&prepared).await;
                    state = match &result {
                        Ok(_) => {
                            #[cfg(feature = "tracing")]
                            tracing::trace!(
                                method = %prepared.method,
                                url = %prepared.url,
                                attempt,
                                "request succeeded"
                            );
                            state.on_success()
                        }
                        Err(err) => {
                            let next = state.on_failure(&policy, err);

                            #[cfg(feature = "tracing")]
                            if next == RetryState::Done && attempt > 1 {
                                tracing::warn!(
                                    method = %prepared.method,
                                    url = %prepared.url,
                                    status = err.status,
                                    "request failed after {attempt} attempts"
                                );
                            }
                            next
                        }
                    };
                    #[cfg(not(feature = "tracing"))]
                    let _ = attempt;

                    outcome = Some(result);
                }
                RetryState::Waiting { attempt, delay } => {
                    self.wait_before_retry(attempt, delay).await;
                    state = state.on_wait_elapsed();
                }
                RetryState::Done => {
                    return outcome
                        .unwrap_or_else(|| Err(ClientError::network("no attempt made")));
                }
            }
        }
    }

    /// One transmission bounded by the per-attempt deadline.
    ///
    /// The deadline covers the whole transport call, body download included.
    async fn attempt(&self, prepared: &PreparedRequest) -> Result<Body> {
        let deadline = Duration::from_millis(self.options.timeout_ms);
        let response = match timeout(deadline, self.transport.send(prepared)).await {
            // The transport future is dropped here, aborting the request.
            Err(_) => return Err(ClientError::timeout()),
            Ok(Err(err)) => return Err(ClientError::network(err.message)),
            Ok(Ok(response)) => response,
        };

        if !response.is_success() {
            return Err(ClientError::from_response(
                response.status,
                &response.status_text,
                &response.body,
            ));
        }

        Body::parse(response.content_type.as_deref(), &response.body)
    }

    async fn wait_before_retry(&self, attempt: usize, delay: Duration) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "attempt {attempt} failed, retrying after {} ms",
            delay.as_millis()
        );
        #[cfg(not(feature = "tracing"))]
        let _ = attempt;

        sleep(delay).await;
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
