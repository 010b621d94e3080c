//! Retry bookkeeping for one logical call.
//!
//! A call moves through `Attempting(1) -> [Waiting(1) -> Attempting(2) -> ...] -> Done`.
//! Each transition consumes exactly one event: a failed attempt or an
//! elapsed backoff. Success short-circuits to `Done` from any attempt.

use std::time::Duration;

use crate::{ClientError, ErrorKind};

/// Backoff before attempt `n + 1` is `n * BACKOFF_STEP_MS`.
pub const BACKOFF_STEP_MS: u64 = 1_000;

/// Whether a failed attempt may be followed by another one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Retryable,
    Terminal,
}

/// Classifies a failure.
///
/// Network failures and 5xx are retryable. Everything below 500 is
/// terminal, including the local timeout (408).
pub fn classify(err: &ClientError) -> Disposition {
    match err.kind() {
        ErrorKind::Network | ErrorKind::Server => Disposition::Retryable,
        ErrorKind::Timeout | ErrorKind::Client => Disposition::Terminal,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
}

impl RetryPolicy {
    /// `max_attempts` of zero still allows the first attempt.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Linear backoff after the failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: usize) -> Duration {
        let attempt = u64::try_from(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(BACKOFF_STEP_MS.saturating_mul(attempt))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryState {
    /// Attempt `attempt` (1-based) is in flight.
    Attempting { attempt: usize },
    /// Attempt `attempt` failed; the next one starts after `delay`.
    Waiting { attempt: usize, delay: Duration },
    /// A final outcome has been produced.
    Done,
}

impl RetryState {
    pub fn start() -> Self {
        Self::Attempting { attempt: 1 }
    }

    /// The current attempt failed with `err`.
    pub fn on_failure(self, policy: &RetryPolicy, err: &ClientError) -> Self {
        match self {
            Self::Attempting { attempt } => {
                if classify(err) == Disposition::Terminal || attempt >= policy.max_attempts() {
                    Self::Done
                } else {
                    Self::Waiting {
                        attempt,
                        delay: policy.backoff(attempt),
                    }
                }
            }
            other => other,
        }
    }

    /// The current attempt succeeded.
    pub fn on_success(self) -> Self {
        match self {
            Self::Attempting { .. } => Self::Done,
            other => other,
        }
    }

    /// The backoff delay elapsed.
    pub fn on_wait_elapsed(self) -> Self {
        match self {
            Self::Waiting { attempt, .. } => Self::Attempting {
                attempt: attempt + 1,
            },
            other => other,
        }
    }
}
