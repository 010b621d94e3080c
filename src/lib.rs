//! `galaxy-client` is an async HTTP client for the AI Agent Galaxy API.
//!
//! Every call goes through [`GalaxyClient::execute`], which enforces a
//! per-attempt timeout, retries network failures and 5xx responses with a
//! linear backoff, and reports every failure as one [`ClientError`] shape.
//! Typed helpers cover the application routes:
//! - [`GalaxyClient::login`] / [`GalaxyClient::current_user`]
//! - [`GalaxyClient::run_validation`]
//! - [`GalaxyClient::users`] / [`GalaxyClient::games`] (admin)

mod body;
mod client;
pub mod endpoints;
mod error;
pub mod export;
pub mod game;
mod options;
mod request;
pub mod retry;
mod transport;
mod types;
pub mod validate;

pub use body::Body;
pub use client::GalaxyClient;
pub use error::{
    ClientError, ConfigError, ErrorKind, TransportError, NETWORK_MESSAGE, TIMEOUT_MESSAGE,
    UNEXPECTED_RESPONSE_MESSAGE,
};
pub use game::{Agent, RiskZone};
pub use options::{resolve_base_url, ClientOptions, LOCAL_BASE_URL};
pub use request::{Method, PreparedRequest, Request};
pub use transport::{RawResponse, ReqwestTransport, Transport};
pub use types::{
    AdminStats, AgentStats, AuthResponse, CurrentUser, GamePage, GameRecord, Pagination,
    StatsOverview, TopPlayer, UserPage, UserRecord, UserStats, UserSummary, UserUpdate,
    ValidationRun,
};

pub type Result<T> = std::result::Result<T, ClientError>;
