use serde::{Deserialize, Serialize};

/// Account as returned by `/api/login`, `/api/register` and `/api/me`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub total_score: i64,
    #[serde(default)]
    pub games_played: i64,
    #[serde(default)]
    pub best_score: Option<i64>,
    #[serde(default)]
    pub prediction_accuracy: Option<f64>,
    #[serde(default)]
    pub ai_success_rate: Option<f64>,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Body of a successful login or registration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    pub user: UserSummary,
}

/// Body of `/api/me`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CurrentUser {
    pub user: UserSummary,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_score: i64,
    #[serde(default)]
    pub games_played: i64,
    #[serde(default)]
    pub best_score: Option<i64>,
}

/// Outcome of one agent run scored against the player's prediction.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ValidationRun {
    pub steps: i64,
    pub succeeded: bool,
    #[serde(default)]
    pub gif_url: Option<String>,
    pub agent_type: String,
    pub score: i64,
    /// Echoed back by the server as a string.
    pub prediction: String,
    #[serde(default)]
    pub user_stats: Option<UserStats>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StatsOverview {
    pub total_users: i64,
    pub active_users: i64,
    pub total_games: i64,
    #[serde(default)]
    pub total_score: i64,
    #[serde(default)]
    pub recent_games: i64,
    #[serde(default)]
    pub recent_users: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AgentStats {
    pub ddqn_games: i64,
    pub d3qn_games: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TopPlayer {
    pub id: i64,
    pub username: String,
    pub total_score: i64,
    pub games_played: i64,
    #[serde(default)]
    pub best_score: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `/api/admin/stats`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AdminStats {
    pub overview: StatsOverview,
    pub agent_stats: AgentStats,
    #[serde(default)]
    pub top_players: Vec<TopPlayer>,
}

/// A row of the admin user listing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(default)]
    pub games_played: Option<i64>,
    #[serde(default)]
    pub prediction_accuracy: Option<f64>,
    #[serde(default)]
    pub ai_success_rate: Option<f64>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// A row of the admin game listing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GameRecord {
    pub id: i64,
    pub username: String,
    pub agent_type: String,
    pub prediction: i64,
    pub actual_steps: i64,
    pub succeeded: bool,
    pub score: i64,
    #[serde(default)]
    pub total_reward: Option<f64>,
    pub timestamp: String,
    #[serde(default)]
    pub gif_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub total: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GamePage {
    pub games: Vec<GameRecord>,
    pub pagination: Pagination,
}

/// Admin edit of a user; unset fields are left unchanged on the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}
