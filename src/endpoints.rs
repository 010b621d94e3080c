//! Typed helpers for the Galaxy API routes.
//!
//! Each helper builds a [`Request`] and runs it through
//! [`GalaxyClient::execute`], so all of them share the same timeout, retry
//! and error rules.

use serde_json::json;

use crate::{Agent, Body, GalaxyClient, Request, Result, Transport, UserUpdate};

pub const LOGIN: &str = "/api/login";
pub const REGISTER: &str = "/api/register";
pub const LOGOUT: &str = "/api/logout";
pub const ME: &str = "/api/me";
pub const FORGOT_PASSWORD: &str = "/api/forgot-password";
pub const RESET_PASSWORD: &str = "/api/reset-password";
pub const VALIDATE_RESET_TOKEN: &str = "/api/validate-reset-token";
pub const RUN_VALIDATION: &str = "/api/run-validation";
pub const ADMIN_STATS: &str = "/api/admin/stats";
pub const ADMIN_USERS: &str = "/api/admin/users";
pub const ADMIN_GAMES: &str = "/api/admin/games";
pub const CLEANUP_VIDEOS: &str = "/api/cleanup-old-videos";
pub const HEALTH: &str = "/api/health";

impl<T: Transport> GalaxyClient<T> {
    pub async fn login(&self, username: &str, password: &str, remember_me: bool) -> Result<Body> {
        let request = Request::post(LOGIN).with_body(json!({
            "username": username,
            "password": password,
            "remember_me": remember_me,
        }));
        self.execute(&request).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Body> {
        let request = Request::post(REGISTER).with_body(json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        self.execute(&request).await
    }

    pub async fn logout(&self) -> Result<Body> {
        self.execute(&Request::post(LOGOUT).with_body(json!({})))
            .await
    }

    /// Fetches the logged-in user; fails with 401 when there is no session.
    pub async fn current_user(&self) -> Result<Body> {
        self.execute(&Request::get(ME)).await
    }

    /// Starts a password reset for a username or email address.
    pub async fn forgot_password(&self, identifier: &str) -> Result<Body> {
        let request = Request::post(FORGOT_PASSWORD).with_body(json!({ "identifier": identifier }));
        self.execute(&request).await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<Body> {
        let request = Request::post(RESET_PASSWORD).with_body(json!({
            "token": token,
            "password": password,
        }));
        self.execute(&request).await
    }

    pub async fn validate_reset_token(&self, token: &str) -> Result<Body> {
        let request = Request::post(VALIDATE_RESET_TOKEN).with_body(json!({ "token": token }));
        self.execute(&request).await
    }

    /// Runs `agent` for one episode and scores `prediction` against it.
    ///
    /// The server runs the whole episode before answering, so this is by far
    /// the slowest call.
    pub async fn run_validation(&self, agent: Agent, prediction: i64) -> Result<Body> {
        let request = Request::post(RUN_VALIDATION).with_body(json!({
            "agent_type": agent,
            "prediction": prediction,
        }));
        self.execute(&request).await
    }

    pub async fn admin_stats(&self) -> Result<Body> {
        self.execute(&Request::get(ADMIN_STATS)).await
    }

    pub async fn users(&self, page: u32, per_page: u32, search: &str) -> Result<Body> {
        let request = Request::get(ADMIN_USERS).with_query([
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
            ("search", search.to_owned()),
        ]);
        self.execute(&request).await
    }

    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<Body> {
        let request = Request::put(format!("{ADMIN_USERS}/{user_id}")).with_json(update)?;
        self.execute(&request).await
    }

    pub async fn games(&self, page: u32, per_page: u32) -> Result<Body> {
        let request = Request::get(ADMIN_GAMES).with_query([
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ]);
        self.execute(&request).await
    }

    /// Asks the server to delete old MP4 renders; GIFs are kept.
    pub async fn cleanup_old_videos(&self) -> Result<Body> {
        self.execute(&Request::post(CLEANUP_VIDEOS).with_body(json!({})))
            .await
    }

    /// `true` when the API reports `{"status": "ok"}`. Never fails.
    pub async fn health_check(&self) -> bool {
        match self.execute(&Request::get(HEALTH)).await {
            Ok(body) => body
                .field("status")
                .and_then(|status| status.as_str())
                .is_some_and(|status| status == "ok"),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value as JsonValue};

    use crate::{
        Agent, GalaxyClient, Method, PreparedRequest, RawResponse, Transport, TransportError,
        UserUpdate,
    };

    /// Records every request and answers `{"success": true}`.
    #[derive(Clone, Default)]
    struct Recorder {
        seen: Arc<Mutex<Vec<PreparedRequest>>>,
    }

    impl Recorder {
        fn last(&self) -> PreparedRequest {
            self.seen
                .lock()
                .expect("recorder mutex must not be poisoned")
                .last()
                .cloned()
                .expect("a request was sent")
        }
    }

    impl Transport for Recorder {
        async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, TransportError> {
            self.seen
                .lock()
                .expect("recorder mutex must not be poisoned")
                .push(request.clone());
            Ok(RawResponse {
                status: 200,
                status_text: "OK".to_owned(),
                content_type: Some("application/json".to_owned()),
                body: br#"{"success":true,"status":"ok"}"#.to_vec(),
            })
        }
    }

    fn body_json(request: &PreparedRequest) -> JsonValue {
        serde_json::from_slice(request.body.as_deref().expect("request has a body"))
            .expect("body is json")
    }

    fn client() -> (GalaxyClient<Recorder>, Recorder) {
        let recorder = Recorder::default();
        (
            GalaxyClient::with_transport("http://localhost:5000", recorder.clone()),
            recorder,
        )
    }

    #[tokio::test]
    async fn login_posts_credentials() {
        let (api, recorder) = client();
        api.login("kit", "secret", true).await.expect("ok");

        let request = recorder.last();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://localhost:5000/api/login");
        assert_eq!(
            body_json(&request),
            json!({"username": "kit", "password": "secret", "remember_me": true})
        );
    }

    #[tokio::test]
    async fn run_validation_sends_wire_agent_name() {
        let (api, recorder) = client();
        api.run_validation(Agent::D3qn, 42).await.expect("ok");

        let request = recorder.last();
        assert_eq!(request.url, "http://localhost:5000/api/run-validation");
        assert_eq!(
            body_json(&request),
            json!({"agent_type": "d3qn", "prediction": 42})
        );
    }

    #[tokio::test]
    async fn users_listing_uses_query_string() {
        let (api, recorder) = client();
        api.users(2, 20, "kit").await.expect("ok");

        let request = recorder.last();
        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.url,
            "http://localhost:5000/api/admin/users?page=2&per_page=20&search=kit"
        );
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn update_user_puts_only_set_fields() {
        let (api, recorder) = client();
        let update = UserUpdate {
            is_active: Some(false),
            is_admin: None,
        };
        api.update_user(9, &update).await.expect("ok");

        let request = recorder.last();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.url, "http://localhost:5000/api/admin/users/9");
        assert_eq!(body_json(&request), json!({"is_active": false}));
    }

    #[tokio::test]
    async fn health_check_reads_status_field() {
        let (api, _) = client();
        assert!(api.health_check().await);
    }
}
