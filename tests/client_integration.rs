use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use galaxy_client::{
    Body, ClientOptions, ErrorKind, GalaxyClient, Request, UserPage, ValidationRun,
    TIMEOUT_MESSAGE,
};
use serde_json::{json, Value as JsonValue};

const SESSION_COOKIE: &str = "session=galaxy-test";

#[derive(Clone)]
enum MockBody {
    Json(JsonValue),
    Text(&'static str),
}

#[derive(Clone)]
struct MockResponse {
    status: StatusCode,
    body: MockBody,
    delay: Duration,
}

impl MockResponse {
    fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body: MockBody::Json(body),
            delay: Duration::from_millis(0),
        }
    }

    fn text(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body: MockBody::Text(body),
            delay: Duration::from_millis(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    hits: Arc<AtomicUsize>,
}

async fn scripted_handler(State(state): State<MockState>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    match response.body {
        MockBody::Json(body) => (response.status, Json(body)).into_response(),
        MockBody::Text(body) => (
            response.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response(),
    }
}

async fn login_handler(Json(body): Json<JsonValue>) -> Response {
    if body["username"] == "kit" && body["password"] == "secret" {
        (
            StatusCode::OK,
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
            Json(json!({"success": true, "user": {"id": 1, "username": "kit"}})),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid username or password"})),
        )
            .into_response()
    }
}

async fn me_handler(headers: HeaderMap) -> Response {
    let logged_in = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE));
    if logged_in {
        Json(json!({"user": {"id": 1, "username": "kit", "is_admin": true}})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Not logged in"}))).into_response()
    }
}

async fn users_handler(Query(query): Query<HashMap<String, String>>) -> Json<JsonValue> {
    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let search = query.get("search").cloned().unwrap_or_default();
    Json(json!({
        "users": [{"id": 3, "username": search, "is_active": true, "is_admin": false}],
        "pagination": {
            "page": page, "pages": 4, "per_page": 20, "total": 61,
            "has_next": true, "has_prev": page > 1
        }
    }))
}

struct TestServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .route("/api/scripted", get(scripted_handler).post(scripted_handler))
        .route("/api/login", post(login_handler))
        .route("/api/me", get(me_handler))
        .route("/api/admin/users", get(users_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        hits: state.hits,
        task,
    }
}

fn client(server: &TestServer, max_attempts: usize) -> GalaxyClient {
    GalaxyClient::new(server.base_url.clone())
        .expect("transport must build")
        .with_options(ClientOptions {
            timeout_ms: 2_000,
            max_attempts,
        })
}

#[tokio::test]
async fn json_success_body_is_returned_unchanged() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({"success": true, "x": 1}),
    )])
    .await;
    let api = client(&server, 3);

    let body = api
        .execute(&Request::get("/api/scripted"))
        .await
        .expect("request must succeed");

    assert_eq!(body, Body::Json(json!({"success": true, "x": 1})));
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_json_success_body_is_text() {
    let server = spawn_server(vec![MockResponse::text(StatusCode::OK, "pong")]).await;
    let api = client(&server, 3);

    let body = api
        .execute(&Request::get("/api/scripted"))
        .await
        .expect("request must succeed");

    assert_eq!(body.as_text(), Some("pong"));
}

#[tokio::test]
async fn login_session_cookie_is_sent_on_later_calls() {
    let server = spawn_server(Vec::new()).await;
    let api = client(&server, 3);

    let err = api.current_user().await.expect_err("no session yet");
    assert!(err.is_auth_error());
    assert_eq!(err.message, "Not logged in");

    let body = api
        .login("kit", "secret", false)
        .await
        .expect("login must succeed");
    assert!(body.is_success());

    let me = api.current_user().await.expect("session cookie must be sent");
    assert_eq!(me.field("user").and_then(|u| u.get("username")), Some(&json!("kit")));
}

#[tokio::test]
async fn wrong_credentials_are_terminal() {
    let server = spawn_server(Vec::new()).await;
    let api = client(&server, 3);

    let err = api
        .login("kit", "wrong", false)
        .await
        .expect_err("login must fail");

    assert_eq!(err.status, 401);
    assert_eq!(err.message, "Invalid username or password");
    assert_eq!(err.data, json!({"error": "Invalid username or password"}));
    assert_eq!(err.kind(), ErrorKind::Client);
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::NOT_FOUND, json!({"error": "missing"})),
        MockResponse::json(StatusCode::OK, json!({"success": true})),
    ])
    .await;
    let api = client(&server, 3);

    let err = api
        .execute(&Request::get("/api/scripted"))
        .await
        .expect_err("404 must fail");

    assert_eq!(err.status, 404);
    assert_eq!(err.message, "missing");
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})),
        MockResponse::json(
            StatusCode::OK,
            json!({
                "steps": 48, "succeeded": true, "gif_url": "/video/run_1.gif",
                "agent_type": "ddqn", "score": 4, "prediction": "45",
                "user_stats": {"total_score": 40, "games_played": 3, "best_score": 10}
            }),
        ),
    ])
    .await;
    let api = client(&server, 3);

    let body = api
        .execute(&Request::post("/api/scripted").with_body(json!({"prediction": 45})))
        .await
        .expect("request must succeed after retry");
    let run: ValidationRun = body.decode().expect("validation run shape");

    assert_eq!(run.steps, 48);
    assert_eq!(run.score, 4);
    assert_eq!(run.user_stats.map(|stats| stats.games_played), Some(3));
    assert_eq!(server.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn exhausted_retries_return_last_error() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::BAD_GATEWAY, json!({"error": "first"})),
        MockResponse::json(StatusCode::SERVICE_UNAVAILABLE, json!({"error": "second"})),
    ])
    .await;
    let api = client(&server, 2);

    let err = api
        .execute(&Request::get("/api/scripted"))
        .await
        .expect_err("must fail after retries");

    assert_eq!(err.status, 503);
    assert_eq!(err.message, "second");
    assert_eq!(server.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn non_json_error_body_synthesizes_message() {
    let server = spawn_server(vec![MockResponse::text(
        StatusCode::BAD_GATEWAY,
        "upstream down",
    )])
    .await;
    let api = client(&server, 1);

    let err = api
        .execute(&Request::get("/api/scripted"))
        .await
        .expect_err("must fail");

    assert_eq!(err.status, 502);
    assert_eq!(err.message, "HTTP 502 Bad Gateway");
}

#[tokio::test]
async fn timeout_is_terminal() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::OK, json!({"success": true}))
            .with_delay(Duration::from_millis(500)),
        MockResponse::json(StatusCode::OK, json!({"success": true})),
    ])
    .await;
    let api = GalaxyClient::new(server.base_url.clone())
        .expect("transport must build")
        .with_options(ClientOptions {
            timeout_ms: 50,
            max_attempts: 3,
        });

    let err = api
        .execute(&Request::get("/api/scripted"))
        .await
        .expect_err("request must time out");

    assert_eq!(err.status, 408);
    assert_eq!(err.message, TIMEOUT_MESSAGE);
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("must bind");
    let address = listener.local_addr().expect("must have local addr");
    drop(listener);

    let api = GalaxyClient::new(format!("http://{address}"))
        .expect("transport must build")
        .with_options(ClientOptions {
            timeout_ms: 2_000,
            max_attempts: 1,
        });

    let err = api.current_user().await.expect_err("nothing is listening");

    assert_eq!(err.status, 0);
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.is_network_error());
}

#[tokio::test]
async fn admin_users_query_reaches_server() {
    let server = spawn_server(Vec::new()).await;
    let api = client(&server, 3);

    let page: UserPage = api
        .users(2, 20, "kit & co")
        .await
        .expect("listing must succeed")
        .decode()
        .expect("user page shape");

    assert_eq!(page.pagination.page, 2);
    assert!(page.pagination.has_prev);
    assert_eq!(page.users[0].username, "kit & co");
}
