//! End-to-end tests for the UTP Fund admin console.
//!
//! [`MockApi`] serves a small in-memory copy of the platform's admin API on an
//! ephemeral local port. Tests point a real [`Gateway`] at it and drive the
//! list controllers and action executor over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p utpfund-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use utpfund_admin::{AdminIdentity, ApiConfig, Gateway, SessionStore};
use utpfund_core::AdminId;

/// Email the mock accepts at login.
pub const ADMIN_EMAIL: &str = "ops@utpfund.live";
/// Password the mock accepts at login.
pub const ADMIN_PASSWORD: &str = "correct horse battery";
/// Token the mock issues at login.
pub const ISSUED_TOKEN: &str = "tok-issued";

/// One mutating request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAction {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

impl RecordedAction {
    fn new(method: &str, path: String, body: Option<Json<Value>>) -> Self {
        Self {
            method: method.to_string(),
            path,
            body: body.map(|Json(value)| value),
        }
    }
}

/// Server-side state of the mock platform.
#[derive(Debug, Default)]
pub struct MockState {
    /// Bearer token the mock accepts; anything else gets 401.
    pub valid_token: Option<String>,
    pub withdrawals: Vec<Value>,
    pub deposits: Vec<Value>,
    pub transactions: Vec<Value>,
    pub color_rooms: Vec<Value>,
    pub number_rooms: Vec<Value>,
    /// Authenticated list fetches, by path.
    pub fetches: HashMap<String, usize>,
    /// Mutating requests, in arrival order.
    pub actions: Vec<RecordedAction>,
    /// Requests answered with 401.
    pub rejected_tokens: usize,
}

type Shared = Arc<Mutex<MockState>>;

/// A running mock of the platform API.
pub struct MockApi {
    base_url: Url,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockApi {
    /// Start the mock on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(state: MockState) -> std::io::Result<Self> {
        let state: Shared = Arc::new(Mutex::new(state));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let app = router(Arc::clone(&state));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/api"))
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    /// API root to configure the gateway with.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Lock the server-side state for inspection or changes.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }

    /// Authenticated fetches of `path` so far (e.g. `admin/withdrawals`).
    #[must_use]
    pub fn fetch_count(&self, path: &str) -> usize {
        self.state().fetches.get(path).copied().unwrap_or(0)
    }

    /// A gateway pointed at this mock using `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn gateway(&self, session: SessionStore) -> Result<Gateway, reqwest::Error> {
        Gateway::new(&ApiConfig::new(self.base_url.clone()), session)
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// An admin identity as the mock issues it.
#[must_use]
pub fn ops_admin() -> AdminIdentity {
    AdminIdentity {
        id: AdminId::new("a1"),
        name: "Ops Desk".to_string(),
        email: ADMIN_EMAIL.to_string(),
        role: "admin".to_string(),
    }
}

/// An in-memory session already holding `token`.
///
/// # Errors
///
/// Never fails for in-memory storage; the signature mirrors `SessionStore::set`.
pub fn session_with(token: &str) -> Result<SessionStore, utpfund_admin::session::SessionError> {
    let session = SessionStore::in_memory();
    session.set(SecretString::from(token.to_string()), ops_admin())?;
    Ok(session)
}

/// A pending withdrawal as the platform lists it.
#[must_use]
pub fn withdrawal(id: &str, name: &str, amount: u32) -> Value {
    json!({
        "id": id,
        "userId": format!("u-{id}"),
        "userName": name,
        "userEmail": format!("{}@mail.test", name.to_lowercase().replace(' ', ".")),
        "amount": amount,
        "upiId": format!("{}@upi", name.to_lowercase().replace(' ', "")),
        "status": "pending",
        "createdAt": "2025-01-04T10:00:00Z"
    })
}

/// A pending deposit as the platform lists it.
#[must_use]
pub fn deposit(id: &str, name: &str, amount: u32) -> Value {
    json!({
        "id": id,
        "user": {
            "id": format!("u-{id}"),
            "name": name,
            "email": format!("{}@mail.test", name.to_lowercase().replace(' ', "."))
        },
        "amount": amount,
        "status": "pending",
        "requestDate": "2025-01-04T10:00:00Z"
    })
}

/// A ledger entry as the platform lists it.
#[must_use]
pub fn transaction(id: &str, kind: &str, amount: i64) -> Value {
    json!({
        "_id": id,
        "userId": { "_id": "u1", "name": "Asha Rao", "email": "asha@mail.test" },
        "type": kind,
        "amount": amount,
        "walletType": "normal",
        "status": "completed",
        "createdAt": "2025-01-04T10:00:00Z"
    })
}

/// A ledger entry whose user has since been deleted.
#[must_use]
pub fn orphan_transaction(id: &str, kind: &str, amount: i64) -> Value {
    let mut entry = transaction(id, kind, amount);
    entry["userId"] = Value::Null;
    entry
}

/// A color game room as the platform lists it.
#[must_use]
pub fn color_room(room_id: &str, status: &str) -> Value {
    json!({
        "id": format!("db-{room_id}"),
        "roomId": room_id,
        "entryFee": 50,
        "benefitFeeMultiplier": 1,
        "winningAmount": 100,
        "maxPlayers": 3,
        "currentPlayers": 0,
        "availableColors": ["red", "green", "blue", "yellow"],
        "status": status,
        "createdAt": "2025-01-04T10:00:00Z"
    })
}

/// A number game room as the platform lists it.
#[must_use]
pub fn number_room(room_id: &str, status: &str) -> Value {
    json!({
        "id": format!("db-{room_id}"),
        "roomId": room_id,
        "entryFee": 50,
        "winningMultiplier": 2,
        "maxPlayers": 10,
        "currentPlayers": 4,
        "bigPlayers": 3,
        "smallPlayers": 1,
        "status": status,
        "winningType": null,
        "createdAt": "2025-01-04T10:00:00Z"
    })
}

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/withdrawals", get(list_withdrawals))
        .route("/api/admin/withdrawal/{id}/approve", post(approve_withdrawal))
        .route("/api/admin/withdrawal/{id}/reject", post(reject_withdrawal))
        .route("/api/admin/deposit-requests", get(list_deposits))
        .route("/api/admin/deposit-request/{id}/approve", post(approve_deposit))
        .route("/api/admin/transactions", get(list_transactions))
        .route("/api/admin/game/rooms", get(list_color_rooms))
        .route("/api/admin/number-game/rooms", get(list_number_rooms))
        .route("/api/admin/number-game/room/{id}/close", post(close_number_room))
        .route("/api/admin/number-game/room/{id}/details", get(number_room_details))
        .route(
            "/api/admin/number-game/room/{id}",
            put(update_number_room).delete(delete_number_room),
        )
        .route("/api/admin/dashboard/stats", get(dashboard_stats))
        .route("/api/admin/dashboard/financial-overview", get(financial_overview))
        .with_state(state)
}

/// Check the bearer token; counts and answers rejections.
fn authorize(state: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let mut state = lock(state);
    if presented.is_some() && presented == state.valid_token.as_deref() {
        return Ok(());
    }
    state.rejected_tokens += 1;
    Err((
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Token expired" })),
    )
        .into_response())
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    if email != Some(ADMIN_EMAIL) || password != Some(ADMIN_PASSWORD) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid email or password" })),
        )
            .into_response();
    }

    lock(&state).valid_token = Some(ISSUED_TOKEN.to_string());
    let admin = ops_admin();
    Json(json!({
        "success": true,
        "token": ISSUED_TOKEN,
        "admin": {
            "_id": admin.id.as_str(),
            "name": admin.name,
            "email": admin.email,
            "role": admin.role
        }
    }))
    .into_response()
}

fn list(
    state: &Shared,
    headers: &HeaderMap,
    path: &str,
    key: &str,
    records: fn(&MockState) -> &Vec<Value>,
) -> Response {
    if let Err(response) = authorize(state, headers) {
        return response;
    }
    let mut state = lock(state);
    *state.fetches.entry(path.to_string()).or_default() += 1;
    let items = records(&state).clone();
    Json(json!({ "success": true, key: items })).into_response()
}

async fn list_withdrawals(State(state): State<Shared>, headers: HeaderMap) -> Response {
    list(&state, &headers, "admin/withdrawals", "withdrawals", |s| &s.withdrawals)
}

async fn list_deposits(State(state): State<Shared>, headers: HeaderMap) -> Response {
    list(&state, &headers, "admin/deposit-requests", "depositRequests", |s| &s.deposits)
}

async fn list_transactions(State(state): State<Shared>, headers: HeaderMap) -> Response {
    list(&state, &headers, "admin/transactions", "transactions", |s| &s.transactions)
}

async fn list_color_rooms(State(state): State<Shared>, headers: HeaderMap) -> Response {
    list(&state, &headers, "admin/game/rooms", "gameRooms", |s| &s.color_rooms)
}

async fn list_number_rooms(State(state): State<Shared>, headers: HeaderMap) -> Response {
    list(&state, &headers, "admin/number-game/rooms", "gameRooms", |s| &s.number_rooms)
}

/// Record a decision and move the matching record to `status`.
fn decide(
    state: &Shared,
    headers: &HeaderMap,
    action: RecordedAction,
    records: fn(&mut MockState) -> &mut Vec<Value>,
    id: &str,
    status: &str,
    message: &str,
) -> Response {
    if let Err(response) = authorize(state, headers) {
        return response;
    }
    let mut state = lock(state);
    state.actions.push(action);

    let Some(record) = records(&mut *state)
        .iter_mut()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Request not found" })),
        )
            .into_response();
    };

    if record.get("status").and_then(Value::as_str) != Some("pending") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Request already processed" })),
        )
            .into_response();
    }
    record["status"] = json!(status);
    Json(json!({ "success": true, "message": message })).into_response()
}

async fn approve_withdrawal(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    decide(
        &state,
        &headers,
        RecordedAction::new("POST", format!("admin/withdrawal/{id}/approve"), body),
        |s| &mut s.withdrawals,
        &id,
        "approved",
        "Withdrawal approved",
    )
}

async fn reject_withdrawal(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    decide(
        &state,
        &headers,
        RecordedAction::new("POST", format!("admin/withdrawal/{id}/reject"), body),
        |s| &mut s.withdrawals,
        &id,
        "rejected",
        "Withdrawal rejected",
    )
}

async fn approve_deposit(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    decide(
        &state,
        &headers,
        RecordedAction::new("POST", format!("admin/deposit-request/{id}/approve"), body),
        |s| &mut s.deposits,
        &id,
        "approved",
        "Deposit approved and wallet credited",
    )
}

async fn dashboard_stats(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    Json(json!({
        "success": true,
        "dashboardStats": {
            "users": {
                "total": 120,
                "playing": 45,
                "notPlaying": 75,
                "recentUsers": [
                    { "_id": "u9", "name": "Kiran", "email": "kiran@mail.test", "createdAt": "2025-01-03T08:00:00Z" }
                ]
            },
            "games": {
                "colorPrediction": { "count": 30, "percentage": "60.00" },
                "numberPrediction": { "count": 20, "percentage": "40.00" },
                "mostPlayed": "Color Prediction"
            },
            "finance": { "totalDeposits": 50000, "totalWithdrawals": 20000, "revenue": 30000 },
            "userGrowth": []
        }
    }))
    .into_response()
}

async fn financial_overview(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    Json(json!({
        "success": true,
        "period": { "from": "2025-01-01", "to": "2025-01-31", "label": "January 2025" },
        "overview": {
            "totalDeposits": 50000,
            "depositCount": 80,
            "totalWithdrawals": 20000,
            "withdrawalCount": 25,
            "netRevenue": 30000,
            "profitMargin": "60.00"
        },
        "dailyTransactions": []
    }))
    .into_response()
}

fn room_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Room not found" })),
    )
        .into_response()
}

/// Authorize, record the action and find the number room addressed by `id`.
fn number_room_action<'a>(
    state: &'a Shared,
    headers: &HeaderMap,
    action: RecordedAction,
    id: &str,
) -> Result<(MutexGuard<'a, MockState>, usize), Response> {
    authorize(state, headers)?;
    let mut state = lock(state);
    state.actions.push(action);
    let index = state
        .number_rooms
        .iter()
        .position(|room| room.get("roomId").and_then(Value::as_str) == Some(id))
        .ok_or_else(room_not_found)?;
    Ok((state, index))
}

async fn close_number_room(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let action = RecordedAction::new("POST", format!("admin/number-game/room/{id}/close"), body);
    let (mut state, index) = match number_room_action(&state, &headers, action, &id) {
        Ok(found) => found,
        Err(response) => return response,
    };
    let Some(room) = state.number_rooms.get_mut(index) else {
        return room_not_found();
    };
    if room.get("status").and_then(Value::as_str) == Some("closed") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Room is already closed" })),
        )
            .into_response();
    }
    room["status"] = json!("closed");
    Json(json!({ "success": true, "message": "Room closed successfully" })).into_response()
}

async fn delete_number_room(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let action = RecordedAction::new("DELETE", format!("admin/number-game/room/{id}"), body);
    let (mut state, index) = match number_room_action(&state, &headers, action, &id) {
        Ok(found) => found,
        Err(response) => return response,
    };
    state.number_rooms.remove(index);
    Json(json!({ "success": true, "message": "Room deleted successfully" })).into_response()
}

async fn update_number_room(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let action = RecordedAction::new("PUT", format!("admin/number-game/room/{id}"), body);
    let patch = action.body.clone();
    let (mut state, index) = match number_room_action(&state, &headers, action, &id) {
        Ok(found) => found,
        Err(response) => return response,
    };
    let (Some(room), Some(Value::Object(fields))) =
        (state.number_rooms.get_mut(index).and_then(Value::as_object_mut), patch)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Nothing to update" })),
        )
            .into_response();
    };
    room.extend(fields);
    Json(json!({ "success": true, "message": "Room updated successfully" })).into_response()
}

async fn number_room_details(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }
    let state = lock(&state);
    let Some(room) = state
        .number_rooms
        .iter()
        .find(|room| room.get("roomId").and_then(Value::as_str) == Some(id.as_str()))
    else {
        return room_not_found();
    };
    Json(json!({
        "success": true,
        "room": room,
        "bets": [],
        "totalBetAmount": 0
    }))
    .into_response()
}
