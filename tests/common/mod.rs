#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicI64, AtomicU16, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde_json::json;

use sporlwatch::{
    config::{ClientConfig, ScheduleConfig},
    error::{NotifyError, StoreError},
    management::SyncStore,
    notifications::Notifier,
    types::{Credentials, TrackedEntity},
};

/// Canned artist served by the stub.
#[derive(Debug, Clone, Default)]
pub struct StubArtist {
    pub name: String,
    /// `(album name, release date)`
    pub albums: Vec<(String, String)>,
    /// Answer every request for this artist with this status.
    pub fail_status: Option<u16>,
}

impl StubArtist {
    pub fn new(name: &str, albums: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            albums: albums
                .iter()
                .map(|(n, d)| (n.to_string(), d.to_string()))
                .collect(),
            fail_status: None,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct StubState {
    pub token_requests: AtomicUsize,
    pub token_status: AtomicU16,
    pub token_delay: Mutex<Duration>,
    pub expires_in: AtomicI64,
    pub artists: Mutex<HashMap<String, StubArtist>>,
    /// `(status, retry-after)` answers of `/v1/scripted`, 200 once drained.
    pub scripted: Mutex<VecDeque<(u16, Option<u64>)>>,
    pub scripted_hits: AtomicUsize,
    /// Same as `scripted`, answered by the token endpoint before issuing.
    pub token_script: Mutex<VecDeque<(u16, Option<u64>)>>,
    pub artist_requests: AtomicUsize,
}

impl StubState {
    pub fn add_artist(&self, id: &str, artist: StubArtist) {
        self.artists.lock().unwrap().insert(id.to_string(), artist);
    }

    pub fn script(&self, answers: &[(u16, Option<u64>)]) {
        self.scripted.lock().unwrap().extend(answers.iter().copied());
    }

    pub fn script_token(&self, answers: &[(u16, Option<u64>)]) {
        self.token_script
            .lock()
            .unwrap()
            .extend(answers.iter().copied());
    }

    pub fn set_token_delay(&self, delay: Duration) {
        *self.token_delay.lock().unwrap() = delay;
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn artist_requests(&self) -> usize {
        self.artist_requests.load(Ordering::SeqCst)
    }
}

/// Local stand-in for the accounts and web APIs.
pub struct Stub {
    pub addr: SocketAddr,
    pub state: Arc<StubState>,
}

impl Stub {
    pub async fn start() -> Self {
        let state = Arc::new(StubState {
            token_status: AtomicU16::new(200),
            expires_in: AtomicI64::new(3600),
            ..StubState::default()
        });

        let app = Router::new()
            .route("/token", post(token))
            .route("/v1/scripted", get(scripted))
            .route("/v1/artists/{id}", get(artist))
            .route("/v1/artists/{id}/albums", get(artist_albums))
            .route("/v1/search", get(search))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn token_url(&self) -> String {
        format!("http://{}/token", self.addr)
    }

    /// Client settings fast enough for tests.
    pub fn client_config(&self) -> ClientConfig {
        fast_client_config(self.api_url())
    }

    pub fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig {
            token_url: self.token_url(),
            ..ScheduleConfig::default()
        }
    }
}

pub fn fast_client_config(api_url: String) -> ClientConfig {
    ClientConfig {
        api_url,
        request_interval: Duration::from_millis(1),
        burst: 100,
        max_attempts: 3,
        default_retry_after: Duration::from_millis(10),
        max_retry_after: Duration::from_secs(120),
        timeout: Duration::from_secs(5),
    }
}

async fn token(
    State(state): State<Arc<StubState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let n = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;

    let delay = *state.token_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    if form.get("grant_type").map(String::as_str) != Some("client_credentials")
        || form.get("client_id").map(String::as_str) == Some("bad")
    {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid_client"})))
            .into_response();
    }

    let next = state.token_script.lock().unwrap().pop_front();
    if let Some(res) = scripted_failure(next) {
        return res;
    }

    let status = state.token_status.load(Ordering::SeqCst);
    if status != 200 {
        return StatusCode::from_u16(status).unwrap().into_response();
    }

    Json(json!({
        "access_token": format!("token-{}", n),
        "token_type": "Bearer",
        "expires_in": state.expires_in.load(Ordering::SeqCst),
    }))
    .into_response()
}

async fn scripted(State(state): State<Arc<StubState>>) -> Response {
    state.scripted_hits.fetch_add(1, Ordering::SeqCst);
    let next = state.scripted.lock().unwrap().pop_front();

    scripted_failure(next).unwrap_or_else(|| Json(json!({"ok": true})).into_response())
}

fn scripted_failure(next: Option<(u16, Option<u64>)>) -> Option<Response> {
    match next {
        None | Some((200, _)) => None,
        Some((status, retry_after)) => {
            let status = StatusCode::from_u16(status).unwrap();
            Some(match retry_after {
                Some(secs) => (status, [(header::RETRY_AFTER, secs.to_string())]).into_response(),
                None => status.into_response(),
            })
        }
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-"))
}

fn lookup(state: &StubState, id: &str, headers: &HeaderMap) -> Result<StubArtist, Response> {
    state.artist_requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(headers) {
        return Err(StatusCode::UNAUTHORIZED.into_response());
    }

    let artist = state.artists.lock().unwrap().get(id).cloned();
    match artist {
        None => Err(StatusCode::NOT_FOUND.into_response()),
        Some(StubArtist {
            fail_status: Some(status),
            ..
        }) => Err(StatusCode::from_u16(status).unwrap().into_response()),
        Some(artist) => Ok(artist),
    }
}

async fn artist(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match lookup(&state, &id, &headers) {
        Ok(artist) => Json(json!({
            "id": id,
            "name": artist.name,
            "genres": ["indie"],
            "popularity": 42,
        }))
        .into_response(),
        Err(res) => res,
    }
}

async fn artist_albums(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match lookup(&state, &id, &headers) {
        Ok(artist) => {
            let items: Vec<_> = artist
                .albums
                .iter()
                .enumerate()
                .map(|(i, (name, date))| {
                    json!({
                        "id": format!("{}-album-{}", id, i),
                        "name": name,
                        "release_date": date,
                        "artists": [{"id": id, "name": artist.name}],
                    })
                })
                .collect();
            let total = items.len();
            Json(json!({"items": items, "next": null, "total": total})).into_response()
        }
        Err(res) => res,
    }
}

async fn search(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!({
        "artists": {"items": [{"id": "a1", "name": "Stub Artist", "genres": []}]},
        "albums": {"items": [{"id": "al1", "name": "Stub Album", "release_date": "2024-01-05"}, 17]},
        "tracks": null,
    }))
    .into_response()
}

/// In-memory [`SyncStore`].
#[derive(Default)]
pub struct MemoryStore {
    pub credentials: Mutex<Credentials>,
    pub entities: Mutex<Vec<TrackedEntity>>,
    pub fail_reads: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn with_credentials() -> Self {
        Self {
            credentials: Mutex::new(Credentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn track(&self, id: &str, last_checked: DateTime<Utc>) {
        self.entities
            .lock()
            .unwrap()
            .push(TrackedEntity::new(id, last_checked));
    }

    pub fn entity(&self, id: &str) -> TrackedEntity {
        self.entities
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl SyncStore for MemoryStore {
    async fn get_credentials(&self) -> Result<Credentials, StoreError> {
        Ok(self.credentials.lock().unwrap().clone())
    }

    async fn get_tracked_entities(&self) -> Result<Vec<TrackedEntity>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::from(std::io::Error::other("disk on fire")));
        }
        Ok(self.entities.lock().unwrap().clone())
    }

    async fn mark_checked(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut entities = self.entities.lock().unwrap();
        match entities.iter_mut().find(|e| e.id == id) {
            Some(entity) => {
                if at > entity.last_checked {
                    entity.last_checked = at;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Notifier that remembers every message.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: std::sync::atomic::AtomicBool,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Failed("exit status: 1".to_string()));
        }
        Ok(())
    }
}
