//! Configuration management for sporlwatch.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Every setting has a default, so a bare
//! environment yields a working configuration against the public Spotify API.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const APP_DIR: &str = "sporlwatch";

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from `<data_local_dir>/sporlwatch/.env`.
///
/// The directory is created if needed. A missing `.env` file is not an error,
/// everything can also be passed through the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/sporlwatch/.env`
/// - macOS: `~/Library/Application Support/sporlwatch/.env`
/// - Windows: `%LOCALAPPDATA%/sporlwatch/.env`
pub async fn load_env() -> Result<(), String> {
    let path = app_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("cannot parse {}: {}", path.display(), e)),
    }
}

/// Platform specific directory holding `.env` and `store.json`.
pub fn app_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

pub fn store_path() -> PathBuf {
    app_dir().join("store.json")
}

/// Base URL of the Spotify Web API, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// URL of the client-credentials token endpoint.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Client id used when the store holds none.
pub fn spotify_client_id() -> Option<String> {
    non_empty_var("SPOTIFY_CLIENT_ID")
}

/// Client secret used when the store holds none. Never log this value.
pub fn spotify_client_secret() -> Option<String> {
    non_empty_var("SPOTIFY_CLIENT_SECRET")
}

/// Address of the local status server. Unset means no server.
pub fn server_addr() -> Option<String> {
    non_empty_var("SERVER_ADDRESS")
}

/// Settings of the rate-limited client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    /// Steady-state spacing between requests.
    pub request_interval: Duration,
    /// Requests that may go out back to back after an idle period.
    pub burst: u32,
    /// Total attempts per call, first one included.
    pub max_attempts: u32,
    /// Used when a 429 carries no `Retry-After` header.
    pub default_retry_after: Duration,
    /// A server hint above this gives up immediately.
    pub max_retry_after: Duration,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_interval: Duration::from_secs(1),
            burst: 2,
            max_attempts: 3,
            default_retry_after: Duration::from_secs(1),
            max_retry_after: Duration::from_secs(120),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Settings of the token manager and the two periodic timers.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub token_url: String,
    /// Refresh this long before the token actually expires.
    pub token_lead: Duration,
    pub token_refresh_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            token_lead: Duration::from_secs(5 * 60),
            token_refresh_interval: Duration::from_secs(55 * 60),
            poll_interval: Duration::from_secs(5 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    pub client: ClientConfig,
    pub schedule: ScheduleConfig,
}

impl SyncConfig {
    /// Builds the configuration from the environment, falling back to the
    /// defaults for anything unset or malformed.
    pub fn from_env() -> Self {
        let client_defaults = ClientConfig::default();
        let schedule_defaults = ScheduleConfig::default();

        let request_interval = request_interval_for(
            parse_var("SPORLWATCH_REQUESTS_PER_SECOND", 1.0),
            client_defaults.request_interval,
        );

        let client = ClientConfig {
            api_url: spotify_apiurl(),
            request_interval,
            burst: parse_var("SPORLWATCH_BURST", client_defaults.burst).max(1),
            max_attempts: parse_var("SPORLWATCH_MAX_ATTEMPTS", client_defaults.max_attempts)
                .max(1),
            timeout: secs_var("SPORLWATCH_HTTP_TIMEOUT_SECS", client_defaults.timeout),
            ..client_defaults
        };

        let schedule = ScheduleConfig {
            token_url: spotify_apitoken_url(),
            token_lead: secs_var("SPORLWATCH_TOKEN_LEAD_SECS", schedule_defaults.token_lead),
            token_refresh_interval: secs_var(
                "SPORLWATCH_TOKEN_REFRESH_SECS",
                schedule_defaults.token_refresh_interval,
            ),
            poll_interval: secs_var("SPORLWATCH_POLL_INTERVAL_SECS", schedule_defaults.poll_interval),
        };

        Self { client, schedule }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Spacing between requests for a rate given in requests per second.
///
/// Rates that are not positive, or too small to express as a [`Duration`],
/// fall back to `default`.
pub fn request_interval_for(requests_per_second: f64, default: Duration) -> Duration {
    let interval = if requests_per_second > 0.0 {
        Duration::try_from_secs_f64(1.0 / requests_per_second).ok()
    } else {
        None
    };

    interval.unwrap_or_else(|| {
        tracing::warn!(
            "SPORLWATCH_REQUESTS_PER_SECOND must be a usable positive rate, using {:?}",
            default
        );
        default
    })
}

fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match non_empty_var(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring malformed {}={:?}, using {:?}", key, raw, default);
            default
        }),
        None => default,
    }
}

fn secs_var(key: &str, default: Duration) -> Duration {
    match non_empty_var(key) {
        Some(_) => Duration::from_secs(parse_var(key, default.as_secs())),
        None => default,
    }
}
