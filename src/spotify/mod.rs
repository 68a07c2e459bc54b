//! # Spotify Integration Module
//!
//! This module is the HTTP layer between sporlwatch and the Spotify APIs. It
//! owns the rate-limited client every request goes through, the wire-level
//! token request and the catalog queries used by the release poller and the
//! CLI lookups.
//!
//! ## Architecture
//!
//! ```text
//! Management Layer (TokenManager, ReleasePoller, CLI)
//!          ↓
//! Catalog Queries (search, artists, albums, tracks) / Token Request (auth)
//!          ↓
//! ApiClient (shared RateLimiter, retry on 429 and transport failures)
//!          ↓
//! Spotify Web API / Accounts API
//! ```
//!
//! ## Rate Limiting
//!
//! A single [`limiter::RateLimiter`] is shared by every caller of the client,
//! no matter which operation issued the request. Its default cadence is one
//! request per second with a burst of two. The wait for a slot can be
//! cancelled through a [`tokio_util::sync::CancellationToken`].
//!
//! ## Error Handling
//!
//! - **429 Too Many Requests**: sleeps for `Retry-After` (one second if the
//!   header is missing) and retries, at most three attempts in total, then
//!   fails with [`crate::error::ClientError::RateLimited`].
//! - **Transport failures**: retried within the same attempt budget, then
//!   surfaced as [`crate::error::ClientError::Network`] with the last error.
//! - **401**: [`crate::error::ClientError::Unauthorized`].
//! - **Other non-2xx**: the status is surfaced verbatim as
//!   [`crate::error::ClientError::ServerError`].
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client-credentials token request
//! - `GET /search` - albums, artists and tracks
//! - `GET /artists/{id}` and `GET /artists/{id}/albums` - artist detail and
//!   latest releases
//! - `GET /albums/{id}` - album detail with tracks
//! - `GET /tracks/{id}` - track detail

pub mod albums;
pub mod artists;
pub mod auth;
pub mod client;
pub mod limiter;
pub mod search;
pub mod tracks;

pub use client::ApiClient;
pub use limiter::RateLimiter;
