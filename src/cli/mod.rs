//! # CLI Module
//!
//! User-facing commands of sporlwatch. Each command builds what it needs
//! from the local store and the environment, runs, prints its result with
//! the colored output macros and returns. Fatal problems end the process
//! through [`error!`](crate::error!).
//!
//! ## Commands
//!
//! ### Sync engine
//!
//! - [`run`] - starts the scheduler (token refresh + release check) and
//!   keeps it running until Ctrl-C, optionally serving `/health` and
//!   `/status`
//! - [`check`] - a single release check with a summary table
//!
//! ### Tracked artists
//!
//! - [`list_artists`] - shows every tracked artist and its checkpoint
//! - [`add_artist`] - starts tracking an artist, its checkpoint begins now
//! - [`remove_artist`] - stops tracking an artist
//!
//! ### Catalog lookups
//!
//! - [`search`] - searches artists, albums and tracks
//! - [`lookup_artist`], [`lookup_album`], [`lookup_track`] - details by id
//!
//! ### Credentials
//!
//! - [`set_credentials`] - validates and stores a client id and secret
//! - [`verify_credentials`] - acquires a token with whatever is configured
//!
//! All commands that reach the remote API go through one
//! [`SyncEngine`](crate::engine::SyncEngine), so they share its rate limiter
//! and token manager.
//!
//! ## Usage Patterns
//!
//! ```bash
//! sporlwatch credentials set --client-id <ID> --client-secret <SECRET>
//! sporlwatch artists add 0OdUWJ0sBjDrqHygGUXeCF
//! sporlwatch check
//! sporlwatch run
//! ```

mod artists;
mod check;
mod credentials;
mod lookup;
mod run;
mod search;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::SyncConfig,
    engine::SyncEngine,
    error,
    management::JsonStore,
    notifications::DesktopNotifier,
    types::AccessToken,
};

pub use artists::add_artist;
pub use artists::list_artists;
pub use artists::remove_artist;
pub use check::check;
pub use credentials::set_credentials;
pub use credentials::verify_credentials;
pub use lookup::lookup_album;
pub use lookup::lookup_artist;
pub use lookup::lookup_track;
pub use run::run;
pub use search::search;

async fn load_store() -> Arc<JsonStore> {
    match JsonStore::load().await {
        Ok(store) => Arc::new(store),
        Err(e) => error!("Cannot open local store. Err: {}", e),
    }
}

fn build_engine(store: Arc<JsonStore>) -> SyncEngine {
    match SyncEngine::new(
        SyncConfig::from_env(),
        store,
        Arc::new(DesktopNotifier::default()),
    ) {
        Ok(engine) => engine,
        Err(e) => error!("Cannot create http client. Err: {}", e),
    }
}

async fn open_engine() -> SyncEngine {
    build_engine(load_store().await)
}

async fn access_token(engine: &SyncEngine) -> AccessToken {
    match engine.tokens().ensure_fresh_token().await {
        Ok(token) => token,
        Err(e) => error!(
            "Cannot get an access token. Run sporlwatch credentials set\n Error: {}",
            e
        ),
    }
}

fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
