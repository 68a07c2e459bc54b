//! sporlwatch library
//!
//! Watches a list of Spotify artists and announces their new releases. The
//! core is a small sync engine: one rate-limited HTTP client shared by every
//! remote call, a token manager that keeps a client-credentials token fresh,
//! a release poller that compares each artist's releases against a stored
//! checkpoint, and a scheduler that runs token refresh and release checks on
//! two independent timers.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the optional status server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from the environment and `.env`
//! - `engine` - Wiring of client, token manager, poller and scheduler
//! - `error` - Error types of the engine
//! - `logging` - tracing subscriber setup
//! - `management` - Token manager, poller, scheduler and the local store
//! - `notifications` - Desktop notifications for new releases
//! - `server` - Local HTTP server for `/health` and `/status`
//! - `spotify` - Rate-limited Spotify Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Release date handling and formatting helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sporlwatch::{config::{self, SyncConfig}, engine::SyncEngine, management::JsonStore};
//! use sporlwatch::notifications::DesktopNotifier;
//!
//! #[tokio::main]
//! async fn main() -> sporlwatch::Res<()> {
//!     config::load_env().await?;
//!     let store = Arc::new(JsonStore::load().await?);
//!     let engine = SyncEngine::new(SyncConfig::from_env(), store, Arc::new(DesktopNotifier::default()))?;
//!     let report = engine.poller().poll_once().await?;
//!     println!("{} new releases", report.notified);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod management;
pub mod notifications;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the edges of the application (CLI, status server) where the
/// exact error type no longer matters. The engine itself returns the typed
/// errors from [`error`].
///
/// # Example
///
/// ```
/// use sporlwatch::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Watching {} artists", count);
/// info!("Press Ctrl-C to stop");
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Credentials are valid");
/// success!("Stopped tracking {}", id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Cannot open local store");
/// error!("Cannot load artist {}. Err: {}", id, e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("No artists tracked yet");
/// warning!("{} is already tracked", id);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
