//! # API Module
//!
//! HTTP endpoints of the optional status server started by `sporlwatch run`.
//!
//! ## Endpoints
//!
//! - [`health`] - liveness probe returning the crate version
//! - [`status`] - the report of the last finished release check, shared with
//!   the [`Scheduler`](crate::management::Scheduler) through a
//!   [`LastReport`](crate::management::LastReport) handle
//!
//! Both are read-only. The server never triggers a check or touches the
//! store, it only mirrors what the scheduler already did.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use sporlwatch::api::{health, status};
//!
//! let app = Router::new()
//!     .route("/health", get(health))
//!     .route("/status", get(status).layer(Extension(scheduler.report_handle())));
//! ```

mod health;
mod status;

pub use health::health;
pub use status::status;
