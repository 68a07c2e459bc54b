use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::management::LastReport;

/// Outcome of the most recent release check, `null` before the first one
/// has finished.
pub async fn status(Extension(report): Extension<LastReport>) -> Json<Value> {
    let last_report = report.load_full();
    Json(json!({ "last_report": last_report.as_deref() }))
}
