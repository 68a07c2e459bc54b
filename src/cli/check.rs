use tabled::Table;

use crate::{
    error, info, success,
    types::{EntityErrorRow, PollReport},
    utils, warning,
};

/// Runs a single release check over every tracked artist and prints the
/// outcome. Checkpoints advance exactly as they would under `run`.
pub async fn check() {
    let engine = super::open_engine().await;

    let pb = super::spinner("Checking tracked artists for new releases...");
    let result = engine.poller().poll_once().await;
    pb.finish_and_clear();

    match result {
        Ok(report) => print_report(&report),
        Err(e) => error!("Release check failed. Err: {}", e),
    }
}

fn print_report(report: &PollReport) {
    if report.checked == 0 && report.errors.is_empty() {
        info!("No artists tracked. Add some with sporlwatch artists add <ID>");
        return;
    }

    success!(
        "Checked {} artists at {}, {} new releases",
        report.checked,
        utils::format_timestamp(report.started_at),
        report.notified
    );

    if report.errors.is_empty() {
        return;
    }

    warning!("{} artists could not be checked:", report.errors.len());
    let rows: Vec<EntityErrorRow> = report
        .errors
        .iter()
        .map(|e| EntityErrorRow {
            id: e.id.clone(),
            cause: e.cause.to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));
}
