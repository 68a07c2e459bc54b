use crate::{config, error, info, management::SyncStore, server, success, warning};

/// Runs the scheduler until Ctrl-C.
///
/// When `SERVER_ADDRESS` is set, `/health` and `/status` are served on it
/// for as long as the scheduler runs.
pub async fn run() {
    let store = super::load_store().await;
    match store.get_tracked_entities().await {
        Ok(entities) if entities.is_empty() => {
            warning!("No artists tracked yet. Add some with sporlwatch artists add <ID>")
        }
        Ok(entities) => info!("Watching {} artists", entities.len()),
        Err(e) => error!("Cannot read tracked artists. Err: {}", e),
    }

    if !store.has_credentials().await {
        warning!("No credentials configured. Run sporlwatch credentials set");
    }

    let engine = super::build_engine(store);
    let mut scheduler = engine.scheduler();
    scheduler.start();

    let server_task = config::server_addr().map(|addr| {
        let report = scheduler.report_handle();
        let shutdown = scheduler.shutdown_token();
        info!("Status server on http://{}", addr);
        tokio::spawn(async move {
            if let Err(e) = server::start_status_server(&addr, report, shutdown).await {
                warning!("Status server stopped. Err: {}", e);
            }
        })
    });

    info!("Press Ctrl-C to stop");
    shutdown_signal().await;

    info!("Stopping, waiting for the current check to finish...");
    scheduler.stop().await;
    if let Some(task) = server_task {
        if let Err(e) = task.await {
            warning!("Status server task ended abnormally. Err: {}", e);
        }
    }

    match scheduler.last_report() {
        Some(report) => success!(
            "Stopped. Last check: {} artists checked, {} new releases, {} failed",
            report.checked,
            report.notified,
            report.errors.len()
        ),
        None => success!("Stopped before the first check finished"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warning!("Cannot listen for Ctrl-C. Err: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warning!("Cannot listen for SIGTERM. Err: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
