use std::{sync::Arc, time::Duration};

use arc_swap::ArcSwapOption;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::ScheduleConfig,
    management::{auth::TokenManager, poller::ReleasePoller},
    types::PollReport,
};

/// Report of the most recent finished pass, shared with the status server.
pub type LastReport = Arc<ArcSwapOption<PollReport>>;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Drives the token refresh timer and the release poll timer.
///
/// Both timers start together and stop together. The poll timer fires right
/// away on start, so a fresh process does not wait a full interval for its
/// first check.
pub struct Scheduler {
    tokens: Arc<TokenManager>,
    poller: Arc<ReleasePoller>,
    token_refresh_interval: Duration,
    poll_interval: Duration,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    last_report: LastReport,
}

impl Scheduler {
    pub fn new(
        tokens: Arc<TokenManager>,
        poller: Arc<ReleasePoller>,
        config: &ScheduleConfig,
    ) -> Self {
        Self {
            tokens,
            poller,
            token_refresh_interval: config.token_refresh_interval.max(MIN_PERIOD),
            poll_interval: config.poll_interval.max(MIN_PERIOD),
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
            last_report: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Spawns both timers. Must be called inside a tokio runtime; calling it
    /// while already running does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            tracing::warn!("scheduler already running");
            return;
        }

        self.cancel = CancellationToken::new();

        self.tasks.push(tokio::spawn(run_token_refresh(
            Arc::clone(&self.tokens),
            self.token_refresh_interval,
            self.cancel.clone(),
        )));
        self.tasks.push(tokio::spawn(run_release_poll(
            Arc::clone(&self.poller),
            self.poll_interval,
            self.cancel.clone(),
            Arc::clone(&self.last_report),
        )));

        tracing::info!(
            "scheduler started (token refresh every {:?}, release check every {:?})",
            self.token_refresh_interval,
            self.poll_interval
        );
    }

    /// Stops both timers and waits for them to wind down.
    ///
    /// A pass that is already running finishes the artist it is on; requests
    /// still queued on the rate limiter are abandoned. Stopping twice is
    /// harmless.
    pub async fn stop(&mut self) {
        if !self.is_running() {
            return;
        }

        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!("scheduler task ended abnormally: {}", e);
            }
        }

        tracing::info!("scheduler stopped");
    }

    pub fn last_report(&self) -> Option<Arc<PollReport>> {
        self.last_report.load_full()
    }

    pub fn report_handle(&self) -> LastReport {
        Arc::clone(&self.last_report)
    }

    /// Token that fires when the current run is stopped.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_token_refresh(tokens: Arc<TokenManager>, period: Duration, cancel: CancellationToken) {
    // the first pass acquires a token anyway, start one period later
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match tokens.ensure_fresh_token().await {
            Ok(token) => tracing::debug!("token refresh tick, valid until {}", token.expires_at),
            Err(e) => tracing::warn!("token refresh failed: {}", e),
        }
    }

    tracing::debug!("token refresh timer stopped");
}

async fn run_release_poll(
    poller: Arc<ReleasePoller>,
    period: Duration,
    cancel: CancellationToken,
    last_report: LastReport,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match poller.poll_cancellable(&cancel).await {
            Ok(report) => last_report.store(Some(Arc::new(report))),
            Err(e) => tracing::warn!("release check failed: {}", e),
        }
    }

    tracing::debug!("release poll timer stopped");
}
