use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{ClientError, PollError},
    management::{auth::TokenManager, store::SyncStore},
    notifications::{NEW_RELEASE_TITLE, Notifier},
    spotify::{self, ApiClient},
    types::{EntityError, PollReport, ReleaseCandidate, TrackedEntity},
    utils,
};

/// Checks every tracked artist for releases newer than its checkpoint.
pub struct ReleasePoller {
    client: Arc<ApiClient>,
    tokens: Arc<TokenManager>,
    store: Arc<dyn SyncStore>,
    notifier: Arc<dyn Notifier>,
}

impl ReleasePoller {
    pub fn new(
        client: Arc<ApiClient>,
        tokens: Arc<TokenManager>,
        store: Arc<dyn SyncStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            tokens,
            store,
            notifier,
        }
    }

    /// Runs one pass over all tracked artists.
    pub async fn poll_once(&self) -> Result<PollReport, PollError> {
        self.poll_cancellable(&CancellationToken::new()).await
    }

    /// Same as [`poll_once`](Self::poll_once), with a way to stop it early.
    ///
    /// Artists are checked one after another. A failed fetch is recorded in
    /// the report and leaves that artist's checkpoint alone; every artist
    /// that was fetched gets its checkpoint moved to the pass time, whether
    /// or not something new showed up.
    ///
    /// `cancel` only stops requests still waiting for a rate-limit slot. The
    /// pass then ends after the artist being evaluated.
    pub async fn poll_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<PollReport, PollError> {
        let entities = self
            .store
            .get_tracked_entities()
            .await
            .map_err(PollError::Store)?;

        if entities.is_empty() {
            tracing::info!("no artists tracked, nothing to check");
            return Ok(PollReport::empty(Utc::now()));
        }

        let token = self
            .tokens
            .ensure_fresh_token()
            .await
            .map_err(PollError::Token)?;

        let poll_time = Utc::now();
        let mut report = PollReport::empty(poll_time);
        tracing::info!("checking {} artists for new releases", entities.len());

        for entity in &entities {
            if cancel.is_cancelled() {
                tracing::info!("release check cancelled, stopping before {}", entity.id);
                break;
            }

            match self.check_entity(entity, &token.value, cancel).await {
                Ok(notified) => {
                    report.checked += 1;
                    report.notified += notified;
                }
                Err(cause) => {
                    tracing::warn!("cannot check releases of {}: {}", entity.id, cause);
                    report.errors.push(EntityError {
                        id: entity.id.clone(),
                        cause,
                    });
                    continue;
                }
            }

            match self.store.mark_checked(&entity.id, poll_time).await {
                Ok(true) => {}
                Ok(false) => tracing::debug!("{} was removed during the check", entity.id),
                Err(e) => tracing::warn!("cannot update checkpoint of {}: {}", entity.id, e),
            }
        }

        tracing::info!(
            "release check finished: {} checked, {} new, {} failed",
            report.checked,
            report.notified,
            report.errors.len()
        );
        Ok(report)
    }

    /// Fetches an artist's releases and announces the new ones. Returns how
    /// many were announced.
    async fn check_entity(
        &self,
        entity: &TrackedEntity,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<usize, ClientError> {
        tracing::debug!("checking for new releases from artist {}", entity.id);
        let detail =
            spotify::artists::get_artist_details(&self.client, token, &entity.id, cancel).await?;

        let new_releases: Vec<ReleaseCandidate> = detail
            .release_candidates()
            .into_iter()
            .filter(|release| utils::is_new_release(&release.release_date, entity.last_checked))
            .collect();

        for release in &new_releases {
            tracing::info!(
                "new release found for artist {}: {}",
                entity.id,
                release.name
            );
            self.announce(release).await;
        }

        Ok(new_releases.len())
    }

    async fn announce(&self, release: &ReleaseCandidate) {
        let message = format!("{} has released {}", release.artist_name, release.name);
        if let Err(e) = self.notifier.notify(NEW_RELEASE_TITLE, &message).await {
            tracing::warn!("failed to send notification: {}", e);
        }
    }
}
