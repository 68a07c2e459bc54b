//! Wiring of the sync engine.
//!
//! [`SyncEngine`] builds the one rate-limited client, the one token manager
//! and the release poller on top of them, and hands out a [`Scheduler`] that
//! drives both periodic timers. Everything that talks to the remote API in
//! this process goes through the same client, so the request cadence holds
//! across the scheduler and any ad-hoc lookup.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = Arc::new(JsonStore::load().await?);
//! let engine = SyncEngine::new(SyncConfig::from_env(), store, Arc::new(DesktopNotifier::default()))?;
//!
//! let mut scheduler = engine.scheduler();
//! scheduler.start();
//! tokio::signal::ctrl_c().await?;
//! scheduler.stop().await;
//! ```

use std::sync::Arc;

use crate::{
    config::SyncConfig,
    error::ClientError,
    management::{ReleasePoller, Scheduler, SyncStore, TokenManager},
    notifications::Notifier,
    spotify::ApiClient,
};

pub struct SyncEngine {
    config: SyncConfig,
    client: Arc<ApiClient>,
    tokens: Arc<TokenManager>,
    poller: Arc<ReleasePoller>,
}

impl SyncEngine {
    pub fn new(
        config: SyncConfig,
        store: Arc<dyn SyncStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let client = Arc::new(ApiClient::new(config.client.clone())?);
        let tokens = Arc::new(TokenManager::new(
            Arc::clone(&client),
            Arc::clone(&store),
            config.schedule.token_url.clone(),
            config.schedule.token_lead,
        ));
        let poller = Arc::new(ReleasePoller::new(
            Arc::clone(&client),
            Arc::clone(&tokens),
            store,
            notifier,
        ));

        Ok(Self {
            config,
            client,
            tokens,
            poller,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn poller(&self) -> &Arc<ReleasePoller> {
        &self.poller
    }

    /// A stopped scheduler over this engine's token manager and poller.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            Arc::clone(&self.tokens),
            Arc::clone(&self.poller),
            &self.config.schedule,
        )
    }
}
