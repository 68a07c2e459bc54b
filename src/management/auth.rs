use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use arc_swap::ArcSwapOption;
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio_util::sync::CancellationToken;

use crate::{
    error::TokenError,
    management::store::SyncStore,
    spotify::{self, ApiClient},
    types::{AccessToken, Credentials},
};

type Flight = Shared<BoxFuture<'static, Result<AccessToken, TokenError>>>;

struct TokenCore {
    client: Arc<ApiClient>,
    store: Arc<dyn SyncStore>,
    token_url: String,
    lead: chrono::Duration,
    current: ArcSwapOption<AccessToken>,
    inflight: Mutex<Option<Flight>>,
}

/// Sole owner of the access token.
///
/// Reads go through an [`ArcSwapOption`], so a caller always sees a whole
/// `(value, expires_at)` pair. Concurrent callers that find the token stale
/// join the same acquisition instead of each starting their own; the mutex
/// only guards the decision whether a flight is already running, the request
/// itself runs outside of it.
pub struct TokenManager {
    core: Arc<TokenCore>,
}

impl TokenManager {
    pub fn new(
        client: Arc<ApiClient>,
        store: Arc<dyn SyncStore>,
        token_url: impl Into<String>,
        lead: Duration,
    ) -> Self {
        Self {
            core: Arc::new(TokenCore {
                client,
                store,
                token_url: token_url.into(),
                lead: chrono::Duration::from_std(lead).unwrap_or(chrono::Duration::zero()),
                current: ArcSwapOption::empty(),
                inflight: Mutex::new(None),
            }),
        }
    }

    /// Returns a token that is valid for at least the safety lead, acquiring
    /// a new one if needed.
    ///
    /// On failure the previous token is kept and the next call tries again.
    pub async fn ensure_fresh_token(&self) -> Result<AccessToken, TokenError> {
        if let Some(token) = self.core.fresh_token() {
            return Ok(token);
        }

        let flight = {
            let mut slot = self
                .core
                .inflight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            // a flight may have landed between the first check and the lock
            if let Some(token) = self.core.fresh_token() {
                return Ok(token);
            }

            match slot.as_ref() {
                Some(flight) => flight.clone(),
                None => {
                    let flight = Arc::clone(&self.core).start_flight();
                    *slot = Some(flight.clone());
                    flight
                }
            }
        };

        flight.await
    }

    /// The cached token, fresh or not.
    pub fn current_token(&self) -> Option<AccessToken> {
        self.core.current.load_full().map(|t| t.as_ref().clone())
    }

    /// Checks that `credentials` can obtain a token, without touching the
    /// cached one.
    pub async fn validate_credentials(&self, credentials: &Credentials) -> Result<(), TokenError> {
        if !credentials.is_complete() {
            return Err(TokenError::MissingCredentials);
        }

        spotify::auth::request_token(
            &self.core.client,
            &self.core.token_url,
            credentials,
            &CancellationToken::new(),
        )
        .await
        .map(|_| ())
        .map_err(TokenError::AcquisitionFailed)
    }
}

impl TokenCore {
    fn fresh_token(&self) -> Option<AccessToken> {
        let token = self.current.load_full()?;
        token
            .is_fresh(Utc::now(), self.lead)
            .then(|| token.as_ref().clone())
    }

    fn start_flight(self: Arc<Self>) -> Flight {
        async move {
            // dropped last, so late callers already see the new token
            let _clear = ClearSlot(&*self);
            let result = self.acquire().await;
            match &result {
                Ok(token) => {
                    self.current.store(Some(Arc::new(token.clone())));
                    tracing::info!("access token refreshed, valid until {}", token.expires_at);
                }
                Err(e) => tracing::warn!("cannot refresh access token: {}", e),
            }

            result
        }
        .boxed()
        .shared()
    }

    fn clear_flight(&self) {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    async fn acquire(&self) -> Result<AccessToken, TokenError> {
        let credentials = self
            .store
            .get_credentials()
            .await
            .map_err(TokenError::Store)?;
        if !credentials.is_complete() {
            return Err(TokenError::MissingCredentials);
        }

        // shared by every waiter, so no single caller may cancel it
        spotify::auth::request_token(
            &self.client,
            &self.token_url,
            &credentials,
            &CancellationToken::new(),
        )
        .await
        .map_err(TokenError::AcquisitionFailed)
    }
}

/// Empties the flight slot when the flight ends, unwinding included, so a
/// panicked flight is never handed to the next caller.
struct ClearSlot<'a>(&'a TokenCore);

impl Drop for ClearSlot<'_> {
    fn drop(&mut self) {
        self.0.clear_flight();
    }
}
