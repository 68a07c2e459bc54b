use crate::{error, info, success, types::Credentials};

/// Stores a client id and secret, but only after they produced a token.
pub async fn set_credentials(client_id: String, client_secret: String) {
    let credentials = Credentials {
        client_id: client_id.trim().to_string(),
        client_secret: client_secret.trim().to_string(),
    };

    let store = super::load_store().await;
    let engine = super::build_engine(store.clone());

    let pb = super::spinner("Validating credentials...");
    let result = engine.tokens().validate_credentials(&credentials).await;
    pb.finish_and_clear();

    if let Err(e) = result {
        error!("Credentials rejected, nothing saved. Err: {}", e);
    }

    match store.set_credentials(credentials).await {
        Ok(()) => success!("Credentials saved to {}", store.path().display()),
        Err(e) => error!("Cannot save credentials. Err: {}", e),
    }
}

/// Acquires a token with the configured credentials.
pub async fn verify_credentials() {
    let engine = super::open_engine().await;

    let pb = super::spinner("Requesting access token...");
    let result = engine.tokens().ensure_fresh_token().await;
    pb.finish_and_clear();

    match result {
        Ok(token) => {
            success!("Credentials are valid");
            info!("Token valid until {}", token.expires_at);
        }
        Err(e) => error!("Cannot get an access token. Err: {}", e),
    }
}
