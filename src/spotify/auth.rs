use chrono::{Duration, Utc};
use tokio_util::sync::CancellationToken;

use crate::{
    error::ClientError,
    spotify::client::ApiClient,
    types::{AccessToken, Credentials, TokenResponse},
};

/// Requests a token with the client-credentials grant.
///
/// One form-encoded POST through the rate-limited client; the expiry is
/// computed from `expires_in` relative to the moment the answer arrived.
pub async fn request_token(
    client: &ApiClient,
    token_url: &str,
    credentials: &Credentials,
    cancel: &CancellationToken,
) -> Result<AccessToken, ClientError> {
    let res: TokenResponse = client
        .post_form(
            token_url,
            &[
                ("grant_type", "client_credentials"),
                ("client_id", &credentials.client_id),
                ("client_secret", &credentials.client_secret),
            ],
            cancel,
        )
        .await?;

    if res.access_token.is_empty() {
        return Err(ClientError::InvalidRequest(String::from(
            "token endpoint returned an empty access token",
        )));
    }

    let expires_at = Duration::try_seconds(res.expires_in.max(0))
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| {
            ClientError::InvalidRequest(format!(
                "token endpoint returned an out of range expires_in: {}",
                res.expires_in
            ))
        })?;

    Ok(AccessToken {
        value: res.access_token,
        expires_at,
    })
}
