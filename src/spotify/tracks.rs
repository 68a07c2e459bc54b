use tokio_util::sync::CancellationToken;

use crate::{error::ClientError, spotify::client::ApiClient, types::TrackDetail};

pub async fn get_track(
    client: &ApiClient,
    token: &str,
    track_id: &str,
    cancel: &CancellationToken,
) -> Result<TrackDetail, ClientError> {
    let url = format!(
        "{uri}/tracks/{id}",
        uri = client.api_url(),
        id = track_id
    );
    client.get_json(&url, token, &[], cancel).await
}
