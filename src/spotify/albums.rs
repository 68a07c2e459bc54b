use tokio_util::sync::CancellationToken;

use crate::{error::ClientError, spotify::client::ApiClient, types::AlbumDetail};

pub async fn get_album(
    client: &ApiClient,
    token: &str,
    album_id: &str,
    cancel: &CancellationToken,
) -> Result<AlbumDetail, ClientError> {
    let url = format!(
        "{uri}/albums/{id}",
        uri = client.api_url(),
        id = album_id
    );
    client.get_json(&url, token, &[], cancel).await
}
