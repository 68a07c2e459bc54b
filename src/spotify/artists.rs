use tokio_util::sync::CancellationToken;

use crate::{
    error::ClientError,
    spotify::client::ApiClient,
    types::{Album, Artist, ArtistDetail, Paging},
};

/// Release groups looked at when checking for new releases.
pub const RELEASE_GROUPS: &str = "album,single";

/// Page size of the albums request, the maximum the API allows.
pub const RELEASE_LIMIT: u32 = 50;

pub async fn get_artist(
    client: &ApiClient,
    token: &str,
    artist_id: &str,
    cancel: &CancellationToken,
) -> Result<Artist, ClientError> {
    let url = format!(
        "{uri}/artists/{id}",
        uri = client.api_url(),
        id = artist_id
    );
    client.get_json(&url, token, &[], cancel).await
}

pub async fn get_artist_releases(
    client: &ApiClient,
    token: &str,
    artist_id: &str,
    cancel: &CancellationToken,
) -> Result<Vec<Album>, ClientError> {
    let url = format!(
        "{uri}/artists/{id}/albums",
        uri = client.api_url(),
        id = artist_id
    );
    let limit = RELEASE_LIMIT.to_string();
    let page: Paging<Album> = client
        .get_json(
            &url,
            token,
            &[("include_groups", RELEASE_GROUPS), ("limit", &limit)],
            cancel,
        )
        .await?;

    Ok(page.items)
}

/// Artist object and the artist's latest albums and singles, two requests.
pub async fn get_artist_details(
    client: &ApiClient,
    token: &str,
    artist_id: &str,
    cancel: &CancellationToken,
) -> Result<ArtistDetail, ClientError> {
    let artist = get_artist(client, token, artist_id, cancel).await?;
    let albums = get_artist_releases(client, token, artist_id, cancel).await?;

    Ok(ArtistDetail { artist, albums })
}
