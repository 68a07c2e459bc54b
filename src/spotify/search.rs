use tokio_util::sync::CancellationToken;

use crate::{
    error::ClientError,
    spotify::client::ApiClient,
    types::{SearchResponse, SearchResult},
};

/// Searches albums, artists and tracks in one request.
pub async fn search(
    client: &ApiClient,
    token: &str,
    query: &str,
    cancel: &CancellationToken,
) -> Result<SearchResult, ClientError> {
    let url = format!("{uri}/search", uri = client.api_url());
    let res: SearchResponse = client
        .get_json(&url, token, &[("q", query), ("type", "album,artist,track")], cancel)
        .await?;

    Ok(res.into())
}
