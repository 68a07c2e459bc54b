mod common;

use std::sync::Arc;

use sporlwatch::{
    error::ClientError,
    spotify::{self, ApiClient},
    types::Credentials,
};
use tokio_util::sync::CancellationToken;

use common::{Stub, StubArtist};

#[tokio::test]
async fn test_request_token() {
    let stub = Stub::start().await;
    let client = ApiClient::new(stub.client_config()).unwrap();
    let credentials = Credentials {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
    };

    let before = chrono::Utc::now();
    let token = spotify::auth::request_token(
        &client,
        &stub.token_url(),
        &credentials,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(token.value, "token-1");
    assert!(token.expires_at >= before + chrono::Duration::seconds(3600));
}

#[tokio::test]
async fn test_artist_details() {
    let stub = Stub::start().await;
    stub.state.add_artist(
        "artist-a",
        StubArtist::new("Artist A", &[("First", "2020"), ("Second", "2024-02-02")]),
    );
    let client = Arc::new(ApiClient::new(stub.client_config()).unwrap());

    let detail = spotify::artists::get_artist_details(
        &client,
        "token-1",
        "artist-a",
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(detail.artist.name, "Artist A");
    assert_eq!(detail.artist.genres, vec!["indie".to_string()]);
    assert_eq!(detail.albums.len(), 2);
    assert_eq!(detail.albums[1].release_date.as_deref(), Some("2024-02-02"));
    assert_eq!(stub.state.artist_requests(), 2);
}

#[tokio::test]
async fn test_artist_details_without_token() {
    let stub = Stub::start().await;
    stub.state
        .add_artist("artist-a", StubArtist::new("Artist A", &[]));
    let client = ApiClient::new(stub.client_config()).unwrap();

    let result = spotify::artists::get_artist_details(
        &client,
        "expired",
        "artist-a",
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(ClientError::Unauthorized)));
}

#[tokio::test]
async fn test_search_skips_broken_items() {
    let stub = Stub::start().await;
    let client = ApiClient::new(stub.client_config()).unwrap();

    let result =
        spotify::search::search(&client, "token-1", "stub", &CancellationToken::new())
            .await
            .unwrap();

    assert_eq!(result.artists.len(), 1);
    assert_eq!(result.albums.len(), 1);
    assert_eq!(result.albums[0].name, "Stub Album");
    assert!(result.tracks.is_empty());
}
