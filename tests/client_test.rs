mod common;

use std::{sync::atomic::Ordering, time::Duration};

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use serde_json::Value;
use sporlwatch::{
    error::ClientError,
    spotify::{ApiClient, client::retry_after},
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use common::{Stub, fast_client_config};

async fn get_scripted(client: &ApiClient) -> Result<Value, ClientError> {
    let url = format!("{}/scripted", client.api_url());
    client
        .get_json(&url, "token-1", &[], &CancellationToken::new())
        .await
}

fn hits(stub: &Stub) -> usize {
    stub.state.scripted_hits.load(Ordering::SeqCst)
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let stub = Stub::start().await;
    let client = ApiClient::new(stub.client_config()).unwrap();

    let value = get_scripted(&client).await.unwrap();
    assert_eq!(value["ok"], Value::Bool(true));
    assert_eq!(hits(&stub), 1);
}

#[tokio::test]
async fn test_retries_after_429_until_success() {
    let stub = Stub::start().await;
    stub.state.script(&[(429, Some(0)), (429, Some(0))]);
    let client = ApiClient::new(stub.client_config()).unwrap();

    let value = get_scripted(&client).await.unwrap();
    assert_eq!(value["ok"], Value::Bool(true));
    assert_eq!(hits(&stub), 3);
}

#[tokio::test]
async fn test_gives_up_after_three_429s() {
    let stub = Stub::start().await;
    stub.state
        .script(&[(429, Some(0)), (429, Some(0)), (429, Some(0)), (429, Some(0))]);
    let client = ApiClient::new(stub.client_config()).unwrap();

    let result = get_scripted(&client).await;
    assert!(matches!(result, Err(ClientError::RateLimited)));
    assert_eq!(hits(&stub), 3);
}

#[tokio::test]
async fn test_429_without_header_uses_default_delay() {
    let stub = Stub::start().await;
    stub.state.script(&[(429, None)]);
    let mut config = stub.client_config();
    config.default_retry_after = Duration::from_millis(200);
    let client = ApiClient::new(config).unwrap();

    let start = Instant::now();
    get_scripted(&client).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(200));
    assert_eq!(hits(&stub), 2);
}

#[tokio::test]
async fn test_excessive_retry_after_gives_up_immediately() {
    let stub = Stub::start().await;
    stub.state.script(&[(429, Some(600))]);
    let client = ApiClient::new(stub.client_config()).unwrap();

    let result = get_scripted(&client).await;
    assert!(matches!(result, Err(ClientError::RateLimited)));
    assert_eq!(hits(&stub), 1);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let stub = Stub::start().await;
    stub.state.script(&[(401, None)]);
    let client = ApiClient::new(stub.client_config()).unwrap();

    let result = get_scripted(&client).await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(hits(&stub), 1);
}

#[tokio::test]
async fn test_server_error_status_is_surfaced() {
    let stub = Stub::start().await;
    stub.state.script(&[(503, None)]);
    let client = ApiClient::new(stub.client_config()).unwrap();

    let result = get_scripted(&client).await;
    assert!(matches!(result, Err(ClientError::ServerError(503))));
    assert_eq!(hits(&stub), 1);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // grab a free port and close it again
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(fast_client_config(format!("http://{}/v1", addr))).unwrap();
    let url = format!("{}/anything", client.api_url());
    let result: Result<Value, _> = client
        .get_json(&url, "token-1", &[], &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(ClientError::Network(_))));
}

#[tokio::test]
async fn test_undecodable_body_is_decode_error() {
    let stub = Stub::start().await;
    let client = ApiClient::new(stub.client_config()).unwrap();

    let url = format!("{}/scripted", client.api_url());
    let result: Result<Vec<u32>, _> = client
        .get_json(&url, "token-1", &[], &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(ClientError::Decode(_))));
}

#[tokio::test]
async fn test_cancelled_before_sending() {
    let stub = Stub::start().await;
    let client = ApiClient::new(stub.client_config()).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let url = format!("{}/scripted", client.api_url());
    let result: Result<Value, _> = client.get_json(&url, "token-1", &[], &cancel).await;

    assert!(matches!(result, Err(ClientError::Cancelled)));
    assert_eq!(hits(&stub), 0);
}

#[tokio::test]
async fn test_requests_are_paced() {
    let stub = Stub::start().await;
    let mut config = stub.client_config();
    config.request_interval = Duration::from_millis(100);
    config.burst = 1;
    let client = ApiClient::new(config).unwrap();

    let start = Instant::now();
    for _ in 0..3 {
        get_scripted(&client).await.unwrap();
    }
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_api_url_trailing_slash_is_trimmed() {
    let client = ApiClient::new(fast_client_config("http://localhost/v1/".to_string())).unwrap();
    assert_eq!(client.api_url(), "http://localhost/v1");
}

#[test]
fn test_retry_after_header_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(retry_after(&headers), None);

    headers.insert(RETRY_AFTER, HeaderValue::from_static("5"));
    assert_eq!(retry_after(&headers), Some(Duration::from_secs(5)));

    headers.insert(RETRY_AFTER, HeaderValue::from_static("0"));
    assert_eq!(retry_after(&headers), Some(Duration::ZERO));

    headers.insert(
        RETRY_AFTER,
        HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
    );
    assert_eq!(retry_after(&headers), None);
}
