//! Tests for the remote paste backend against a mock HTTP server.

use std::sync::Arc;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use token_relay::config::Config;
use token_relay::service::TokenService;
use token_relay::store::{PasteStore, StorageKind, TokenStore};

fn paste_store(server: &MockServer, api_token: Option<&str>) -> PasteStore {
    let mut config = Config::for_testing(StorageKind::Paste);
    config.paste_api_token = api_token.map(String::from);
    PasteStore::new(format!("{}/api/paste", server.uri()), &config).unwrap()
}

#[tokio::test]
async fn test_save_publishes_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/paste"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let service = TokenService::new(Arc::new(paste_store(&server, None)));
    let id = service.save("oauth:abc", Some("somechannel")).await.unwrap();

    // The mirror serves reads within this process.
    let records = service.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
}

#[tokio::test]
async fn test_save_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/paste"))
        .and(header("authorization", "Bearer paste-secret"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let service = TokenService::new(Arc::new(paste_store(&server, Some("paste-secret"))));
    service.save("oauth:abc", None).await.unwrap();
}

#[tokio::test]
async fn test_rejected_publish_fails_save() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/paste"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let service = TokenService::new(Arc::new(paste_store(&server, None)));
    let result = service.save("oauth:abc", None).await;
    assert!(result.is_err());

    // Failed put leaves nothing behind.
    assert_eq!(service.stats().await.unwrap().total, 0);
}

#[tokio::test]
async fn test_mark_used_republishes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/paste"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let service = TokenService::new(Arc::new(paste_store(&server, None)));
    let id = service.save("oauth:abc", None).await.unwrap();
    service.mark_used(&id).await.unwrap();

    let records = service.list_all().await.unwrap();
    assert!(records[0].used);
}

#[tokio::test]
async fn test_delete_is_mirror_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/paste"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = paste_store(&server, None);
    let service = TokenService::new(Arc::new(store.clone()));
    let id = service.save("oauth:abc", None).await.unwrap();

    // Delete touches only the in-process mirror; no extra paste request.
    service.delete(&id).await.unwrap();
    assert!(store.get(&id).await.unwrap().is_none());
}
