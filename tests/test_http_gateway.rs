//! HttpKvStore against a minimal in-process contract gateway.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use desci_registry::domain::{PresignedSigner, ProjectDraft, ProjectRegistry};
use desci_registry::storage::kv::{HttpKvStore, KeyValueStore, StoreError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

type Entries = Arc<Mutex<HashMap<String, String>>>;

async fn available() -> impl IntoResponse {
    Json(json!({ "available": true }))
}

async fn read(State(entries): State<Entries>, Path(key): Path<String>) -> impl IntoResponse {
    match entries.lock().await.get(&key) {
        Some(v) => (StatusCode::OK, Json(json!({ "value": v }))).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn write(
    State(entries): State<Entries>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if key == "locked" {
        return StatusCode::FORBIDDEN.into_response();
    }
    let mut entries = entries.lock().await;
    entries.insert(key, body["value"].as_str().unwrap_or_default().to_string());
    Json(json!({ "tx_hash": format!("0x{:x}", entries.len()) })).into_response()
}

async fn spawn_gateway() -> Result<String, Box<dyn std::error::Error>> {
    let entries: Entries = Arc::default();
    let router = Router::new()
        .route("/available", get(available))
        .route("/data/:key", get(read).put(write))
        .with_state(entries);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://127.0.0.1:{}/", port))
}

#[tokio::test]
async fn test_gateway_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let store = HttpKvStore::new(&spawn_gateway().await?)?;

    assert!(store.is_available().await?);
    assert!(store.get_data("never_written").await?.is_empty());

    let receipt = store.set_data("greeting", b"hello").await?;
    assert!(receipt.tx_hash.starts_with("0x"));
    assert_eq!(store.get_data("greeting").await?, b"hello".to_vec());

    assert!(matches!(store.set_data("locked", b"x").await, Err(StoreError::Rejected)));
    Ok(())
}

#[tokio::test]
async fn test_keys_with_reserved_characters_stay_distinct(
) -> Result<(), Box<dyn std::error::Error>> {
    let store = HttpKvStore::new(&spawn_gateway().await?)?;

    store.set_data("project_victim", b"original").await?;
    store.set_data("project_victim?x", b"query").await?;
    store.set_data("project_victim#frag", b"fragment").await?;
    store.set_data("project_a/b", b"slash").await?;
    store.set_data("project with spaces", b"spaces").await?;
    store.set_data("project_100%", b"percent").await?;

    assert_eq!(store.get_data("project_victim").await?, b"original".to_vec());
    assert_eq!(store.get_data("project_victim?x").await?, b"query".to_vec());
    assert_eq!(store.get_data("project_victim#frag").await?, b"fragment".to_vec());
    assert_eq!(store.get_data("project_a/b").await?, b"slash".to_vec());
    assert_eq!(store.get_data("project with spaces").await?, b"spaces".to_vec());
    assert_eq!(store.get_data("project_100%").await?, b"percent".to_vec());
    assert!(store.get_data("project_a").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_gateway_base_path_is_kept() -> Result<(), Box<dyn std::error::Error>> {
    let entries: Entries = Arc::default();
    let router = Router::new().nest(
        "/gateway",
        Router::new()
            .route("/available", get(available))
            .route("/data/:key", get(read).put(write))
            .with_state(entries),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let store = HttpKvStore::new(&format!("http://127.0.0.1:{}/gateway/", port))?;
    assert!(store.is_available().await?);
    store.set_data("k", b"v").await?;
    assert_eq!(store.get_data("k").await?, b"v".to_vec());
    Ok(())
}

#[tokio::test]
async fn test_invalid_gateway_url_is_rejected() {
    assert!(HttpKvStore::new("not a url").is_err());
    assert!(HttpKvStore::new("mailto:someone@example.com").is_err());
}

#[tokio::test]
async fn test_registry_over_gateway() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(HttpKvStore::new(&spawn_gateway().await?)?);
    let registry = ProjectRegistry::new(store);
    let owner = PresignedSigner::connected("0xowner");

    let created = registry
        .create(ProjectDraft::new("Gateway", "stored remotely"), &owner)
        .await?;
    let listed = registry.list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_gateway_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);

    let store = HttpKvStore::new(&format!("http://127.0.0.1:{}", port))?;
    assert!(!store.is_available().await?);
    Ok(())
}
