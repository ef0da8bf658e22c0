// Client for a key/value contract gateway.
//
// The gateway fronts the deployed contract and exposes its three calls over HTTP:
//   GET  {base}/available      -> {"available": bool}
//   GET  {base}/data/{key}     -> {"value": "<base64>"}   (404 when the key was never written)
//   PUT  {base}/data/{key}     <- {"value": "<base64>"}   -> {"tx_hash": "..."}
// Keys travel as a single percent-encoded path segment. A 403 on write means the signer
// declined the transaction.

use crate::storage::kv::{KeyValueStore, StoreError, StoreResult, TxReceipt};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct AvailableResponse {
    available: bool,
}

#[derive(Serialize, Deserialize)]
struct ValueBody {
    value: String,
}

#[derive(Clone)]
pub struct HttpKvStore {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpKvStore {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("invalid gateway URL '{}': {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow::anyhow!("gateway URL '{}' cannot carry a path", base_url));
        }
        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StoreError::Backend(anyhow::anyhow!(
                    "gateway URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn data_url(&self, key: &str) -> StoreResult<Url> {
        self.endpoint(&["data", key])
    }
}

fn backend(e: reqwest::Error) -> StoreError {
    if e.is_connect() || e.is_timeout() {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Backend(e.into())
    }
}

#[async_trait]
impl KeyValueStore for HttpKvStore {
    fn backend_name(&self) -> &str {
        "http"
    }

    async fn is_available(&self) -> StoreResult<bool> {
        let resp = match self
            .client
            .get(self.endpoint(&["available"])?)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_connect() || e.is_timeout() => return Ok(false),
            Err(e) => return Err(backend(e)),
        };
        if !resp.status().is_success() {
            return Ok(false);
        }
        let body: AvailableResponse = resp.json().await.map_err(backend)?;
        Ok(body.available)
    }

    async fn get_data(&self, key: &str) -> StoreResult<Vec<u8>> {
        let resp = self.client.get(self.data_url(key)?).send().await.map_err(backend)?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let resp = resp.error_for_status().map_err(backend)?;
        let body: ValueBody = resp.json().await.map_err(backend)?;
        STANDARD
            .decode(body.value)
            .map_err(|e| StoreError::Backend(anyhow::anyhow!("gateway returned bad base64: {}", e)))
    }

    async fn set_data(&self, key: &str, value: &[u8]) -> StoreResult<TxReceipt> {
        let resp = self
            .client
            .put(self.data_url(key)?)
            .json(&ValueBody {
                value: STANDARD.encode(value),
            })
            .send()
            .await
            .map_err(backend)?;
        if resp.status() == StatusCode::FORBIDDEN {
            return Err(StoreError::Rejected);
        }
        let resp = resp.error_for_status().map_err(backend)?;
        resp.json::<TxReceipt>().await.map_err(backend)
    }
}
