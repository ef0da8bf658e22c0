//! Centralized configuration (environment variables + defaults).

use crate::domain::registry::{RegistrySettings, DEFAULT_DECRYPT_DELAY};
use anyhow::anyhow;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_CHAIN_ID: u64 = 11155111;
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Which key/value contract backend to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String },
    Http { gateway_url: String },
}

impl StoreBackend {
    /// Backend name without connection details.
    pub fn label(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres { .. } => "postgres",
            StoreBackend::Http { .. } => "http",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    pub bind_addr: String,
    pub contract_address: String,
    pub chain_id: u64,
    pub decrypt_delay: Duration,
    pub status_success_after: Duration,
    pub status_error_after: Duration,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend = match var("KV_BACKEND").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("postgres") => StoreBackend::Postgres {
                database_url: var("DATABASE_URL")
                    .ok_or_else(|| anyhow!("DATABASE_URL must be set for KV_BACKEND=postgres"))?,
            },
            Some("http") => StoreBackend::Http {
                gateway_url: var("KV_GATEWAY_URL")
                    .ok_or_else(|| anyhow!("KV_GATEWAY_URL must be set for KV_BACKEND=http"))?,
            },
            Some(other) => return Err(anyhow!("unknown KV_BACKEND '{}'", other)),
        };

        Ok(Self {
            backend,
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            contract_address: var("CONTRACT_ADDRESS").unwrap_or_else(|| ZERO_ADDRESS.to_string()),
            chain_id: parse_or("CHAIN_ID", var("CHAIN_ID"), DEFAULT_CHAIN_ID)?,
            decrypt_delay: millis_or(
                "DECRYPT_DELAY_MS",
                var("DECRYPT_DELAY_MS"),
                DEFAULT_DECRYPT_DELAY,
            )?,
            status_success_after: millis_or(
                "STATUS_SUCCESS_MS",
                var("STATUS_SUCCESS_MS"),
                crate::app::status::SUCCESS_DISMISS_AFTER,
            )?,
            status_error_after: millis_or(
                "STATUS_ERROR_MS",
                var("STATUS_ERROR_MS"),
                crate::app::status::ERROR_DISMISS_AFTER,
            )?,
        })
    }

    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            contract_address: self.contract_address.clone(),
            chain_id: self.chain_id,
            decrypt_delay: self.decrypt_delay,
        }
    }
}

fn parse_or(name: &str, raw: Option<String>, default: u64) -> anyhow::Result<u64> {
    match raw {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow!("{} must be a valid u64, got '{}'", name, v)),
        None => Ok(default),
    }
}

fn millis_or(name: &str, raw: Option<String>, default: Duration) -> anyhow::Result<Duration> {
    match raw {
        Some(v) => parse_or(name, Some(v), 0).map(Duration::from_millis),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.backend, StoreBackend::Memory);
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.chain_id, DEFAULT_CHAIN_ID);
        assert_eq!(cfg.decrypt_delay, Duration::from_millis(1500));
        assert_eq!(cfg.status_success_after, Duration::from_millis(2000));
        assert_eq!(cfg.status_error_after, Duration::from_millis(3000));
    }

    #[test]
    fn backend_selection() {
        let cfg = config(&[("KV_BACKEND", "Postgres"), ("DATABASE_URL", "postgres://x")]).unwrap();
        assert_eq!(
            cfg.backend,
            StoreBackend::Postgres {
                database_url: "postgres://x".into()
            }
        );
        assert!(config(&[("KV_BACKEND", "http")]).is_err());
        assert!(config(&[("KV_BACKEND", "redis")]).is_err());
    }

    #[test]
    fn numeric_overrides() {
        let cfg = config(&[("CHAIN_ID", "1"), ("DECRYPT_DELAY_MS", "0")]).unwrap();
        assert_eq!(cfg.chain_id, 1);
        assert!(cfg.decrypt_delay.is_zero());
        assert!(config(&[("CHAIN_ID", "mainnet")]).is_err());
    }
}
