use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use warden_policy::DEFAULT_ASSIGNABLE_ROLES;

pub const DEFAULT_POLICY_PATH: &str = "policy.csv";
pub const DEFAULT_POSTGRES_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_POSTGRES_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "postgres" => Ok(Self::Postgres),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

// Policy service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct PolicydConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub policy_path: PathBuf,
    pub postgres: Option<PostgresConfig>,
    pub assignable_roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PolicydConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<String>,
    policy_path: Option<PathBuf>,
    postgres: Option<PostgresOverride>,
    assignable_roles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PostgresOverride {
    url: Option<String>,
    max_connections: Option<u32>,
    acquire_timeout_ms: Option<u64>,
}

impl PolicydConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("WARDEN_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8088".to_string())
            .parse()
            .with_context(|| "parse WARDEN_BIND")?;
        let metrics_bind = std::env::var("WARDEN_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9088".to_string())
            .parse()
            .with_context(|| "parse WARDEN_METRICS_BIND")?;
        let storage = std::env::var("WARDEN_STORAGE")
            .unwrap_or_else(|_| "file".to_string())
            .parse()
            .with_context(|| "parse WARDEN_STORAGE")?;
        let policy_path = std::env::var("WARDEN_POLICY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_POLICY_PATH));

        let postgres = match std::env::var("WARDEN_POSTGRES_URL") {
            Ok(url) => Some(PostgresConfig {
                url,
                max_connections: env_number(
                    "WARDEN_POSTGRES_MAX_CONNECTIONS",
                    DEFAULT_POSTGRES_MAX_CONNECTIONS,
                )?,
                acquire_timeout_ms: env_number(
                    "WARDEN_POSTGRES_ACQUIRE_TIMEOUT_MS",
                    DEFAULT_POSTGRES_ACQUIRE_TIMEOUT_MS,
                )?,
            }),
            Err(_) => None,
        };

        let assignable_roles = match std::env::var("WARDEN_ASSIGNABLE_ROLES") {
            Ok(value) => split_roles(&value),
            Err(_) => DEFAULT_ASSIGNABLE_ROLES
                .iter()
                .map(|role| role.to_string())
                .collect(),
        };

        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            policy_path,
            postgres,
            assignable_roles,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("WARDEN_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read WARDEN_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: PolicydConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse policyd config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value.parse().with_context(|| "parse storage")?;
        }
        if let Some(value) = override_cfg.policy_path {
            self.policy_path = value;
        }
        if let Some(pg) = override_cfg.postgres {
            let current = self.postgres.take();
            let url = match (pg.url, current.as_ref()) {
                (Some(url), _) => url,
                (None, Some(existing)) => existing.url.clone(),
                (None, None) => bail!("postgres.url is required when overriding postgres"),
            };
            self.postgres = Some(PostgresConfig {
                url,
                max_connections: pg
                    .max_connections
                    .or(current.as_ref().map(|c| c.max_connections))
                    .unwrap_or(DEFAULT_POSTGRES_MAX_CONNECTIONS),
                acquire_timeout_ms: pg
                    .acquire_timeout_ms
                    .or(current.as_ref().map(|c| c.acquire_timeout_ms))
                    .unwrap_or(DEFAULT_POSTGRES_ACQUIRE_TIMEOUT_MS),
            });
        }
        if let Some(roles) = override_cfg.assignable_roles {
            self.assignable_roles = roles;
        }
        Ok(())
    }
}

fn env_number<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}

fn split_roles(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect()
}
