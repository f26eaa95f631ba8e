use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use blog_store::SyncMode;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Number of posts `ListBlog` returns when the caller gives no usable limit.
pub const DEFAULT_LIST_LIMIT: u64 = 25;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub service: ServiceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5050)),
            store: StoreConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.service.default_list_limit == 0 {
            return Err(ServerError::Config(
                "service.default_list_limit must be positive".into(),
            ));
        }
        if self.store.backend == StoreBackend::File && self.store.path.as_os_str().is_empty() {
            return Err(ServerError::Config(
                "store.path is required for the file backend".into(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Journal location for the file backend.
    pub path: PathBuf,
    pub sync_mode: SyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: PathBuf::from("blog.journal"),
            sync_mode: SyncMode::default(),
        }
    }
}

/// Request-handling settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub default_list_limit: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ServiceConfig {
    /// Effective `ListBlog` limit. Absent, zero and negative requests fall
    /// back to the default; positive values are used as given.
    pub fn resolve_list_limit(&self, requested: Option<i64>) -> usize {
        let limit = match requested {
            Some(n) if n > 0 => n as u64,
            _ => self.default_list_limit,
        };
        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}
