//! Snapshot storage implementation
//!
//! This module persists the whole [`EventStore`] as a single JSON document,
//! either in a local file or under one Redis key.

use std::path::{Path, PathBuf};
use std::time::Instant;
use redis::AsyncCommands;
use tokio::fs;
use tracing::{debug, error, info};
use crate::config::{StorageBackend, StorageConfig};
use crate::roster::EventStore;
use crate::utils::errors::Result;
use crate::utils::logging::log_snapshot;

/// Where snapshots are kept
#[derive(Clone)]
pub enum StateStorage {
    /// JSON file, replaced atomically on every save
    File { path: PathBuf },
    /// JSON string under a single Redis key
    Redis {
        connection_manager: redis::aio::ConnectionManager,
        key: String,
    },
}

impl StateStorage {
    /// Create the storage selected by configuration
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::File => Ok(Self::file(&config.file_path)),
            StorageBackend::Redis => {
                let client = redis::Client::open(config.redis_url.as_str())?;
                let connection_manager = redis::aio::ConnectionManager::new(client).await?;
                let storage = Self::Redis {
                    connection_manager,
                    key: config.redis_key.clone(),
                };
                storage.test_connection().await?;
                Ok(storage)
            }
        }
    }

    /// File storage at `path`
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File { path: path.as_ref().to_path_buf() }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::Redis { .. } => "redis",
        }
    }

    /// Load the last snapshot; a missing snapshot is an empty store
    pub async fn load(&self) -> Result<EventStore> {
        let data = match self {
            Self::File { path } => match fs::read_to_string(path).await {
                Ok(data) => Some(data),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to read snapshot file");
                    return Err(e.into());
                }
            },
            Self::Redis { connection_manager, key } => {
                let mut conn = connection_manager.clone();
                conn.get::<&str, Option<String>>(key.as_str()).await?
            }
        };

        match data {
            Some(data) => {
                let store: EventStore = match serde_json::from_str(&data) {
                    Ok(store) => store,
                    Err(e) => {
                        error!(backend = self.backend_name(), error = %e, "Failed to deserialize snapshot");
                        return Err(e.into());
                    }
                };
                info!(
                    backend = self.backend_name(),
                    chats = store.chat_count(),
                    events = store.event_count(),
                    "Snapshot loaded"
                );
                Ok(store)
            }
            None => {
                info!(backend = self.backend_name(), "No snapshot found, starting empty");
                Ok(EventStore::new())
            }
        }
    }

    /// Replace the stored snapshot with `store`
    pub async fn save(&self, store: &EventStore) -> Result<()> {
        let started = Instant::now();
        let serialized = serde_json::to_string(store)?;

        match self {
            Self::File { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).await?;
                }
                let tmp_path = temp_path(path);
                fs::write(&tmp_path, serialized.as_bytes()).await?;
                fs::rename(&tmp_path, path).await?;
            }
            Self::Redis { connection_manager, key } => {
                let mut conn = connection_manager.clone();
                conn.set::<_, _, ()>(key.as_str(), serialized).await?;
            }
        }

        log_snapshot(
            self.backend_name(),
            store.chat_count(),
            store.event_count(),
            started.elapsed().as_millis() as u64,
        );
        Ok(())
    }

    /// Check that the backend is reachable
    pub async fn test_connection(&self) -> Result<()> {
        match self {
            Self::File { .. } => Ok(()),
            Self::Redis { connection_manager, .. } => {
                let mut conn = connection_manager.clone();
                let _: String = redis::cmd("PING").query_async(&mut conn).await?;
                debug!("Redis connection OK");
                Ok(())
            }
        }
    }
}

/// Sibling path the snapshot is written to before the rename
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path } => f.debug_struct("StateStorage::File").field("path", path).finish(),
            Self::Redis { key, .. } => f
                .debug_struct("StateStorage::Redis")
                .field("key", key)
                .finish_non_exhaustive(),
        }
    }
}
