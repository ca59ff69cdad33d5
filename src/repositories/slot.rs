use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::models::RepositoryResult;

/// Named string storage that survives between sessions
#[async_trait]
pub trait PersistenceSlot: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// Overwrite the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;
}

/// File-backed slot storing one file per key under a data directory
pub struct FileSlot {
    data_dir: PathBuf,
}

impl FileSlot {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`.
    ///
    /// Keys such as `@RocketShoes:cart` are not portable file names, so every
    /// character outside `[A-Za-z0-9_-]` becomes `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.data_dir.join(format!("{}.json", file_name))
    }
}

#[async_trait]
impl PersistenceSlot for FileSlot {
    #[instrument(skip(self), fields(data_dir = %self.data_dir.display()))]
    async fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let path = self.path_for(key);

        match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                debug!(bytes = value.len(), "Slot value read");
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Slot is empty");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(data_dir = %self.data_dir.display(), bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        debug!("Slot value written");
        Ok(())
    }
}

/// Process-local slot, lost on restart
#[derive(Default)]
pub struct InMemorySlot {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-populated with one value
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl PersistenceSlot for InMemorySlot {
    async fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
