//! Key-value persistence for rotating credentials.
//!
//! The refresher only sees [`TokenStore`]; the file-backed store is what the
//! binary uses, the in-memory one is for tests and embedding.

use crate::FitbitError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Stored value with surrounding whitespace removed; blank values read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, FitbitError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), FitbitError>;
}

/// One file per key, named `.fitbit_<key>` inside a directory.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".fitbit_{key}"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, FitbitError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(non_blank(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no stored value at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(FitbitError::Store(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), FitbitError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        // The token file is only ever replaced whole.
        let tmp = self.dir.join(format!(".fitbit_{key}.tmp"));
        tokio::fs::write(&tmp, value.trim()).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::debug!("stored {key} at {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, FitbitError> {
        let lock = self.values.read().await;
        Ok(lock.get(key).and_then(|v| non_blank(v)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), FitbitError> {
        let mut lock = self.values.write().await;
        lock.insert(key.to_string(), value.trim().to_string());
        Ok(())
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
