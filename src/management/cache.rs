use std::{io::ErrorKind, path::PathBuf};

use crate::{error::CacheError, types::TokenRecord};

/// Handle on the JSON token cache file.
///
/// The file holds exactly one [`TokenRecord`] and is replaced wholesale on
/// every save: the record is written to a sibling `.tmp` file which is then
/// renamed over the cache, so an interrupted save never leaves a truncated
/// cache behind.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Reads the cached record; `Ok(None)` when nothing has been cached yet.
    pub async fn load(&self) -> Result<Option<TokenRecord>, CacheError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io(e)),
        };

        let record: TokenRecord = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    pub async fn save(&self, record: &TokenRecord) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        let tmp_path = self.tmp_path();
        async_fs::write(&tmp_path, json).await?;

        if let Err(e) = async_fs::rename(&tmp_path, &self.path).await {
            let _ = async_fs::remove_file(&tmp_path).await;
            return Err(CacheError::Io(e));
        }

        Ok(())
    }

    /// Removes the cache file. Clearing an absent cache is not an error.
    pub async fn clear(&self) -> Result<(), CacheError> {
        match async_fs::remove_file(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(CacheError::Io(e)),
            _ => Ok(()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "token-cache.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
