use crate::storage::{StatusRecord, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-site map from page URL to its last known status
///
/// Loaded fully at the start of a run and written back in one piece with
/// [`StatusCache::save`]. Entries are never removed.
#[derive(Debug, Clone)]
pub struct StatusCache {
    path: PathBuf,
    entries: BTreeMap<String, StatusRecord>,
}

impl StatusCache {
    /// Creates an empty cache that will be saved to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Loads the cache file at `path`, or starts empty if there is none
    ///
    /// # Returns
    ///
    /// * `Ok(StatusCache)` - Loaded (or empty) cache
    /// * `Err(StorageError)` - File unreadable, malformed, or has an empty key
    pub fn load(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!("No status cache at {}, starting empty", path.display());
            return Ok(Self::empty(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: BTreeMap<String, StatusRecord> =
            serde_json::from_str(&content).map_err(|source| StorageError::Serialization {
                path: path.display().to_string(),
                source,
            })?;

        if entries.contains_key("") {
            return Err(StorageError::EmptyKey);
        }

        tracing::debug!(
            "Loaded {} cached statuses from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries })
    }

    /// Writes the whole cache to disk
    ///
    /// The file is written next to its destination and renamed into place,
    /// so a reader never sees a partial map. Missing parent directories are
    /// created.
    pub fn save(&self) -> StorageResult<()> {
        let io_error = |source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StorageError::Serialization {
                path: self.path.display().to_string(),
                source,
            }
        })?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        std::fs::write(&staging, json).map_err(io_error)?;
        std::fs::rename(&staging, &self.path).map_err(io_error)?;

        tracing::debug!(
            "Saved {} statuses to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, url: &str) -> Option<&StatusRecord> {
        self.entries.get(url)
    }

    /// Stores or overwrites the record for `url`
    pub fn insert(&mut self, url: impl Into<String>, record: StatusRecord) -> StorageResult<()> {
        let url = url.into();
        if url.is_empty() {
            return Err(StorageError::EmptyKey);
        }
        self.entries.insert(url, record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in URL order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StatusRecord)> {
        self.entries.iter()
    }
}
