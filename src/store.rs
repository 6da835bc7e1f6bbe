//! Versioned JSON document store rooted at the processed-data directory.
//!
//! Documents carry their schema version; a read that finds an older (or
//! otherwise different) version reports a miss so the caller rebuilds and
//! overwrites it. Writes go through a temp file and a rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, StatsError};

pub trait Versioned {
    const VERSION: u32;

    fn version(&self) -> u32;
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }

    /// `Ok(None)` when the document is absent, undecodable or of another version.
    pub fn get<T>(&self, rel: &Path) -> Result<Option<T>>
    where
        T: DeserializeOwned + Versioned,
    {
        let Some(raw) = self.read_raw(rel)? else {
            return Ok(None);
        };
        let path = self.path_for(rel);
        let value = match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "discarding undecodable cache entry");
                return Ok(None);
            }
        };
        if value.version() != T::VERSION {
            warn!(
                path = %path.display(),
                found = value.version(),
                expected = T::VERSION,
                "discarding stale cache entry"
            );
            return Ok(None);
        }
        debug!(path = %path.display(), "cache hit");
        Ok(Some(value))
    }

    /// Unversioned read, used for the flat player-name list.
    pub fn get_plain<T: DeserializeOwned>(&self, rel: &Path) -> Result<Option<T>> {
        let Some(raw) = self.read_raw(rel)? else {
            return Ok(None);
        };
        let path = self.path_for(rel);
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    /// Each writer goes through its own temp file in the target directory, so
    /// concurrent writers of one key (threads or processes) end in last-write-wins.
    pub fn put<T: Serialize + ?Sized>(&self, rel: &Path, value: &T) -> Result<PathBuf> {
        let path = self.path_for(rel);
        let dir = path.parent().unwrap_or(self.root.as_path()).to_path_buf();
        fs::create_dir_all(&dir).map_err(|err| StatsError::write(&dir, err))?;
        let json = serde_json::to_string_pretty(value).map_err(|err| StatsError::parse(&path, err))?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|err| StatsError::write(&dir, err))?;
        tmp.write_all(json.as_bytes()).map_err(|err| StatsError::write(&path, err))?;
        tmp.persist(&path).map_err(|err| StatsError::write(&path, err.error))?;
        Ok(path)
    }

    pub fn remove(&self, rel: &Path) -> Result<bool> {
        let path = self.path_for(rel);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StatsError::write(path, err)),
        }
    }

    fn read_raw(&self, rel: &Path) -> Result<Option<String>> {
        let path = self.path_for(rel);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StatsError::io(path, err)),
        }
    }
}

/// Turns a free-form name into a single safe path component.
pub fn file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '\0' => '_',
            other => other,
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|ch| ch == '.') {
        return format!("_{cleaned}");
    }
    cleaned
}
