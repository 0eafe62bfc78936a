use crate::config::StatePaths;
use crate::domain::Group;
use crate::shared::errors::StateError;
use crate::shared::fs_atomic::atomic_write_file;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Namespaced entry holding the last group sequence fetched from the service.
pub const GROUPS_CACHE_KEY: &str = "mb_groups_v2_groupMultiplier";

/// File-backed key/value snapshot store. One JSON file per key; each write
/// replaces the previous snapshot whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentCache {
    dir: PathBuf,
}

fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

impl PersistentCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_state_paths(paths: &StatePaths) -> Self {
        Self::new(paths.cache_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// Reads an entry. Absence and unparsable content both yield `default`.
    pub fn read_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Ok(raw) = fs::read_to_string(self.entry_path(key)) else {
            return default;
        };
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(value)) => value,
            _ => default,
        }
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StateError> {
        let path = self.entry_path(key);
        let body = serde_json::to_vec(value).map_err(|source| StateError::EncodeState {
            path: path.display().to_string(),
            source,
        })?;
        atomic_write_file(&path, &body).map_err(|source| StateError::WriteState {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn read_groups(&self) -> Vec<Group> {
        self.read_or(GROUPS_CACHE_KEY, Vec::new())
    }

    pub fn write_groups(&self, groups: &[Group]) -> Result<(), StateError> {
        self.write(GROUPS_CACHE_KEY, groups)
    }
}
