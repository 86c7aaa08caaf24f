//! Data directory access.
//!
//! The three CSV exports live side by side in the data directory:
//! - ticketing (one row per game)
//! - CRM purchases
//! - sponsorship deals
//!
//! Files are read once at startup into a [`Dataset`]; uploads replace a whole
//! dataset in memory.

mod dataset;

pub use dataset::{Dataset, DatasetSizes, DatasetUpdate};

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{AppConfig, DatasetConfig};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
}

/// The three datasets the service loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Ticketing,
    Crm,
    Sponsorship,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Ticketing,
        DatasetKind::Crm,
        DatasetKind::Sponsorship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Ticketing => "ticketing",
            DatasetKind::Crm => "crm",
            DatasetKind::Sponsorship => "sponsorship",
        }
    }
}

impl FromStr for DatasetKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StorageError::UnknownDataset(s.to_string()))
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub files: DatasetConfig,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            files: DatasetConfig::default(),
        }
    }

    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            files: config.datasets.clone(),
        }
    }

    pub fn path(&self, kind: DatasetKind) -> PathBuf {
        let file = match kind {
            DatasetKind::Ticketing => &self.files.ticketing,
            DatasetKind::Crm => &self.files.crm,
            DatasetKind::Sponsorship => &self.files.sponsorship,
        };
        self.data_dir.join(file)
    }

    /// Read a dataset file. `Ok(None)` when the file does not exist.
    pub fn read(&self, kind: DatasetKind) -> Result<Option<String>, StorageError> {
        let path = self.path(kind);
        if !path.exists() {
            warn!("No {} file at {}, starting empty", kind, path.display());
            return Ok(None);
        }
        read_text(&path).map(Some)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read a CSV export as text. Invalid UTF-8 (Latin-1 exports) is replaced
/// rather than rejected.
pub fn read_text(path: &Path) -> Result<String, StorageError> {
    let bytes = std::fs::read(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
