//! Runner configuration

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Runtime configuration for the reference-data service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// JSON document with exchange and security rows
    pub data_file: PathBuf,
    /// Seconds between reload cycles
    pub refresh_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/reference.json"),
            refresh_secs: 300,
        }
    }
}

impl RunnerConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.refresh_secs, 300);
        assert_eq!(config.data_file, PathBuf::from("data/reference.json"));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: RunnerConfig = serde_json::from_str(r#"{"refresh_secs": 60}"#).unwrap();
        assert_eq!(config.refresh_secs, 60);
        assert_eq!(config.data_file, PathBuf::from("data/reference.json"));
    }
}
