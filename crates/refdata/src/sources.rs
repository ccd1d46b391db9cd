//! Concrete reference-data sources
//!
//! The persistent store itself is out of scope; these adapters cover the
//! two cases the platform needs without it: an in-memory source for tests
//! and simulations, and a JSON document for file-backed deployments.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use themis_ports::{ExchangeRow, ReferenceDataSource, SecurityRow, SourceError, SourceResult};

/// In-memory source serving owned row vectors
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    exchanges: Vec<ExchangeRow>,
    securities: Vec<SecurityRow>,
}

impl StaticSource {
    pub fn new(exchanges: Vec<ExchangeRow>, securities: Vec<SecurityRow>) -> Self {
        Self {
            exchanges,
            securities,
        }
    }

    pub fn with_exchange(mut self, row: ExchangeRow) -> Self {
        self.exchanges.push(row);
        self
    }

    pub fn with_security(mut self, row: SecurityRow) -> Self {
        self.securities.push(row);
        self
    }
}

#[async_trait]
impl ReferenceDataSource for StaticSource {
    async fn fetch_exchanges(&self) -> SourceResult<Vec<ExchangeRow>> {
        Ok(self.exchanges.clone())
    }

    async fn fetch_securities(&self) -> SourceResult<Vec<SecurityRow>> {
        Ok(self.securities.clone())
    }
}

/// Shape of the JSON document behind [`JsonFileSource`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReferenceDataFile {
    exchanges: Vec<ExchangeRow>,
    securities: Vec<SecurityRow>,
}

/// File-backed source reading `{ "exchanges": [...], "securities": [...] }`.
///
/// The document is re-read on every fetch, so edits are picked up by the
/// next reload cycle.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> SourceResult<ReferenceDataFile> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&raw).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ReferenceDataSource for JsonFileSource {
    async fn fetch_exchanges(&self) -> SourceResult<Vec<ExchangeRow>> {
        Ok(self.read().await?.exchanges)
    }

    async fn fetch_securities(&self) -> SourceResult<Vec<SecurityRow>> {
        Ok(self.read().await?.securities)
    }
}
