use themis_core::ParseError;
use themis_ports::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefDataError {
    #[error("invalid reference data: {0}")]
    Parse(#[from] ParseError),

    #[error("reference data source: {0}")]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, RefDataError>;
