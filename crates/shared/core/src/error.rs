use thiserror::Error;

/// Errors produced while parsing the reference-data text encodings
///
/// The messages are user-visible: administrative edits of a tick-size
/// schedule or half-day list surface them verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid tick size record '{0}', expected '<low_price> <up_price> <value>,...'")]
    MalformedTickTable(String),

    #[error("no valid dates in '{0}', expected '<YYYYmmdd>,...'")]
    MalformedHalfDays(String),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
