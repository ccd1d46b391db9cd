/// Exchange identifier assigned by the source of record
pub type ExchangeId = u32;

/// Security identifier assigned by the source of record
pub type SecurityId = i64;

/// Calendar date encoded as `YYYYMMDD`
pub type Date = u32;
