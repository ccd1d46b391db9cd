use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use themis_core::{Date, ExchangeId, SecurityId};

use crate::error::SourceResult;

/// One exchange row from the source of record.
///
/// Missing columns deserialize to the field defaults: empty strings, `false`
/// for flags and `0` for the encoded periods, which the loader treats as
/// "leave the previous value in force".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRow {
    pub id: ExchangeId,
    pub name: String,
    pub mic: String,
    pub description: String,
    pub country: String,
    pub ib_name: String,
    pub bb_name: String,
    /// IANA timezone name, e.g. "Asia/Tokyo"
    pub timezone: String,
    /// Serialized tick-size ladder; empty keeps the published ladder
    pub tick_size_table: String,
    pub odd_lot_allowed: bool,
    /// Trading hours encoded as `HHMMHHMM`
    pub trade_period: i64,
    /// Lunch break encoded as `HHMMHHMM`
    pub break_period: i64,
    /// Early close on half days encoded as `HHMM`
    pub half_day: i64,
    /// Serialized half-day calendar; empty keeps the published calendar
    pub half_days: String,
}

/// One security row from the source of record.
///
/// Numeric columns whose absence must preserve the entity's previous value
/// are optional; everything else falls back to the usual defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityRow {
    pub id: SecurityId,
    pub symbol: String,
    pub local_symbol: String,
    /// Instrument classification, e.g. "STK", "FUT", "OPT"
    #[serde(rename = "type")]
    pub kind: String,
    pub currency: String,
    /// Listing exchange; `0` means the row carries no exchange reference
    pub exchange_id: ExchangeId,
    /// Underlying instrument for derivatives; `0` means none
    pub underlying_id: SecurityId,
    /// FX conversion factor; non-positive values default to 1
    pub rate: Option<f64>,
    /// Contract multiplier; non-positive values default to 1
    pub multiplier: Option<f64>,
    pub tick_size: Option<f64>,
    pub lot_size: Option<f64>,
    pub close_price: Option<f64>,
    pub strike_price: Option<f64>,
    /// `YYYYMMDD`
    pub maturity_date: Option<Date>,
    pub put_or_call: i32,
    /// Single-character option attribute; empty keeps the previous value
    pub opt_attribute: String,
    pub bbgid: String,
    pub cusip: String,
    pub isin: String,
    pub sedol: String,
    /// 20-day average daily volume
    pub adv20: f64,
    pub market_cap: f64,
    pub sector: i32,
    pub industry_group: i32,
    pub industry: i32,
    pub sub_industry: i32,
}

/// Port for the persistent store that supplies reference-data rows
///
/// Implementations are read-only. Retry and backoff policy belongs to the
/// reload driver, not to the catalog.
#[async_trait]
pub trait ReferenceDataSource: Send + Sync {
    /// Fetch every exchange row
    async fn fetch_exchanges(&self) -> SourceResult<Vec<ExchangeRow>>;

    /// Fetch every security row
    async fn fetch_securities(&self) -> SourceResult<Vec<SecurityRow>>;
}
