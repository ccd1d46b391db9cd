//! Themis Ports
//!
//! Port definitions (traits) for the Themis reference-data store.
//! These define the boundaries between the reference-data core and its
//! external collaborators: the persistent store, the market-data subsystem
//! and the timezone database.

mod error;
mod market_data;
mod source;
mod tz;

pub use error::{SourceError, SourceResult};
pub use market_data::{LatestTrade, MarketDataFeed};
pub use source::{ExchangeRow, ReferenceDataSource, SecurityRow};
pub use tz::UtcOffsetSource;
