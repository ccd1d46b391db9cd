//! Themis Reference Data
//!
//! The concurrent reference-data cache of the Themis trading platform:
//! exchange and security metadata (trading calendars, tick-size ladders,
//! identifiers, pricing multipliers) served lock-free to any number of
//! reader threads while a single writer periodically reloads it from the
//! source of record.
//!
//! Publication discipline:
//! - Readers acquire an immutable snapshot (tick ladder, half-day calendar,
//!   entity profile) in one atomic step and keep using it for the duration
//!   of the call, so they can never observe a half-built table.
//! - Writers build replacement snapshots fully off to the side and publish
//!   them with a single atomic swap; the replaced snapshot is released once
//!   the last reader's hold lapses.
//! - Entities themselves are identity-stable: an `Arc<Exchange>` or
//!   `Arc<Security>` handed out once keeps observing updates across
//!   reloads without being re-fetched.

pub mod catalog;
pub mod error;
pub mod exchange;
pub mod security;
pub mod sources;
pub mod tz;

// Re-export main types for convenience
pub use catalog::{LoadStats, SecurityCatalog};
pub use error::{RefDataError, Result};
pub use exchange::{Exchange, ExchangeProfile};
pub use security::{Security, SecurityProfile};
pub use sources::{JsonFileSource, StaticSource};
pub use tz::TzDatabase;
