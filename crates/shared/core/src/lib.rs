//! Themis Core Domain
//!
//! Pure domain types for the Themis reference-data store.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod error;
pub mod half_days;
pub mod session;
pub mod tick_ladder;
pub mod values;

// Re-export commonly used types at crate root
pub use error::ParseError;
pub use half_days::HalfDayCalendar;
pub use session::{TimeOfDay, decode_period, decode_time_of_day, format_period, format_time_of_day};
pub use tick_ladder::{TickBand, TickLadder};
pub use values::{Date, ExchangeId, SecurityId};
