//! Exchange metadata entity
//!
//! An [`Exchange`] is identity-stable: the catalog creates it on first
//! sight of its id and updates it in place on every later reload, so
//! components holding an `Arc<Exchange>` keep observing updates. All
//! mutable state sits behind atomic snapshot swaps; readers are lock-free.
//!
//! ```text
//! Reader 1 ──► load() ──► Arc<TickLadder> ──► lookup (never blocked)
//! Reader 2 ──► load() ──► Arc<TickLadder> ──► lookup (never blocked)
//! Writer   ──► parse + sort off to the side ──► store() ──► atomic swap
//! ```

use arc_swap::{ArcSwap, ArcSwapOption};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use themis_core::{
    Date, ExchangeId, HalfDayCalendar, TickLadder, format_period, format_time_of_day,
};

use crate::error::Result;
use crate::security::Security;

/// Scalar exchange fields, replaced as one snapshot on reload
#[derive(Debug, Clone, Default)]
pub struct ExchangeProfile {
    /// Unique display name, also a catalog lookup key
    pub name: String,
    /// ISO 10383 Market Identifier Code
    pub mic: String,
    pub description: String,
    pub country: String,
    /// Interactive Brokers alias
    pub ib_name: String,
    /// Bloomberg alias
    pub bb_name: String,
    /// IANA timezone name the offset was derived from
    pub timezone: String,
    /// UTC offset in seconds, east positive, computed once per load
    pub utc_offset_secs: i32,
    pub odd_lot_allowed: bool,
    /// Trading hours, seconds since midnight local time
    pub trade_start: u32,
    pub trade_end: u32,
    /// Lunch break, seconds since midnight local time
    pub break_start: u32,
    pub break_end: u32,
    /// Early close on half days, seconds since midnight local time
    pub half_day_close: u32,
}

/// Exchange entity with lock-free readable state
pub struct Exchange {
    id: ExchangeId,
    profile: ArcSwap<ExchangeProfile>,
    tick_ladder: ArcSwapOption<TickLadder>,
    half_days: ArcSwapOption<HalfDayCalendar>,
    /// Symbol index for this exchange; the entities are owned by the catalog
    securities: DashMap<String, Arc<Security>>,
}

impl Exchange {
    pub(crate) fn new(id: ExchangeId) -> Arc<Self> {
        Arc::new(Self {
            id,
            profile: ArcSwap::from_pointee(ExchangeProfile::default()),
            tick_ladder: ArcSwapOption::empty(),
            half_days: ArcSwapOption::empty(),
            securities: DashMap::new(),
        })
    }

    pub fn id(&self) -> ExchangeId {
        self.id
    }

    /// Current scalar snapshot (lock-free)
    pub fn profile(&self) -> Arc<ExchangeProfile> {
        self.profile.load_full()
    }

    pub fn name(&self) -> String {
        self.profile.load().name.clone()
    }

    pub(crate) fn publish_profile(&self, profile: ExchangeProfile) {
        self.profile.store(Arc::new(profile));
    }

    /// Tick size for a reference price; `0` when no ladder is published or
    /// the price is above every band (lock-free)
    pub fn tick_size(&self, reference_price: f64) -> f64 {
        match &*self.tick_ladder.load() {
            Some(ladder) => ladder.value_at(reference_price).unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// Current ladder snapshot (lock-free)
    pub fn tick_ladder(&self) -> Option<Arc<TickLadder>> {
        self.tick_ladder.load_full()
    }

    /// Replace the tick-size ladder from its text form.
    ///
    /// Empty input keeps the published ladder; a malformed record rejects
    /// the whole update and keeps the published ladder as well. This is the
    /// administrative edit path; the reload path parses before publishing
    /// anything.
    pub fn update_tick_ladder(&self, text: &str) -> Result<()> {
        if let Some(ladder) = TickLadder::parse(text)? {
            self.set_tick_ladder(ladder);
        }
        Ok(())
    }

    pub(crate) fn set_tick_ladder(&self, ladder: TickLadder) {
        self.tick_ladder.store(Some(Arc::new(ladder)));
    }

    /// Serialized form of the published ladder; empty when none
    pub fn tick_ladder_text(&self) -> String {
        match &*self.tick_ladder.load() {
            Some(ladder) => ladder.to_string(),
            None => String::new(),
        }
    }

    /// Current calendar snapshot (lock-free)
    pub fn half_days(&self) -> Option<Arc<HalfDayCalendar>> {
        self.half_days.load_full()
    }

    /// Replace the half-day calendar from its text form.
    ///
    /// Same no-op and rejection rules as [`Exchange::update_tick_ladder`],
    /// except that a non-empty list without a single valid date is an error
    /// rather than a no-op.
    pub fn update_half_days(&self, text: &str) -> Result<()> {
        if let Some(calendar) = HalfDayCalendar::parse(text)? {
            self.set_half_days(calendar);
        }
        Ok(())
    }

    pub(crate) fn set_half_days(&self, calendar: HalfDayCalendar) {
        self.half_days.store(Some(Arc::new(calendar)));
    }

    /// Serialized form of the published calendar; empty when none
    pub fn half_days_text(&self) -> String {
        match &*self.half_days.load() {
            Some(calendar) => calendar.to_string(),
            None => String::new(),
        }
    }

    /// Whether the exchange closes early on the given `YYYYMMDD` date
    /// (lock-free)
    pub fn is_half_day(&self, date: Date) -> bool {
        self.half_days
            .load()
            .as_ref()
            .is_some_and(|days| days.contains(date))
    }

    /// Trading hours as `H:MM-H:MM`
    pub fn trading_period_text(&self) -> String {
        let profile = self.profile.load();
        format_period(profile.trade_start, profile.trade_end)
    }

    /// Lunch break as `H:MM-H:MM`
    pub fn break_period_text(&self) -> String {
        let profile = self.profile.load();
        format_period(profile.break_start, profile.break_end)
    }

    /// Half-day early close as `H:MM`
    pub fn half_day_text(&self) -> String {
        format_time_of_day(self.profile.load().half_day_close)
    }

    /// Security listed on this exchange under `symbol` (lock-free)
    pub fn security(&self, symbol: &str) -> Option<Arc<Security>> {
        self.securities.get(symbol).map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) fn index_security(&self, symbol: String, security: Arc<Security>) {
        self.securities.insert(symbol, security);
    }

    /// Number of securities listed on this exchange
    pub fn security_count(&self) -> usize {
        self.securities.len()
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("id", &self.id)
            .field("name", &self.profile.load().name)
            .finish_non_exhaustive()
    }
}
