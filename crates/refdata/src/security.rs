//! Security (instrument) metadata entity
//!
//! Same identity and publication rules as [`crate::exchange::Exchange`]:
//! created on first sight of its id, updated in place by snapshot swap,
//! never deleted during the process lifetime.

use arc_swap::{ArcSwap, ArcSwapOption};
use std::fmt;
use std::sync::Arc;

use themis_core::{Date, SecurityId};
use themis_ports::MarketDataFeed;

use crate::exchange::Exchange;

/// Scalar security fields, replaced as one snapshot on reload
#[derive(Debug, Clone)]
pub struct SecurityProfile {
    pub symbol: String,
    pub local_symbol: String,
    /// Instrument classification, e.g. "STK", "FUT", "OPT"
    pub kind: String,
    pub currency: String,
    /// FX conversion factor into the platform base currency, always positive
    pub rate: f64,
    /// Contract multiplier, always positive
    pub multiplier: f64,
    pub tick_size: f64,
    pub lot_size: f64,
    pub close_price: f64,
    pub strike_price: f64,
    /// `YYYYMMDD`, `0` when the instrument never expires
    pub maturity_date: Date,
    pub put_or_call: i32,
    pub opt_attribute: Option<char>,
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

impl Default for SecurityProfile {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            local_symbol: String::new(),
            kind: String::new(),
            currency: String::new(),
            rate: 1.0,
            multiplier: 1.0,
            tick_size: 0.0,
            lot_size: 0.0,
            close_price: 0.0,
            strike_price: 0.0,
            maturity_date: 0,
            put_or_call: 0,
            opt_attribute: None,
            bbgid: String::new(),
            cusip: String::new(),
            isin: String::new(),
            sedol: String::new(),
            adv20: 0.0,
            market_cap: 0.0,
            sector: 0,
            industry_group: 0,
            industry: 0,
            sub_industry: 0,
        }
    }
}

/// Security entity with lock-free readable state
pub struct Security {
    id: SecurityId,
    profile: ArcSwap<SecurityProfile>,
    /// Listing exchange; unset when the row referenced an unknown exchange
    exchange: ArcSwapOption<Exchange>,
    /// Underlying instrument, resolved after the full batch materializes
    underlying: ArcSwapOption<Security>,
}

impl Security {
    pub(crate) fn new(id: SecurityId) -> Arc<Self> {
        Arc::new(Self {
            id,
            profile: ArcSwap::from_pointee(SecurityProfile::default()),
            exchange: ArcSwapOption::empty(),
            underlying: ArcSwapOption::empty(),
        })
    }

    pub fn id(&self) -> SecurityId {
        self.id
    }

    /// Current scalar snapshot (lock-free)
    pub fn profile(&self) -> Arc<SecurityProfile> {
        self.profile.load_full()
    }

    pub fn symbol(&self) -> String {
        self.profile.load().symbol.clone()
    }

    pub(crate) fn publish_profile(&self, profile: SecurityProfile) {
        self.profile.store(Arc::new(profile));
    }

    /// Exchange the security trades on; `None` when the security was left
    /// unattached (lock-free)
    pub fn exchange(&self) -> Option<Arc<Exchange>> {
        self.exchange.load_full()
    }

    pub(crate) fn attach_exchange(&self, exchange: Arc<Exchange>) {
        self.exchange.store(Some(exchange));
    }

    /// Underlying instrument for derivatives (lock-free)
    pub fn underlying(&self) -> Option<Arc<Security>> {
        self.underlying.load_full()
    }

    pub(crate) fn attach_underlying(&self, underlying: Arc<Security>) {
        self.underlying.store(Some(underlying));
    }

    /// Latest traded price when the feed has a positive one, otherwise the
    /// stored closing price
    pub fn current_price(&self, feed: &dyn MarketDataFeed) -> f64 {
        let traded = feed
            .latest_trade(self.id)
            .map(|trade| trade.close)
            .unwrap_or(0.0);
        if traded > 0.0 {
            traded
        } else {
            self.profile.load().close_price
        }
    }
}

impl fmt::Debug for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Security")
            .field("id", &self.id)
            .field("symbol", &self.profile.load().symbol)
            .finish_non_exhaustive()
    }
}
