//! Security catalog: the top-level registry of exchanges and securities
//!
//! One writer at a time runs the load cycle against the source of record
//! while any number of readers keep resolving lookups. Per load cycle:
//!
//! ```text
//! fetch exchanges ──► publish exchanges ──► fetch securities
//!     ──► resolve exchange refs inline ──► resolve underlyings (2nd pass)
//!     ──► recompute checksum
//! ```
//!
//! Entities are created on first sight of an id and updated in place
//! afterwards; they are never deleted. A malformed tick-size table or
//! half-day list aborts the entire cycle and leaves previously published
//! state intact.

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::Mutex;

use themis_core::{
    ExchangeId, HalfDayCalendar, SecurityId, TickLadder, decode_period, decode_time_of_day,
};
use themis_ports::{ExchangeRow, ReferenceDataSource, SecurityRow, UtcOffsetSource};

use crate::error::Result;
use crate::exchange::{Exchange, ExchangeProfile};
use crate::security::{Security, SecurityProfile};

/// Summary of one load cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStats {
    /// Exchange rows processed
    pub exchanges: usize,
    /// Security rows processed
    pub securities: usize,
    /// Rows whose exchange id was unknown; the security stays unattached
    pub unresolved_exchanges: usize,
    /// Staged underlying references whose target never materialized
    pub unresolved_underlyings: usize,
    pub completed_at: DateTime<Utc>,
}

/// Top-level registry owning every exchange and security entity.
///
/// Lookups are lock-free and may run concurrently with a reload; the
/// reload itself is serialized so only one writer is ever in flight.
pub struct SecurityCatalog {
    exchanges: DashMap<ExchangeId, Arc<Exchange>>,
    exchanges_by_name: DashMap<String, Arc<Exchange>>,
    securities: DashMap<SecurityId, Arc<Security>>,
    /// Fingerprint of the security universe, recomputed after every load
    checksum: ArcSwap<String>,
    /// Serializes writers; readers never touch it
    reload: Mutex<()>,
}

impl SecurityCatalog {
    pub fn new() -> Self {
        Self {
            exchanges: DashMap::new(),
            exchanges_by_name: DashMap::new(),
            securities: DashMap::new(),
            checksum: ArcSwap::from_pointee(String::new()),
            reload: Mutex::new(()),
        }
    }

    /// Run one load cycle against the source of record.
    ///
    /// Exchange rows load first so security rows can resolve their exchange
    /// reference inline; underlying references are staged and resolved once
    /// the whole batch is materialized, because a row may reference a
    /// security that appears later in the same result set.
    pub async fn load_from(
        &self,
        source: &dyn ReferenceDataSource,
        offsets: &dyn UtcOffsetSource,
    ) -> Result<LoadStats> {
        let _writer = self.reload.lock().await;

        let exchange_rows = source.fetch_exchanges().await?;
        for row in &exchange_rows {
            self.load_exchange(row, offsets)?;
        }

        let security_rows = source.fetch_securities().await?;
        let mut staged: Vec<(Arc<Security>, SecurityId)> = Vec::new();
        let mut unresolved_exchanges = 0;
        for row in &security_rows {
            let (security, resolved) = self.load_security(row);
            if !resolved {
                unresolved_exchanges += 1;
            }
            if row.underlying_id > 0 {
                staged.push((security, row.underlying_id));
            }
        }

        let mut unresolved_underlyings = 0;
        for (security, underlying_id) in staged {
            match self.securities.get(&underlying_id) {
                Some(underlying) => security.attach_underlying(Arc::clone(underlying.value())),
                None => {
                    unresolved_underlyings += 1;
                    warn!(
                        "security {} references unknown underlying {}",
                        security.id(),
                        underlying_id
                    );
                }
            }
        }

        self.update_checksum();

        info!(
            "{} securities loaded across {} exchanges",
            self.securities.len(),
            self.exchanges.len()
        );
        Ok(LoadStats {
            exchanges: exchange_rows.len(),
            securities: security_rows.len(),
            unresolved_exchanges,
            unresolved_underlyings,
            completed_at: Utc::now(),
        })
    }

    /// Exchange by id (lock-free)
    pub fn exchange(&self, id: ExchangeId) -> Option<Arc<Exchange>> {
        self.exchanges.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Exchange by display name (lock-free).
    ///
    /// The index keeps the latest mapping for each name; a name abandoned
    /// by a rename keeps resolving to its old entity until it is reused.
    pub fn exchange_by_name(&self, name: &str) -> Option<Arc<Exchange>> {
        self.exchanges_by_name
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Security by id (lock-free)
    pub fn security(&self, id: SecurityId) -> Option<Arc<Security>> {
        self.securities.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.len()
    }

    pub fn security_count(&self) -> usize {
        self.securities.len()
    }

    /// Current security-universe fingerprint (lock-free).
    ///
    /// Callers compare successive values to cheaply detect that a full
    /// resync happened; this is not integrity protection.
    pub fn checksum(&self) -> Arc<String> {
        self.checksum.load_full()
    }

    fn load_exchange(&self, row: &ExchangeRow, offsets: &dyn UtcOffsetSource) -> Result<()> {
        // Parse the variable-length tables before touching any published
        // state, so a malformed row aborts without a half-applied exchange.
        let ladder = TickLadder::parse(&row.tick_size_table)?;
        let calendar = HalfDayCalendar::parse(&row.half_days)?;

        let (exchange, previous) = match self.exchange(row.id) {
            Some(exchange) => {
                let previous = exchange.profile();
                (exchange, previous)
            }
            None => (Exchange::new(row.id), Arc::new(ExchangeProfile::default())),
        };

        let mut profile = ExchangeProfile {
            name: row.name.clone(),
            mic: row.mic.clone(),
            description: row.description.clone(),
            country: row.country.clone(),
            ib_name: row.ib_name.clone(),
            bb_name: row.bb_name.clone(),
            timezone: row.timezone.clone(),
            utc_offset_secs: previous.utc_offset_secs,
            odd_lot_allowed: row.odd_lot_allowed,
            trade_start: previous.trade_start,
            trade_end: previous.trade_end,
            break_start: previous.break_start,
            break_end: previous.break_end,
            half_day_close: previous.half_day_close,
        };
        if !row.timezone.is_empty() {
            match offsets.offset_seconds(&row.timezone) {
                Some(offset) => profile.utc_offset_secs = offset,
                None => {
                    profile.utc_offset_secs = 0;
                    warn!("exchange {}: unknown timezone '{}'", row.id, row.timezone);
                }
            }
        }
        if let Some((start, end)) = decode_period(row.trade_period) {
            profile.trade_start = start;
            profile.trade_end = end;
        }
        if let Some((start, end)) = decode_period(row.break_period) {
            profile.break_start = start;
            profile.break_end = end;
        }
        if let Some(close) = decode_time_of_day(row.half_day) {
            profile.half_day_close = close;
        }

        if let Some(ladder) = ladder {
            exchange.set_tick_ladder(ladder);
        }
        if let Some(calendar) = calendar {
            exchange.set_half_days(calendar);
        }
        exchange.publish_profile(profile);

        // Publication: a brand-new entity only becomes reachable fully
        // constructed; an existing one was updated in place above.
        self.exchanges.insert(row.id, Arc::clone(&exchange));
        self.exchanges_by_name.insert(row.name.clone(), exchange);
        Ok(())
    }

    /// Returns the entity and whether its exchange reference resolved.
    /// Rows without an exchange reference (`exchange_id == 0`) count as
    /// resolved; they are simply unattached.
    fn load_security(&self, row: &SecurityRow) -> (Arc<Security>, bool) {
        let (security, previous) = match self.security(row.id) {
            Some(security) => {
                let previous = security.profile();
                (security, previous)
            }
            None => (Security::new(row.id), Arc::new(SecurityProfile::default())),
        };

        let mut profile = SecurityProfile {
            symbol: row.symbol.clone(),
            local_symbol: row.local_symbol.clone(),
            kind: row.kind.clone(),
            currency: row.currency.clone(),
            rate: row.rate.unwrap_or(previous.rate),
            multiplier: row.multiplier.unwrap_or(previous.multiplier),
            tick_size: row.tick_size.unwrap_or(previous.tick_size),
            lot_size: row.lot_size.unwrap_or(previous.lot_size),
            close_price: row.close_price.unwrap_or(previous.close_price),
            strike_price: row.strike_price.unwrap_or(previous.strike_price),
            maturity_date: row.maturity_date.unwrap_or(previous.maturity_date),
            put_or_call: row.put_or_call,
            opt_attribute: row.opt_attribute.chars().next().or(previous.opt_attribute),
            bbgid: row.bbgid.clone(),
            cusip: row.cusip.clone(),
            isin: row.isin.clone(),
            sedol: row.sedol.clone(),
            adv20: row.adv20,
            market_cap: row.market_cap,
            sector: row.sector,
            industry_group: row.industry_group,
            industry: row.industry,
            sub_industry: row.sub_industry,
        };
        if profile.rate <= 0.0 {
            profile.rate = 1.0;
        }
        if profile.multiplier <= 0.0 {
            profile.multiplier = 1.0;
        }
        security.publish_profile(profile);

        // Exchange rows load first, so the reference resolves inline; an
        // unknown id leaves the security unattached.
        let resolved = if row.exchange_id != 0 {
            match self.exchange(row.exchange_id) {
                Some(exchange) => {
                    exchange.index_security(row.symbol.clone(), Arc::clone(&security));
                    security.attach_exchange(exchange);
                    true
                }
                None => {
                    warn!(
                        "security {} references unknown exchange {}",
                        row.id, row.exchange_id
                    );
                    false
                }
            }
        } else {
            true
        };

        self.securities.insert(row.id, Arc::clone(&security));
        (security, resolved)
    }

    /// Recompute the security-universe fingerprint: SHA-256 over every
    /// security's `(id, symbol, exchange name, kind, lot size, multiplier)`
    /// in ascending id order, so identical universes always fingerprint
    /// identically. Unattached securities contribute an empty exchange name.
    fn update_checksum(&self) {
        let mut entries: Vec<(SecurityId, Arc<Security>)> = self
            .securities
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);

        let mut identity = String::new();
        for (id, security) in entries {
            let profile = security.profile();
            let exchange_name = security.exchange().map(|e| e.name()).unwrap_or_default();
            let _ = write!(
                identity,
                "{}{}{}{}{}{}",
                id, profile.symbol, exchange_name, profile.kind, profile.lot_size,
                profile.multiplier
            );
        }

        let mut hasher = Sha256::new();
        hasher.update(identity.as_bytes());
        self.checksum.store(Arc::new(hex::encode(hasher.finalize())));
    }
}

impl Default for SecurityCatalog {
    fn default() -> Self {
        Self::new()
    }
}
