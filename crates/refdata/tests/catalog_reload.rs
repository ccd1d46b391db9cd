//! Catalog Reload Integration Test
//!
//! Exercises the full load cycle against an in-memory source:
//! 1. Exchange rows load and publish first
//! 2. Security rows resolve their exchange reference inline
//! 3. Underlying references resolve in a second pass
//! 4. The security-universe checksum is recomputed
//!
//! Plus the hot-reload guarantees: entity identity is preserved across
//! reloads, readers never block and never observe a half-built table.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use themis_ports::{ExchangeRow, SecurityRow, UtcOffsetSource};
use themis_refdata::{RefDataError, SecurityCatalog, StaticSource};

/// Deterministic stand-in for the timezone database
struct FixedOffsets;

impl UtcOffsetSource for FixedOffsets {
    fn offset_seconds(&self, tz_name: &str) -> Option<i32> {
        match tz_name {
            "Asia/Tokyo" => Some(9 * 3600),
            "America/New_York" => Some(-5 * 3600),
            _ => None,
        }
    }
}

fn tokyo_row() -> ExchangeRow {
    ExchangeRow {
        id: 1,
        name: "TSE".to_string(),
        mic: "XTKS".to_string(),
        country: "JP".to_string(),
        timezone: "Asia/Tokyo".to_string(),
        tick_size_table: "0 1000 0.1,1000 5000 0.5".to_string(),
        odd_lot_allowed: false,
        trade_period: 9001500,
        break_period: 11301230,
        half_day: 1130,
        half_days: "20241231,20240102".to_string(),
        ..Default::default()
    }
}

fn security_row(id: i64, symbol: &str, exchange_id: u32) -> SecurityRow {
    SecurityRow {
        id,
        symbol: symbol.to_string(),
        kind: "STK".to_string(),
        currency: "JPY".to_string(),
        exchange_id,
        lot_size: Some(100.0),
        close_price: Some(250.0),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_full_load_cycle() {
    let _ = env_logger::try_init();

    let source = StaticSource::default()
        .with_exchange(tokyo_row())
        .with_security(security_row(100, "8301", 1))
        .with_security(security_row(101, "8306", 1));

    let catalog = SecurityCatalog::new();
    let stats = catalog.load_from(&source, &FixedOffsets).await.unwrap();

    assert_eq!(stats.exchanges, 1);
    assert_eq!(stats.securities, 2);
    assert_eq!(stats.unresolved_exchanges, 0);
    assert_eq!(stats.unresolved_underlyings, 0);

    let exchange = catalog.exchange(1).unwrap();
    let profile = exchange.profile();
    assert_eq!(profile.name, "TSE");
    assert_eq!(profile.mic, "XTKS");
    assert_eq!(profile.utc_offset_secs, 9 * 3600);
    assert_eq!(exchange.trading_period_text(), "9:00-15:00");
    assert_eq!(exchange.break_period_text(), "11:30-12:30");
    assert_eq!(exchange.half_day_text(), "11:30");
    assert!(exchange.is_half_day(20241231));
    assert_eq!(exchange.tick_size(500.0), 0.1);
    assert_eq!(exchange.tick_size(1000.0), 0.5);
    assert_eq!(exchange.tick_size(100_000.0), 0.0);

    // Name index and per-exchange symbol index both resolve
    let by_name = catalog.exchange_by_name("TSE").unwrap();
    assert!(Arc::ptr_eq(&exchange, &by_name));
    let security = exchange.security("8301").unwrap();
    assert_eq!(security.id(), 100);
    assert!(Arc::ptr_eq(&security.exchange().unwrap(), &exchange));
    assert_eq!(security.profile().lot_size, 100.0);
}

#[tokio::test]
async fn test_reload_preserves_entity_identity() {
    let catalog = SecurityCatalog::new();

    let source = StaticSource::default()
        .with_exchange(tokyo_row())
        .with_security(security_row(100, "8301", 1));
    catalog.load_from(&source, &FixedOffsets).await.unwrap();

    let security = catalog.security(100).unwrap();
    let exchange_before = security.exchange().unwrap();
    assert_eq!(exchange_before.tick_size(500.0), 0.1);

    // Second load, same exchange id, different tick-size schedule
    let mut updated = tokyo_row();
    updated.tick_size_table = "0 1000 0.2,1000 5000 1".to_string();
    let source = StaticSource::default()
        .with_exchange(updated)
        .with_security(security_row(100, "8301", 1));
    catalog.load_from(&source, &FixedOffsets).await.unwrap();

    // The handle held from before the reload is still the entity itself,
    // and it observes the new schedule without being re-fetched.
    let exchange_after = catalog.exchange(1).unwrap();
    assert!(Arc::ptr_eq(&exchange_before, &exchange_after));
    assert!(Arc::ptr_eq(
        &catalog.security(100).unwrap().exchange().unwrap(),
        &exchange_before
    ));
    assert_eq!(exchange_before.tick_size(500.0), 0.2);
}

#[tokio::test]
async fn test_underlying_resolves_forward_reference() {
    let catalog = SecurityCatalog::new();

    // The option row appears before its underlying stock row
    let mut option = security_row(200, "8301C", 1);
    option.kind = "OPT".to_string();
    option.underlying_id = 201;
    let stock = security_row(201, "8301", 1);

    let source = StaticSource::default()
        .with_exchange(tokyo_row())
        .with_security(option)
        .with_security(stock);
    let stats = catalog.load_from(&source, &FixedOffsets).await.unwrap();
    assert_eq!(stats.unresolved_underlyings, 0);

    let option = catalog.security(200).unwrap();
    let underlying = option.underlying().unwrap();
    assert_eq!(underlying.id(), 201);
    assert!(Arc::ptr_eq(&underlying, &catalog.security(201).unwrap()));
}

#[tokio::test]
async fn test_unresolved_references_degrade_gracefully() {
    let catalog = SecurityCatalog::new();

    let mut orphan = security_row(300, "GHOST", 99); // unknown exchange
    orphan.underlying_id = 12345; // unknown underlying

    let source = StaticSource::default()
        .with_exchange(tokyo_row())
        .with_security(orphan);
    let stats = catalog.load_from(&source, &FixedOffsets).await.unwrap();

    assert_eq!(stats.unresolved_exchanges, 1);
    assert_eq!(stats.unresolved_underlyings, 1);

    // The security loads anyway, unattached
    let security = catalog.security(300).unwrap();
    assert!(security.exchange().is_none());
    assert!(security.underlying().is_none());
}

#[tokio::test]
async fn test_checksum_stability_and_sensitivity() {
    let catalog = SecurityCatalog::new();
    let source = StaticSource::default()
        .with_exchange(tokyo_row())
        .with_security(security_row(100, "8301", 1))
        .with_security(security_row(101, "8306", 1));

    catalog.load_from(&source, &FixedOffsets).await.unwrap();
    let first = catalog.checksum();
    assert_eq!(first.len(), 64); // hex-encoded SHA-256

    // Identical universe, identical fingerprint
    catalog.load_from(&source, &FixedOffsets).await.unwrap();
    assert_eq!(*catalog.checksum(), *first);

    // Changing an identity-relevant field moves the fingerprint
    let mut changed = security_row(101, "8306", 1);
    changed.lot_size = Some(1000.0);
    let source = StaticSource::default()
        .with_exchange(tokyo_row())
        .with_security(security_row(100, "8301", 1))
        .with_security(changed);
    catalog.load_from(&source, &FixedOffsets).await.unwrap();
    assert_ne!(*catalog.checksum(), *first);
}

#[tokio::test]
async fn test_malformed_table_aborts_load_and_keeps_published_state() {
    let catalog = SecurityCatalog::new();
    let source = StaticSource::default()
        .with_exchange(tokyo_row())
        .with_security(security_row(100, "8301", 1));
    catalog.load_from(&source, &FixedOffsets).await.unwrap();
    let checksum_before = catalog.checksum();

    let mut corrupt = tokyo_row();
    corrupt.tick_size_table = "0 1000".to_string();
    let source = StaticSource::default()
        .with_exchange(corrupt)
        .with_security(security_row(100, "8301", 1));

    let err = catalog.load_from(&source, &FixedOffsets).await.unwrap_err();
    assert!(matches!(err, RefDataError::Parse(_)));
    assert!(err.to_string().contains("<low_price> <up_price> <value>"));

    // Previously published state is intact
    assert_eq!(catalog.exchange(1).unwrap().tick_size(500.0), 0.1);
    assert_eq!(*catalog.checksum(), *checksum_before);
}

#[tokio::test]
async fn test_empty_table_text_keeps_previous_ladder() {
    let catalog = SecurityCatalog::new();
    catalog
        .load_from(
            &StaticSource::default().with_exchange(tokyo_row()),
            &FixedOffsets,
        )
        .await
        .unwrap();

    let mut bare = tokyo_row();
    bare.tick_size_table = String::new();
    bare.half_days = String::new();
    catalog
        .load_from(
            &StaticSource::default().with_exchange(bare),
            &FixedOffsets,
        )
        .await
        .unwrap();

    let exchange = catalog.exchange(1).unwrap();
    assert_eq!(exchange.tick_size(500.0), 0.1);
    assert!(exchange.is_half_day(20241231));
}

#[tokio::test]
async fn test_unknown_timezone_defaults_to_utc() {
    let catalog = SecurityCatalog::new();
    let mut row = tokyo_row();
    row.timezone = "Atlantis/Lost".to_string();
    catalog
        .load_from(&StaticSource::default().with_exchange(row), &FixedOffsets)
        .await
        .unwrap();
    assert_eq!(catalog.exchange(1).unwrap().profile().utc_offset_secs, 0);
}

#[tokio::test]
async fn test_readers_never_observe_partial_ladder() {
    let catalog = SecurityCatalog::new();
    catalog
        .load_from(
            &StaticSource::default().with_exchange(tokyo_row()),
            &FixedOffsets,
        )
        .await
        .unwrap();
    let exchange = catalog.exchange(1).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let mut readers = Vec::new();
    for _ in 0..4 {
        let exchange = Arc::clone(&exchange);
        let stop = Arc::clone(&stop);
        readers.push(std::thread::spawn(move || {
            let mut observations = 0u64;
            while !stop.load(Ordering::Relaxed) {
                // Either the old table (0.1) or the new one (0.2), never a
                // torn mix and never a block
                let tick = exchange.tick_size(500.0);
                assert!(tick == 0.1 || tick == 0.2, "unexpected tick {}", tick);
                observations += 1;
            }
            observations
        }));
    }

    // Writer keeps swapping between the two schedules
    for _ in 0..1000 {
        exchange.update_tick_ladder("0 1000 0.2,1000 5000 1").unwrap();
        exchange.update_tick_ladder("0 1000 0.1,1000 5000 0.5").unwrap();
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
}
