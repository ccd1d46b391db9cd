use themis_core::SecurityId;

/// Latest trade as published by the market-data subsystem
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestTrade {
    /// Price of the most recent trade; zero or negative when unknown
    pub close: f64,
}

/// Port for live trade prices
///
/// The read path is synchronous: implementations are expected to serve from
/// an in-process cache, never to block on the wire.
pub trait MarketDataFeed: Send + Sync {
    /// Most recent trade for a security, if the feed has seen one
    fn latest_trade(&self, security: SecurityId) -> Option<LatestTrade>;
}
