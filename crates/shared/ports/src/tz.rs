/// Port for timezone-name to UTC-offset resolution
///
/// Implementations must be pure with respect to the caller: no process-wide
/// civil-time state may remain altered after a lookup, and concurrent
/// lookups must not interfere with each other.
pub trait UtcOffsetSource: Send + Sync {
    /// Current UTC offset of the named zone in seconds, east positive;
    /// `None` when the name is not a known zone
    fn offset_seconds(&self, tz_name: &str) -> Option<i32>;
}
