//! Timezone-offset resolution backed by the embedded IANA database
//!
//! The offset is derived once per load of an exchange's timezone name, not
//! on every access; see [`crate::catalog::SecurityCatalog`].

use chrono::{Offset, Utc};
use chrono_tz::Tz;

use themis_ports::UtcOffsetSource;

/// [`UtcOffsetSource`] over the compiled-in IANA timezone database.
///
/// Resolution is reentrant and touches no process-wide civil-time state,
/// so concurrent unrelated time computations are never affected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzDatabase;

impl TzDatabase {
    pub fn new() -> Self {
        Self
    }
}

impl UtcOffsetSource for TzDatabase {
    fn offset_seconds(&self, tz_name: &str) -> Option<i32> {
        let tz: Tz = tz_name.parse().ok()?;
        let now = Utc::now().with_timezone(&tz);
        Some(now.offset().fix().local_minus_utc())
    }
}
