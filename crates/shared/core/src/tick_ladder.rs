//! Tick-size ladder: price-dependent minimum increments
//!
//! Exchanges quote the minimum price increment as a piecewise table over
//! reference-price bands. The ladder is built once from its text form and
//! never mutated afterwards; hot reload publishes a replacement ladder
//! instead of editing the current one in place.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ParseError, ParseResult};

/// Delimiters accepted between records of a serialized ladder
const RECORD_SEPARATORS: &[char] = &['\n', ';', '|', ','];

/// One price band of a tick-size ladder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickBand {
    /// Lowest reference price the band applies to; bands are ordered and
    /// matched by this field alone
    pub lower: f64,
    /// Upper edge of the band
    pub upper: f64,
    /// Minimum price increment inside the band
    pub value: f64,
}

/// Immutable tick-size table sorted by band lower bound
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickLadder {
    bands: Vec<TickBand>,
}

impl TickLadder {
    /// Parse a serialized ladder.
    ///
    /// Records are separated by any of newline, `;`, `|` or `,`; each record
    /// is three whitespace-separated numbers `<low> <up> <value>`. A single
    /// malformed record fails the whole parse, so a partial ladder is never
    /// produced. Input without any record yields `None` so callers keep
    /// whatever ladder they already publish.
    pub fn parse(text: &str) -> ParseResult<Option<Self>> {
        if text.is_empty() {
            return Ok(None);
        }
        let mut bands = Vec::new();
        for record in text
            .split(RECORD_SEPARATORS)
            .filter(|record| !record.is_empty())
        {
            bands.push(parse_band(record)?);
        }
        if bands.is_empty() {
            return Ok(None);
        }
        bands.sort_by(|a, b| a.lower.total_cmp(&b.lower));
        Ok(Some(Self { bands }))
    }

    /// Tick value for a reference price: the first band whose lower bound is
    /// not below the price. A probe equal to a band's lower bound selects
    /// that band; a probe above every lower bound matches nothing.
    pub fn value_at(&self, reference_price: f64) -> Option<f64> {
        let idx = self
            .bands
            .partition_point(|band| band.lower < reference_price);
        self.bands.get(idx).map(|band| band.value)
    }

    /// Bands in ascending `lower` order
    pub fn bands(&self) -> &[TickBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// Serialized form: comma-joined `<low> <up> <value>` triples, printed with
/// enough precision to re-parse to an equal ladder
impl fmt::Display for TickLadder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, band) in self.bands.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{} {} {}", band.lower, band.upper, band.value)?;
        }
        Ok(())
    }
}

fn parse_band(record: &str) -> ParseResult<TickBand> {
    let malformed = || ParseError::MalformedTickTable(record.to_string());
    let mut fields = record.split_whitespace();
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(low), Some(up), Some(value), None) => Ok(TickBand {
            lower: low.parse().map_err(|_| malformed())?,
            upper: up.parse().map_err(|_| malformed())?,
            value: value.parse().map_err(|_| malformed())?,
        }),
        _ => Err(malformed()),
    }
}
