//! Half-day calendar: dates on which an exchange closes early

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ParseError, ParseResult};
use crate::values::Date;

/// Delimiters accepted between dates of a serialized calendar
const DATE_SEPARATORS: &[char] = &['\n', ';', '|', ',', ' ', '\t'];

/// Immutable set of `YYYYMMDD` dates with an early market close.
///
/// Dates iterate (and serialize) in ascending order, so the same input
/// always produces the same text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfDayCalendar {
    days: BTreeSet<Date>,
}

impl HalfDayCalendar {
    /// Parse a serialized calendar.
    ///
    /// Dates are separated by newline, `;`, `|`, `,`, space or tab. Tokens
    /// that are not positive integers are dropped; a non-empty input in
    /// which no token survives is an error. Empty input yields `None` so
    /// callers keep whatever calendar they already publish.
    pub fn parse(text: &str) -> ParseResult<Option<Self>> {
        if text.is_empty() {
            return Ok(None);
        }
        let days: BTreeSet<Date> = text
            .split(DATE_SEPARATORS)
            .filter_map(|token| token.parse::<Date>().ok())
            .filter(|&day| day > 0)
            .collect();
        if days.is_empty() {
            return Err(ParseError::MalformedHalfDays(text.to_string()));
        }
        Ok(Some(Self { days }))
    }

    /// Whether the given `YYYYMMDD` date is a half day
    pub fn contains(&self, date: Date) -> bool {
        self.days.contains(&date)
    }

    /// Dates in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Date> + '_ {
        self.days.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Serialized form: comma-joined dates in ascending order
impl fmt::Display for HalfDayCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, day) in self.days.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", day)?;
        }
        Ok(())
    }
}
