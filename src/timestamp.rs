//! Naive-UTC-on-disk timestamp policy.
//!
//! Every timestamp written to storage is converted to UTC and stored as naive
//! text; every timestamp read back is reattached to UTC as zone-aware. A
//! separate display conversion exists for the log viewer only and never touches
//! the stored value.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::warn;

/// Textual format for timestamps at rest (naive UTC, microsecond precision)
pub const STORED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const STORED_FORMAT_WITH_FRACTION: &str = "%Y-%m-%d %H:%M:%S%.f";
const STORED_FORMAT_NO_FRACTION: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of rehydrating a stored timestamp
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTimestamp {
    /// Matched one of the strict stored formats
    Exact(DateTime<Utc>),
    /// Recovered by a general-purpose parser; a data-quality warning, not a failure
    Degraded(DateTime<Utc>),
    /// Could not be interpreted; the raw text is passed through unconverted
    Unparsed(String),
}

impl ParsedTimestamp {
    /// The UTC instant, when one could be recovered
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            ParsedTimestamp::Exact(dt) | ParsedTimestamp::Degraded(dt) => Some(*dt),
            ParsedTimestamp::Unparsed(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ParsedTimestamp::Degraded(_))
    }
}

/// Render an instant in the stored format, converting to UTC and dropping the
/// zone. Zone-naive callers must go through [`assume_utc`] first.
pub fn to_stored<Z: TimeZone>(value: &DateTime<Z>) -> String {
    value
        .with_timezone(&Utc)
        .naive_utc()
        .format(STORED_FORMAT)
        .to_string()
}

/// Interpret a zone-naive datetime as already being UTC
pub fn assume_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

/// The current instant rendered in the stored format
pub fn now_stored() -> String {
    to_stored(&Utc::now())
}

/// Rehydrate stored text as a zone-aware UTC instant.
///
/// The strict stored formats (with and without fractional seconds) are tried
/// first. RFC 3339 and RFC 2822 act as the general-purpose fallback and yield a
/// degraded result. Text that defeats every parser is passed through raw with a
/// warning rather than failing the read.
pub fn parse_stored(raw: &str) -> ParsedTimestamp {
    let trimmed = raw.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, STORED_FORMAT_WITH_FRACTION) {
        return ParsedTimestamp::Exact(assume_utc(naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, STORED_FORMAT_NO_FRACTION) {
        return ParsedTimestamp::Exact(assume_utc(naive));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        warn!("Timestamp '{}' required a general-purpose parse", raw);
        return ParsedTimestamp::Degraded(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        warn!("Timestamp '{}' required a general-purpose parse", raw);
        return ParsedTimestamp::Degraded(dt.with_timezone(&Utc));
    }

    warn!("Timestamp '{}' could not be parsed, passing through raw", raw);
    ParsedTimestamp::Unparsed(raw.to_string())
}

/// Convert a stored-UTC instant to the display zone. Presentation only; the
/// stored value is never rewritten.
pub fn to_display_zone(value: DateTime<Utc>, zone: Tz) -> DateTime<Tz> {
    value.with_timezone(&zone)
}

/// Resolve an IANA zone identifier from configuration
pub fn parse_display_zone(name: &str) -> Result<Tz, String> {
    name.parse::<Tz>()
        .map_err(|e| format!("Unknown IANA timezone identifier '{}': {}", name, e))
}
