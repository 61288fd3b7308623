//! Lightning strike events
//!
//! Raw records come straight from the lightning feed (or the cache, which
//! stores them verbatim). Numeric fields may arrive as JSON numbers or strings,
//! so parsing is lenient: a record is only turned into a [`Strike`] when both
//! coordinates parse and fall inside the region.

pub mod meteogalicia;
pub mod stats;
pub mod store;

use crate::coord::{Coordinates, RegionBounds};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A JSON value that should be a number but is sometimes sent as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Finite numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A strike record as delivered by the feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStrike {
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<Numeric>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<Numeric>,

    #[serde(
        rename = "peakCurrent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub peak_current: Option<Numeric>,
}

impl RawStrike {
    /// Convenience constructor for numeric records
    pub fn new(lat: f64, lon: f64, peak_current: f64, timestamp: Option<&str>) -> Self {
        Self {
            timestamp: timestamp.map(str::to_string),
            lat: Some(lat.into()),
            lon: Some(lon.into()),
            peak_current: Some(peak_current.into()),
        }
    }

    /// Parsed position, if both coordinates are numeric
    pub fn position(&self) -> Option<Coordinates> {
        let lat = self.lat.as_ref()?.as_f64()?;
        let lon = self.lon.as_ref()?.as_f64()?;
        Some(Coordinates::new(lat, lon))
    }
}

/// Sign of a strike's peak current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    /// Zero or unreported current
    Unknown,
}

/// A validated strike inside the region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strike {
    pub position: Coordinates,
    /// Source-reported time; `None` when the feed's value is unparseable
    pub timestamp: Option<NaiveDateTime>,
    /// Signed peak current in kA (0 when unreported)
    pub peak_current: f64,
}

impl Strike {
    pub fn new(position: Coordinates, timestamp: Option<NaiveDateTime>, peak_current: f64) -> Self {
        Self {
            position,
            timestamp,
            peak_current,
        }
    }

    pub fn polarity(&self) -> Polarity {
        if self.peak_current > 0.0 {
            Polarity::Positive
        } else if self.peak_current < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Unknown
        }
    }

    /// Build a strike from a raw record, or `None` if the record has no usable
    /// position or lies outside `bounds`
    pub fn from_raw(raw: &RawStrike, bounds: &RegionBounds) -> Option<Self> {
        let position = raw.position()?;
        if !bounds.contains(position) {
            return None;
        }
        let timestamp = raw.timestamp.as_deref().and_then(parse_timestamp);
        let peak_current = raw
            .peak_current
            .as_ref()
            .and_then(Numeric::as_f64)
            .unwrap_or(0.0);
        Some(Self::new(position, timestamp, peak_current))
    }
}

/// Parse the timestamp formats seen in the feed
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    const FORMATS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d-%m-%Y %H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Keep the records that parse and fall inside `bounds`, in input order
pub fn valid_strikes(raw: &[RawStrike], bounds: &RegionBounds) -> Vec<Strike> {
    raw.iter()
        .filter_map(|r| Strike::from_raw(r, bounds))
        .collect()
}

/// Take every `ceil(len / cap)`-th item so at most `cap` remain
pub fn sample_evenly<T: Clone>(items: &[T], cap: usize) -> Vec<T> {
    if cap == 0 {
        return Vec::new();
    }
    if items.len() <= cap {
        return items.to_vec();
    }
    let step = items.len().div_ceil(cap);
    items.iter().step_by(step).cloned().collect()
}
