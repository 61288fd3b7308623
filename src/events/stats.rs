//! Summary statistics over a strike set

use super::{Polarity, Strike};
use crate::coord::Coordinates;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One notable strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeSummary {
    pub position: Coordinates,
    pub timestamp: Option<NaiveDateTime>,
    pub peak_current: f64,
}

impl From<&Strike> for StrikeSummary {
    fn from(strike: &Strike) -> Self {
        Self {
            position: strike.position,
            timestamp: strike.timestamp,
            peak_current: strike.peak_current,
        }
    }
}

/// Strike count for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Strike count for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

/// Aggregate statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeStats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub unknown_polarity: usize,
    /// Strikes whose timestamp could not be parsed (absent from the calendars)
    pub undated: usize,
    /// Largest absolute peak current
    pub strongest: Option<StrikeSummary>,
    pub max_positive: Option<StrikeSummary>,
    pub max_negative: Option<StrikeSummary>,
    /// Chronological per-day counts, days without strikes omitted
    pub daily: Vec<DailyCount>,
    pub monthly: Vec<MonthlyCount>,
}

impl StrikeStats {
    /// Busiest day, earliest on ties
    pub fn peak_day(&self) -> Option<&DailyCount> {
        self.daily
            .iter()
            .reduce(|best, d| if d.count > best.count { d } else { best })
    }
}

/// Compute statistics; ties in every "strongest" field keep the first strike
pub fn compute(strikes: &[Strike]) -> StrikeStats {
    let mut positive = 0;
    let mut negative = 0;
    let mut unknown_polarity = 0;
    let mut undated = 0;
    let mut strongest: Option<&Strike> = None;
    let mut max_positive: Option<&Strike> = None;
    let mut max_negative: Option<&Strike> = None;
    let mut daily: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut monthly: BTreeMap<(i32, u32), usize> = BTreeMap::new();

    for strike in strikes {
        match strike.polarity() {
            Polarity::Positive => {
                positive += 1;
                if max_positive.map_or(true, |m| strike.peak_current > m.peak_current) {
                    max_positive = Some(strike);
                }
            }
            Polarity::Negative => {
                negative += 1;
                if max_negative.map_or(true, |m| strike.peak_current < m.peak_current) {
                    max_negative = Some(strike);
                }
            }
            Polarity::Unknown => unknown_polarity += 1,
        }

        if strongest.map_or(true, |m| strike.peak_current.abs() > m.peak_current.abs()) {
            strongest = Some(strike);
        }

        match strike.timestamp {
            Some(ts) => {
                let date = ts.date();
                *daily.entry(date).or_insert(0) += 1;
                *monthly.entry((date.year(), date.month())).or_insert(0) += 1;
            }
            None => undated += 1,
        }
    }

    StrikeStats {
        total: strikes.len(),
        positive,
        negative,
        unknown_polarity,
        undated,
        strongest: strongest.map(StrikeSummary::from),
        max_positive: max_positive.map(StrikeSummary::from),
        max_negative: max_negative.map(StrikeSummary::from),
        daily: daily
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect(),
        monthly: monthly
            .into_iter()
            .map(|((year, month), count)| MonthlyCount { year, month, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::parse_timestamp;

    fn strike(kind: f64, ts: Option<&str>) -> Strike {
        Strike::new(
            Coordinates::new(42.0, -8.0),
            ts.and_then(parse_timestamp),
            kind,
        )
    }

    #[test]
    fn test_empty() {
        let stats = compute(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.strongest.is_none());
        assert!(stats.daily.is_empty());
        assert!(stats.peak_day().is_none());
    }

    #[test]
    fn test_polarity_and_extremes() {
        let strikes = vec![
            strike(12.0, Some("2023-01-01 10:00:00")),
            strike(-80.0, Some("2023-01-01 11:00:00")),
            strike(45.0, Some("2023-02-03 09:00:00")),
            strike(0.0, None),
            strike(-5.0, Some("2023-02-04 09:00:00")),
        ];
        let stats = compute(&strikes);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.positive, 2);
        assert_eq!(stats.negative, 2);
        assert_eq!(stats.unknown_polarity, 1);
        assert_eq!(stats.undated, 1);
        assert_eq!(stats.strongest.unwrap().peak_current, -80.0);
        assert_eq!(stats.max_positive.unwrap().peak_current, 45.0);
        assert_eq!(stats.max_negative.unwrap().peak_current, -80.0);
    }

    #[test]
    fn test_calendar_counts() {
        let strikes = vec![
            strike(1.0, Some("2023-03-02 10:00:00")),
            strike(1.0, Some("2023-01-01 10:00:00")),
            strike(1.0, Some("2023-03-02 23:59:00")),
            strike(1.0, Some("2023-03-15 00:00:00")),
        ];
        let stats = compute(&strikes);

        assert_eq!(stats.daily.len(), 3);
        assert_eq!(stats.daily[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(stats.peak_day().unwrap().count, 2);
        assert_eq!(
            stats.monthly,
            vec![
                MonthlyCount { year: 2023, month: 1, count: 1 },
                MonthlyCount { year: 2023, month: 3, count: 3 },
            ]
        );
    }

    #[test]
    fn test_strongest_tie_keeps_first() {
        let strikes = vec![strike(30.0, None), strike(-30.0, None)];
        assert_eq!(compute(&strikes).strongest.unwrap().peak_current, 30.0);
    }
}
