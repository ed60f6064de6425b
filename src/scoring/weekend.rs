use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

use crate::results::TournamentClass;

/// Calendar weekend a date belongs to.
///
/// Keyed by ISO week (Monday through Sunday), so a Friday and the Saturday
/// and Sunday after it share one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekendKey {
    pub year: i32,
    pub week: u32,
}

impl WeekendKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Sunday closing this weekend.
    pub fn sunday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, chrono::Weekday::Sun)
    }
}

impl fmt::Display for WeekendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sunday() {
            Some(sunday) => write!(f, "weekend of {}", sunday),
            None => write!(f, "{}-W{:02}", self.year, self.week),
        }
    }
}

/// One A or B result for a single event.
#[derive(Debug, Clone, Copy)]
pub struct WeekendEntry {
    /// Position of the source record, used to flag the counted result
    pub index: usize,
    pub class: TournamentClass,
    pub date: NaiveDate,
    pub points: u32,
}

/// The single value a weekend contributes to the A/B pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekendValue {
    pub key: WeekendKey,
    pub class: TournamentClass,
    pub points: u32,
    /// Record that supplied the value
    pub index: usize,
}

/// Collapse A/B results into one value per weekend.
///
/// If any A result falls on the weekend, the weekend is worth the best A
/// value; otherwise the best B value. Entries of other classes are ignored.
/// Output is ordered by weekend.
pub fn weekend_values(entries: &[WeekendEntry]) -> Vec<WeekendValue> {
    let mut buckets: BTreeMap<WeekendKey, Vec<&WeekendEntry>> = BTreeMap::new();
    for entry in entries {
        if matches!(entry.class, TournamentClass::A | TournamentClass::B) {
            buckets.entry(WeekendKey::of(entry.date)).or_default().push(entry);
        }
    }

    buckets
        .into_iter()
        .filter_map(|(key, bucket)| {
            let dominant = if bucket.iter().any(|e| e.class == TournamentClass::A) {
                TournamentClass::A
            } else {
                TournamentClass::B
            };

            // First maximum wins so ties resolve to the earliest entry
            let mut best: Option<&WeekendEntry> = None;
            for entry in bucket.into_iter().filter(|e| e.class == dominant) {
                if best.map_or(true, |b| entry.points > b.points) {
                    best = Some(entry);
                }
            }

            best.map(|entry| WeekendValue {
                key,
                class: dominant,
                points: entry.points,
                index: entry.index,
            })
        })
        .collect()
}
