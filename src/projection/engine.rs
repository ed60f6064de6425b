use std::collections::{BTreeMap, BTreeSet};

use super::window::SeasonWindow;
use crate::calendar::ScheduledTournament;
use crate::results::{Event, ResultRecord, TournamentClass};
use crate::scoring::{weekend_values, PoolTotal, ScoringConfig, WeekendEntry, WeekendKey};

/// Current and best-case contribution of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolProjection {
    pub current: u32,
    pub projected: u32,
}

impl PoolProjection {
    fn unchanged(current: u32) -> Self {
        Self {
            current,
            projected: current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventProjection {
    pub event: Event,
    pub aaa: PoolProjection,
    pub aa: PoolProjection,
    pub ab: PoolProjection,
    pub c: PoolProjection,
    /// Points held today
    pub current: u32,
    /// Best total reachable by season end
    pub projected_max: u32,
}

impl EventProjection {
    /// Points still available above the current total.
    pub fn gain(&self) -> u32 {
        self.projected_max.saturating_sub(self.current)
    }
}

/// An A/B weekend still open to the competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FutureWeekend {
    pub key: WeekendKey,
    /// A when any A tournament is scheduled that weekend, otherwise B
    pub class: TournamentClass,
    pub value: u32,
}

/// Eligible scheduled tournaments per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleSummary {
    pub aaa: usize,
    pub aa: usize,
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl ScheduleSummary {
    fn count(&mut self, class: TournamentClass) {
        match class {
            TournamentClass::Aaa => self.aaa += 1,
            TournamentClass::Aa => self.aa += 1,
            TournamentClass::A => self.a += 1,
            TournamentClass::B => self.b += 1,
            TournamentClass::C => self.c += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.aaa + self.aa + self.a + self.b + self.c
    }
}

#[derive(Debug, Clone)]
pub struct ProjectionReport {
    pub window: SeasonWindow,
    pub events: Vec<EventProjection>,
    pub scheduled: ScheduleSummary,
    /// Future A/B weekends not already used by a current result
    pub open_weekends: Vec<FutureWeekend>,
}

impl ProjectionReport {
    pub fn event(&self, event: Event) -> &EventProjection {
        &self.events[event as usize]
    }
}

/// Estimate the highest seasonal total each event can still reach.
///
/// Only AA slots and A/B weekends are projected. AAA and C contributions
/// stay at their current values. Scheduled tournaments outside the season
/// window are ignored.
pub fn project(
    records: &[ResultRecord],
    schedule: &[ScheduledTournament],
    window: &SeasonWindow,
    config: &ScoringConfig,
) -> ProjectionReport {
    let mut scheduled = ScheduleSummary::default();
    let mut future_weekends: BTreeMap<WeekendKey, TournamentClass> = BTreeMap::new();

    for tournament in window.upcoming(schedule) {
        let Some(class) = tournament.class.class() else {
            tracing::warn!(
                tournament = %tournament.name,
                class = %tournament.class,
                "skipping scheduled tournament with unrecognized class"
            );
            continue;
        };
        scheduled.count(class);

        if matches!(class, TournamentClass::A | TournamentClass::B) {
            let slot = future_weekends
                .entry(WeekendKey::of(tournament.date))
                .or_insert(class);
            if class == TournamentClass::A {
                *slot = TournamentClass::A;
            }
        }
    }

    // A weekend that already holds an A/B result cannot be attended again
    let used_weekends: BTreeSet<WeekendKey> = records
        .iter()
        .filter(|r| {
            matches!(
                r.class.class(),
                Some(TournamentClass::A) | Some(TournamentClass::B)
            )
        })
        .map(|r| WeekendKey::of(r.date))
        .collect();

    let points = &config.points;
    let open_weekends: Vec<FutureWeekend> = future_weekends
        .into_iter()
        .filter(|(key, _)| !used_weekends.contains(key))
        .map(|(key, class)| FutureWeekend {
            key,
            class,
            value: points.ceiling(class).unwrap_or(0),
        })
        .collect();

    tracing::debug!(
        scheduled = scheduled.total(),
        open_weekends = open_weekends.len(),
        "projection inputs"
    );

    let events = Event::ALL
        .into_iter()
        .map(|event| project_event(event, records, &scheduled, &open_weekends, config))
        .collect();

    ProjectionReport {
        window: *window,
        events,
        scheduled,
        open_weekends,
    }
}

fn project_event(
    event: Event,
    records: &[ResultRecord],
    scheduled: &ScheduleSummary,
    open_weekends: &[FutureWeekend],
    config: &ScoringConfig,
) -> EventProjection {
    let mut aaa = Vec::new();
    let mut aa = Vec::new();
    let mut c = Vec::new();
    let mut ab = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let Some(class) = record.class.class() else { continue };
        let value = record.points.get(event);
        match class {
            TournamentClass::Aaa => aaa.push(value),
            TournamentClass::Aa => aa.push(value),
            TournamentClass::C => c.push(value),
            TournamentClass::A | TournamentClass::B => ab.push(WeekendEntry {
                index,
                class,
                date: record.date,
                points: value,
            }),
        }
    }

    let caps = &config.caps;

    let aaa = PoolProjection::unchanged(PoolTotal::select(aaa, &caps.aaa).capped);
    let c = PoolProjection::unchanged(PoolTotal::select(c, &caps.c).capped);

    let aa_placed = aa.iter().filter(|v| **v > 0).count();
    let aa_current = PoolTotal::select(aa, &caps.aa).capped;
    let open_slots = caps.aa.keep.saturating_sub(aa_placed).min(scheduled.aa);
    let aa_ceiling = config.points.ceiling(TournamentClass::Aa).unwrap_or(0);
    let aa = PoolProjection {
        current: aa_current,
        projected: caps.aa.clamp(
            aa_current.saturating_add((open_slots as u32).saturating_mul(aa_ceiling)),
        ),
    };

    let current_weekends: Vec<u32> = weekend_values(&ab).iter().map(|w| w.points).collect();
    let ab_current = PoolTotal::select(current_weekends.iter().copied(), &caps.ab).capped;
    let ab_projected = PoolTotal::select(
        current_weekends
            .into_iter()
            .chain(open_weekends.iter().map(|w| w.value)),
        &caps.ab,
    )
    .capped;
    let ab = PoolProjection {
        current: ab_current,
        projected: ab_projected,
    };

    EventProjection {
        event,
        current: [aaa, aa, ab, c]
            .iter()
            .fold(0u32, |sum, p| sum.saturating_add(p.current)),
        projected_max: [aaa, aa, ab, c]
            .iter()
            .fold(0u32, |sum, p| sum.saturating_add(p.projected)),
        aaa,
        aa,
        ab,
        c,
    }
}
