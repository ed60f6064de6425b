use super::config::{CapRule, ScoringConfig};
use super::weekend::{weekend_values, WeekendEntry};
use crate::results::{Event, ResultRecord, TournamentClass};

/// The four selection pools. A and B are pooled together by weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Aaa,
    Aa,
    Ab,
    C,
}

impl Pool {
    pub const ALL: [Pool; 4] = [Pool::Aaa, Pool::Aa, Pool::Ab, Pool::C];

    pub fn label(&self) -> &'static str {
        match self {
            Pool::Aaa => "AAA",
            Pool::Aa => "AA",
            Pool::Ab => "A/B",
            Pool::C => "C",
        }
    }
}

/// A pool's best-N selection for one event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolTotal {
    /// Selected values, highest first
    pub kept: Vec<u32>,
    /// Sum of `kept` before the cap
    pub raw: u32,
    /// Contribution to the seasonal total
    pub capped: u32,
}

impl PoolTotal {
    pub fn from_kept(kept: Vec<u32>, rule: &CapRule) -> Self {
        let raw = kept.iter().fold(0u32, |sum, v| sum.saturating_add(*v));
        Self {
            kept,
            raw,
            capped: rule.clamp(raw),
        }
    }

    /// Select the best `rule.keep` values and apply the cap.
    pub fn select(values: impl IntoIterator<Item = u32>, rule: &CapRule) -> Self {
        let mut values: Vec<u32> = values.into_iter().collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        values.truncate(rule.keep);
        Self::from_kept(values, rule)
    }
}

/// Seasonal total for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonalTotal {
    pub event: Event,
    pub aaa: PoolTotal,
    pub aa: PoolTotal,
    pub ab: PoolTotal,
    pub c: PoolTotal,
    pub total: u32,
    /// Plain sum over every record, ignoring selection and caps
    pub uncapped: u32,
}

impl SeasonalTotal {
    pub fn pool(&self, pool: Pool) -> &PoolTotal {
        match pool {
            Pool::Aaa => &self.aaa,
            Pool::Aa => &self.aa,
            Pool::Ab => &self.ab,
            Pool::C => &self.c,
        }
    }
}

/// A record plus which of its event values count toward the totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: ResultRecord,
    counted: [bool; 8],
}

impl ScoredRecord {
    pub fn is_counted(&self, event: Event) -> bool {
        self.counted[event as usize]
    }

    /// True if any event value of this record counts
    pub fn counts_anywhere(&self) -> bool {
        self.counted.iter().any(|c| *c)
    }
}

#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub totals: Vec<SeasonalTotal>,
    /// Records ordered by date, then tournament name
    pub records: Vec<ScoredRecord>,
    pub warnings: Vec<String>,
}

impl ScoreReport {
    pub fn total(&self, event: Event) -> &SeasonalTotal {
        &self.totals[event as usize]
    }

    pub fn grand_total(&self) -> u32 {
        self.totals.iter().fold(0u32, |sum, t| sum.saturating_add(t.total))
    }
}

/// Order records the way every report presents them.
pub fn sort_records(records: &mut [ResultRecord]) {
    records.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.tournament.cmp(&b.tournament))
    });
}

/// Best `keep` candidates by value. Ties keep input order.
fn select_ranked(mut candidates: Vec<(u32, usize)>, keep: usize) -> Vec<(u32, usize)> {
    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.truncate(keep);
    candidates
}

/// Compute seasonal totals and counted flags for a competitor's records.
///
/// A pure function of the record set: input order does not matter. Records
/// with an unrecognized class contribute nothing and produce a warning.
pub fn score_records(records: &[ResultRecord], config: &ScoringConfig) -> ScoreReport {
    let mut records = records.to_vec();
    sort_records(&mut records);

    let mut warnings = Vec::new();
    let classes: Vec<Option<TournamentClass>> = records
        .iter()
        .map(|record| {
            let class = record.class.class();
            if class.is_none() {
                tracing::warn!(
                    tournament = %record.tournament,
                    date = %record.date,
                    class = %record.class,
                    "unrecognized tournament class, scoring as 0"
                );
                warnings.push(format!(
                    "{} ({}): unrecognized class '{}', counted as 0 points",
                    record.tournament,
                    record.date,
                    String::from(record.class.clone())
                ));
            }
            class
        })
        .collect();

    let mut counted = vec![[false; 8]; records.len()];
    let mut totals = Vec::with_capacity(Event::ALL.len());

    for event in Event::ALL {
        let mut aaa = Vec::new();
        let mut aa = Vec::new();
        let mut c = Vec::new();
        let mut ab = Vec::new();
        let mut uncapped = 0u32;

        for (index, (record, class)) in records.iter().zip(&classes).enumerate() {
            let Some(class) = class else { continue };
            let points = record.points.get(event);
            uncapped = uncapped.saturating_add(points);
            match class {
                TournamentClass::Aaa => aaa.push((points, index)),
                TournamentClass::Aa => aa.push((points, index)),
                TournamentClass::C => c.push((points, index)),
                TournamentClass::A | TournamentClass::B => ab.push(WeekendEntry {
                    index,
                    class: *class,
                    date: record.date,
                    points,
                }),
            }
        }

        let weekends: Vec<(u32, usize)> = weekend_values(&ab)
            .into_iter()
            .map(|w| (w.points, w.index))
            .collect();

        let mut pool_total = |candidates: Vec<(u32, usize)>, rule: &CapRule| {
            let selected = select_ranked(candidates, rule.keep);
            for &(points, index) in &selected {
                if points > 0 {
                    counted[index][event as usize] = true;
                }
            }
            PoolTotal::from_kept(selected.into_iter().map(|(p, _)| p).collect(), rule)
        };

        let aaa = pool_total(aaa, &config.caps.aaa);
        let aa = pool_total(aa, &config.caps.aa);
        let ab = pool_total(weekends, &config.caps.ab);
        let c = pool_total(c, &config.caps.c);
        let total = [aaa.capped, aa.capped, ab.capped, c.capped]
            .into_iter()
            .fold(0u32, u32::saturating_add);

        tracing::debug!(
            event = event.name(),
            aaa = aaa.capped,
            aa = aa.capped,
            ab = ab.capped,
            c = c.capped,
            total,
            "seasonal total"
        );

        totals.push(SeasonalTotal {
            event,
            aaa,
            aa,
            ab,
            c,
            total,
            uncapped,
        });
    }

    let records = records
        .into_iter()
        .zip(counted)
        .map(|(record, counted)| ScoredRecord { record, counted })
        .collect();

    ScoreReport {
        totals,
        records,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ClassLabel, EventPoints};
    use crate::scoring::CapRule;
    use chrono::NaiveDate;

    const FORMS: Event = Event::TraditionalForms;

    fn record(date: (u32, u32), class: &str, tournament: &str, forms: u32) -> ResultRecord {
        let mut points = EventPoints::default();
        points.set(FORMS, forms);
        ResultRecord {
            date: NaiveDate::from_ymd_opt(2026, date.0, date.1).unwrap(),
            class: ClassLabel::from(class.to_string()),
            tournament: tournament.to_string(),
            points,
        }
    }

    fn counted_tournaments(report: &ScoreReport, event: Event) -> Vec<String> {
        report
            .records
            .iter()
            .filter(|r| r.is_counted(event))
            .map(|r| r.record.tournament.clone())
            .collect()
    }

    #[test]
    fn test_empty_records() {
        let report = score_records(&[], &ScoringConfig::default());
        assert_eq!(report.totals.len(), 8);
        assert_eq!(report.grand_total(), 0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_aa_top_two_at_cap() {
        let records = vec![
            record((2, 7), "AA", "Winter Nationals", 15),
            record((4, 11), "AA", "Spring Nationals", 15),
            record((6, 6), "AA", "Summer Nationals", 10),
        ];
        let report = score_records(&records, &ScoringConfig::default());
        let total = report.total(FORMS);

        assert_eq!(total.aa.kept, vec![15, 15]);
        assert_eq!(total.aa.capped, 30);
        assert_eq!(total.total, 30);
        assert_eq!(total.uncapped, 40);
        assert_eq!(
            counted_tournaments(&report, FORMS),
            vec!["Winter Nationals", "Spring Nationals"]
        );
        let summer = report
            .records
            .iter()
            .find(|r| r.record.tournament == "Summer Nationals")
            .unwrap();
        assert!(!summer.is_counted(FORMS));
    }

    #[test]
    fn test_a_and_b_same_weekend_counts_a_only() {
        let records = vec![
            record((3, 14), "A", "Metro A", 8),
            record((3, 15), "B", "Metro B", 5),
        ];
        let report = score_records(&records, &ScoringConfig::default());
        assert_eq!(report.total(FORMS).ab.capped, 8);
        assert_eq!(counted_tournaments(&report, FORMS), vec!["Metro A"]);
    }

    #[test]
    fn test_ab_best_five_weekends_capped_at_forty() {
        let records: Vec<_> = (0..7)
            .map(|i| record((1 + i, 14), "A", &format!("A Open {}", i), 8))
            .collect();
        let report = score_records(&records, &ScoringConfig::default());
        let ab = &report.total(FORMS).ab;
        assert_eq!(ab.kept.len(), 5);
        assert_eq!(ab.raw, 40);
        assert_eq!(ab.capped, 40);
        assert_eq!(counted_tournaments(&report, FORMS).len(), 5);
    }

    #[test]
    fn test_ab_cap_enforced_when_configured_lower() {
        let mut config = ScoringConfig::default();
        config.caps.ab = CapRule::new(5, Some(20));
        let records: Vec<_> = (0..4)
            .map(|i| record((3, 2 + i * 7), "A", &format!("A Open {}", i), 8))
            .collect();
        let report = score_records(&records, &config);
        assert_eq!(report.total(FORMS).ab.raw, 32);
        assert_eq!(report.total(FORMS).ab.capped, 20);
    }

    #[test]
    fn test_aaa_keeps_single_best() {
        let records = vec![
            record((1, 10), "AAA", "Worlds Qualifier", 10),
            record((5, 10), "AAA", "World Championship", 20),
        ];
        let report = score_records(&records, &ScoringConfig::default());
        assert_eq!(report.total(FORMS).aaa.kept, vec![20]);
        assert_eq!(report.total(FORMS).aaa.capped, 20);
        assert_eq!(counted_tournaments(&report, FORMS), vec!["World Championship"]);
    }

    #[test]
    fn test_c_top_three_capped_at_nine() {
        let records = vec![
            record((1, 10), "C", "Club Night 1", 4),
            record((1, 17), "C", "Club Night 2", 4),
            record((1, 24), "C", "Club Night 3", 4),
            record((1, 31), "C", "Club Night 4", 1),
        ];
        let report = score_records(&records, &ScoringConfig::default());
        let c = &report.total(FORMS).c;
        assert_eq!(c.raw, 12);
        assert_eq!(c.capped, 9);
        assert!(!counted_tournaments(&report, FORMS).contains(&"Club Night 4".to_string()));
    }

    #[test]
    fn test_total_sums_all_pools() {
        let records = vec![
            record((1, 10), "AAA", "Worlds", 15),
            record((2, 7), "AA", "Nationals", 10),
            record((3, 14), "A", "Metro", 8),
            record((3, 21), "B", "Local", 3),
            record((4, 4), "C", "Club", 2),
        ];
        let report = score_records(&records, &ScoringConfig::default());
        assert_eq!(report.total(FORMS).total, 15 + 10 + 8 + 3 + 2);
    }

    #[test]
    fn test_events_are_independent() {
        let mut first = record((2, 7), "AA", "Nationals", 15);
        first.points.set(Event::CombatSparring, 5);
        let report = score_records(&[first], &ScoringConfig::default());
        assert_eq!(report.total(FORMS).total, 15);
        assert_eq!(report.total(Event::CombatSparring).total, 5);
        assert_eq!(report.total(Event::CreativeForms).total, 0);
    }

    #[test]
    fn test_invariant_under_reordering() {
        let records = vec![
            record((2, 7), "AA", "Nationals", 15),
            record((3, 14), "A", "Metro A", 8),
            record((3, 15), "B", "Metro B", 5),
            record((4, 4), "C", "Club", 2),
            record((4, 11), "AA", "Regionals", 10),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let config = ScoringConfig::default();
        let a = score_records(&records, &config);
        let b = score_records(&reversed, &config);
        assert_eq!(a.totals, b.totals);
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record((2, 7), "AA", "Nationals", 15),
            record((3, 14), "A", "Metro A", 8),
        ];
        let config = ScoringConfig::default();
        let a = score_records(&records, &config);
        let b = score_records(&records, &config);
        assert_eq!(a.totals, b.totals);
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn test_pool_caps_hold_for_large_inputs() {
        let mut records = Vec::new();
        for i in 0..10 {
            records.push(record((1, 1 + i), "AAA", &format!("AAA {}", i), 50));
            records.push(record((2, 1 + i), "AA", &format!("AA {}", i), 50));
            records.push(record((5, 1 + i), "C", &format!("C {}", i), 50));
        }
        for i in 0..10 {
            records.push(record((1 + i, 25), "A", &format!("A {}", i), 50));
        }
        let report = score_records(&records, &ScoringConfig::default());
        let total = report.total(FORMS);
        assert!(total.aaa.capped <= 20);
        assert!(total.aa.capped <= 30);
        assert!(total.ab.capped <= 40);
        assert!(total.c.capped <= 9);
        assert_eq!(total.total, 20 + 30 + 40 + 9);
    }

    #[test]
    fn test_unrecognized_class_scores_zero_with_warning() {
        let records = vec![
            record((2, 7), "AA", "Nationals", 15),
            record((2, 14), "Z", "Mystery Cup", 15),
        ];
        let report = score_records(&records, &ScoringConfig::default());
        assert_eq!(report.total(FORMS).total, 15);
        assert_eq!(report.total(FORMS).uncapped, 15);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Mystery Cup"));
    }

    #[test]
    fn test_zero_value_not_flagged_counted() {
        let records = vec![record((2, 7), "AA", "Nationals", 0)];
        let report = score_records(&records, &ScoringConfig::default());
        assert!(!report.records[0].is_counted(FORMS));
        assert!(!report.records[0].counts_anywhere());
    }

    #[test]
    fn test_edit_can_displace_counted_result() {
        let mut records = vec![
            record((2, 7), "AA", "Nationals", 10),
            record((3, 7), "AA", "Regionals", 10),
            record((4, 7), "AA", "Invitational", 5),
        ];
        let config = ScoringConfig::default();
        let before = score_records(&records, &config);
        assert!(!counted_tournaments(&before, FORMS).contains(&"Invitational".to_string()));

        records[2] = record((4, 7), "AA", "Invitational", 15);
        let after = score_records(&records, &config);
        assert_eq!(after.total(FORMS).aa.capped, 25);
        assert!(counted_tournaments(&after, FORMS).contains(&"Invitational".to_string()));
        assert!(!counted_tournaments(&after, FORMS).contains(&"Regionals".to_string()));
    }

    #[test]
    fn test_pool_total_select() {
        let rule = CapRule::new(2, Some(30));
        let pool = PoolTotal::select([5, 15, 10], &rule);
        assert_eq!(pool.kept, vec![15, 10]);
        assert_eq!(pool.capped, 25);
    }

    #[test]
    fn test_oversized_stored_values_saturate() {
        // Hand-edited store values beyond the entry limit
        let records = vec![
            record((3, 7), "C", "Club Night", u32::MAX),
            record((3, 14), "C", "Club Night II", 1),
        ];
        let report = score_records(&records, &ScoringConfig::default());
        let forms = report.total(FORMS);
        assert_eq!(forms.c.raw, u32::MAX);
        assert_eq!(forms.c.capped, 9);
        assert_eq!(forms.total, 9);
        assert_eq!(forms.uncapped, u32::MAX);
    }

    #[test]
    fn test_uncapped_pool_total_saturates() {
        let rule = CapRule::new(2, None);
        let pool = PoolTotal::select([u32::MAX, 10], &rule);
        assert_eq!(pool.raw, u32::MAX);
        assert_eq!(pool.capped, u32::MAX);
    }
}
