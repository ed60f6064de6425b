use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::calendar::ScheduledTournament;
use crate::projection::ProjectionReport;
use crate::results::Event;
use crate::scoring::{Pool, ScoreReport, ScoredRecord};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad to `width` characters, counting chars rather than bytes
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

/// Width left for the tournament column once the fixed columns are placed.
fn name_width(fixed_width: usize, longest: usize) -> usize {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    }
}

/// Format the calendar as one line per tournament: "{date}  {class}  {name}"
pub fn format_tournament_list(tournaments: &[ScheduledTournament], use_colors: bool) -> String {
    if tournaments.is_empty() {
        return "No tournaments in the calendar.".to_string();
    }

    let mut sorted: Vec<&ScheduledTournament> = tournaments.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));

    sorted
        .into_iter()
        .map(|t| {
            let class = format!("{:<3}", t.class.to_string());
            if use_colors {
                format!("{}  {}  {}", t.date.dimmed(), class.cyan(), t.name.bold())
            } else {
                format!("{}  {}  {}", t.date, class, t.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cell for one event value: "-" for nothing, the value when counted,
/// "(value)" when it does not count toward the total.
fn format_cell(scored: &ScoredRecord, event: Event) -> (String, bool) {
    let value = scored.record.points.get(event);
    if value == 0 {
        ("-".to_string(), false)
    } else if scored.is_counted(event) {
        (value.to_string(), true)
    } else {
        (format!("({})", value), false)
    }
}

/// Format a competitor's records with per-event values.
///
/// Columns: Date, Class, Tournament, then one 5-wide column per event.
/// Values that do not count toward the seasonal total are parenthesized.
pub fn format_results_table(report: &ScoreReport, use_colors: bool) -> String {
    if report.records.is_empty() {
        return "No scores recorded yet.".to_string();
    }

    let cell_width = 5;
    let fixed_width = 10 + 2 + 4 + 2 + Event::ALL.len() * cell_width;
    let longest = report
        .records
        .iter()
        .map(|r| r.record.tournament.chars().count())
        .max()
        .unwrap_or(0)
        .max("Tournament".len());
    let width = name_width(fixed_width, longest);

    let mut header = format!("{:<10}  {:<4}{}  ", "Date", "Cls", pad("Tournament", width));
    for event in Event::ALL {
        header.push_str(&format!("{:>width$}", event.short(), width = cell_width));
    }
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let mut lines = vec![header];
    for scored in &report.records {
        let name = pad(&truncate_name(&scored.record.tournament, width), width);
        let class = format!("{:<4}", scored.record.class.to_string());
        let mut line = if use_colors {
            format!("{}  {}{}  ", scored.record.date.dimmed(), class.cyan(), name)
        } else {
            format!("{}  {}{}  ", scored.record.date, class, name)
        };

        for event in Event::ALL {
            let (cell, counted) = format_cell(scored, event);
            let cell = format!("{:>width$}", cell, width = cell_width);
            if use_colors && counted {
                line.push_str(&cell.green().to_string());
            } else if use_colors {
                line.push_str(&cell.dimmed().to_string());
            } else {
                line.push_str(&cell);
            }
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Format seasonal totals: one row per event with each pool's capped
/// contribution, the total, and the plain uncapped sum.
pub fn format_totals_table(report: &ScoreReport, use_colors: bool) -> String {
    let mut header = format!("{:<22}", "Event");
    for pool in Pool::ALL {
        header.push_str(&format!("{:>6}", pool.label()));
    }
    header.push_str(&format!("{:>8}{:>10}", "Total", "Uncapped"));

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for total in &report.totals {
        let mut line = format!("{:<22}", total.event.name());
        for pool in Pool::ALL {
            line.push_str(&format!("{:>6}", total.pool(pool).capped));
        }
        let total_str = format!("{:>8}", total.total);
        if use_colors {
            line.push_str(&total_str.bold().to_string());
        } else {
            line.push_str(&total_str);
        }
        line.push_str(&format!("{:>10}", total.uncapped));
        lines.push(line);
    }

    let grand = format!("{:<22}{:>32}", "All events", report.grand_total());
    lines.push(if use_colors {
        grand.bold().to_string()
    } else {
        grand
    });

    lines.join("\n")
}

/// Format totals as tab-separated values for scripting
/// Columns: event, aaa, aa, ab, c, total, uncapped (no headers, no colors)
pub fn format_totals_tsv(report: &ScoreReport) -> String {
    report
        .totals
        .iter()
        .map(|t| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                t.event.name(),
                t.aaa.capped,
                t.aa.capped,
                t.ab.capped,
                t.c.capped,
                t.total,
                t.uncapped
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the projection: season window summary, then one row per event
/// with current points, projected maximum, and the gap between them.
pub fn format_projection_table(report: &ProjectionReport, use_colors: bool) -> String {
    let window = &report.window;
    let scheduled = &report.scheduled;
    let mut lines = vec![
        format!(
            "Season: {} to {} ({} days left)",
            window.today,
            window.season_end,
            window.days_remaining()
        ),
        format!(
            "Scheduled: {} AAA, {} AA, {} A, {} B, {} C ({} open A/B weekends)",
            scheduled.aaa,
            scheduled.aa,
            scheduled.a,
            scheduled.b,
            scheduled.c,
            report.open_weekends.len()
        ),
        String::new(),
    ];

    let header = format!(
        "{:<22}{:>9}{:>11}{:>7}",
        "Event", "Current", "Projected", "Gain"
    );
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for event in &report.events {
        let gain = event.gain();
        let line = format!(
            "{:<22}{:>9}{:>11}{:>7}",
            event.event.name(),
            event.current,
            event.projected_max,
            format!("+{}", gain)
        );
        if use_colors && gain > 0 {
            lines.push(line.green().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, SeasonWindow};
    use crate::results::{ClassLabel, EventPoints, ResultRecord};
    use crate::scoring::{score_records, ScoringConfig};
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn record(day: NaiveDate, class: &str, tournament: &str, forms: u32) -> ResultRecord {
        let mut points = EventPoints::default();
        points.set(Event::TraditionalForms, forms);
        ResultRecord {
            date: day,
            class: ClassLabel::from(class.to_string()),
            tournament: tournament.to_string(),
            points,
        }
    }

    fn sample_report() -> ScoreReport {
        let records = vec![
            record(date(2, 7), "AA", "Winter Nationals", 15),
            record(date(4, 11), "AA", "Spring Nationals", 15),
            record(date(6, 6), "AA", "Summer Nationals", 10),
        ];
        score_records(&records, &ScoringConfig::default())
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Spring Open", 20), "Spring Open");
        assert_eq!(truncate_name("Spring Nationals", 9), "Spring...");
        assert_eq!(truncate_name("Spring", 2), "Sp");
    }

    #[test]
    fn test_results_table_empty() {
        let report = score_records(&[], &ScoringConfig::default());
        assert_eq!(format_results_table(&report, false), "No scores recorded yet.");
    }

    #[test]
    fn test_results_table_marks_uncounted() {
        let output = format_results_table(&sample_report(), false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("TF"));
        assert!(lines[1].contains("Winter Nationals"));
        assert!(lines[1].contains("15"));
        assert!(lines[3].contains("Summer Nationals"));
        assert!(lines[3].contains("(10)"));
        assert!(!lines[1].contains("(15)"));
    }

    #[test]
    fn test_totals_table() {
        let output = format_totals_table(&sample_report(), false);
        let forms = output
            .lines()
            .find(|l| l.starts_with("Traditional Forms"))
            .unwrap();
        let columns: Vec<&str> = forms.split_whitespace().collect();
        // Traditional Forms | AAA AA A/B C | Total | Uncapped
        assert_eq!(columns, vec!["Traditional", "Forms", "0", "30", "0", "0", "30", "40"]);
        assert!(output.lines().last().unwrap().ends_with("30"));
    }

    #[test]
    fn test_totals_tsv() {
        let output = format_totals_tsv(&sample_report());
        let first = output.lines().next().unwrap();
        assert_eq!(first, "Traditional Forms\t0\t30\t0\t0\t30\t40");
        assert_eq!(output.lines().count(), 8);
    }

    #[test]
    fn test_tournament_list_sorted_by_date() {
        let tournaments = vec![
            ScheduledTournament {
                date: date(5, 2),
                class: ClassLabel::from("A".to_string()),
                name: "May Open".to_string(),
            },
            ScheduledTournament {
                date: date(3, 14),
                class: ClassLabel::from("AA".to_string()),
                name: "Spring Nationals".to_string(),
            },
        ];
        let output = format_tournament_list(&tournaments, false);
        assert_eq!(
            output,
            "2026-03-14  AA   Spring Nationals\n2026-05-02  A    May Open"
        );
    }

    #[test]
    fn test_projection_table() {
        let records = vec![record(date(2, 7), "AA", "Winter Nationals", 10)];
        let schedule = vec![ScheduledTournament {
            date: date(4, 11),
            class: ClassLabel::from("AA".to_string()),
            name: "Spring Nationals".to_string(),
        }];
        let window = SeasonWindow::new(date(3, 1), date(6, 30)).unwrap();
        let report = project(&records, &schedule, &window, &ScoringConfig::default());
        let output = format_projection_table(&report, false);

        assert!(output.starts_with("Season: 2026-03-01 to 2026-06-30 (121 days left)"));
        assert!(output.contains("Scheduled: 0 AAA, 1 AA, 0 A, 0 B, 0 C (0 open A/B weekends)"));
        let forms = output
            .lines()
            .find(|l| l.starts_with("Traditional Forms"))
            .unwrap();
        let columns: Vec<&str> = forms.split_whitespace().collect();
        assert_eq!(columns, vec!["Traditional", "Forms", "10", "25", "+15"]);
    }
}
