use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::EngineError;
use crate::results::{ClassLabel, RecordKey};

/// A calendar entry: a tournament that has been or will be held.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduledTournament {
    pub date: NaiveDate,
    pub class: ClassLabel,
    pub name: String,
}

impl ScheduledTournament {
    /// Key a result for this tournament is stored under.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            date: self.date,
            tournament: self.name.clone(),
        }
    }
}

/// Read-only source of the tournament calendar.
pub trait TournamentCalendar {
    fn list_tournaments(&self) -> Result<Vec<ScheduledTournament>, EngineError>;
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct CalendarFile {
    #[serde(default)]
    tournaments: Vec<ScheduledTournament>,
}

/// Get the default calendar path (~/.config/ata-points/tournaments.yaml)
pub fn get_calendar_path() -> PathBuf {
    crate::config::get_config_dir().join("tournaments.yaml")
}

/// Calendar kept as a YAML file:
///
/// ```yaml
/// tournaments:
///   - { date: "2026-03-14", class: A, name: "Spring Open" }
/// ```
#[derive(Debug, Clone)]
pub struct YamlCalendar {
    path: PathBuf,
}

impl YamlCalendar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TournamentCalendar for YamlCalendar {
    fn list_tournaments(&self) -> Result<Vec<ScheduledTournament>, EngineError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            EngineError::calendar_unavailable(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        parse_calendar(&content)
    }
}

/// Parse calendar YAML.
pub fn parse_calendar(content: &str) -> Result<Vec<ScheduledTournament>, EngineError> {
    let file: CalendarFile = serde_saphyr::from_str(content)
        .map_err(|e| EngineError::calendar_unavailable(format!("invalid calendar: {}", e)))?;

    for t in &file.tournaments {
        if t.class.class().is_none() {
            tracing::warn!(tournament = %t.name, class = %t.class, "calendar entry has unrecognized class");
        }
    }

    Ok(file.tournaments)
}

/// Resolve a tournament the competitor selected.
///
/// Matches the exact name first, then ignores case. When the same name is
/// held on several dates, `date` picks one; without it the earliest wins.
pub fn find_tournament<'a>(
    tournaments: &'a [ScheduledTournament],
    name: &str,
    date: Option<NaiveDate>,
) -> Result<&'a ScheduledTournament, EngineError> {
    let name = name.trim();
    let date_matches = |t: &&ScheduledTournament| date.map_or(true, |d| t.date == d);

    let mut candidates: Vec<&ScheduledTournament> = tournaments
        .iter()
        .filter(|t| t.name == name)
        .filter(date_matches)
        .collect();
    if candidates.is_empty() {
        candidates = tournaments
            .iter()
            .filter(|t| t.name.eq_ignore_ascii_case(name))
            .filter(date_matches)
            .collect();
    }

    candidates
        .into_iter()
        .min_by_key(|t| t.date)
        .ok_or_else(|| match date {
            Some(d) => EngineError::Validation(format!(
                "no tournament named '{}' on {} in the calendar",
                name, d
            )),
            None => EngineError::Validation(format!(
                "no tournament named '{}' in the calendar",
                name
            )),
        })
}
