use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

/// Tournament prestige tier.
///
/// Governs both the placement point table and how many results of the tier
/// count toward a season total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TournamentClass {
    Aaa,
    Aa,
    A,
    B,
    C,
}

impl TournamentClass {
    /// Parse a class label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AAA" => Some(TournamentClass::Aaa),
            "AA" => Some(TournamentClass::Aa),
            "A" => Some(TournamentClass::A),
            "B" => Some(TournamentClass::B),
            "C" => Some(TournamentClass::C),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentClass::Aaa => "AAA",
            TournamentClass::Aa => "AA",
            TournamentClass::A => "A",
            TournamentClass::B => "B",
            TournamentClass::C => "C",
        }
    }

    /// Class C results are entered as raw points, every other class by placement.
    pub fn uses_placements(&self) -> bool {
        !matches!(self, TournamentClass::C)
    }
}

impl fmt::Display for TournamentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class label as stored in a record or calendar row.
///
/// Unrecognized labels are kept verbatim instead of failing the whole load;
/// scoring treats them as worth nothing and reports a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassLabel {
    Known(TournamentClass),
    Unrecognized(String),
}

impl ClassLabel {
    pub fn class(&self) -> Option<TournamentClass> {
        match self {
            ClassLabel::Known(class) => Some(*class),
            ClassLabel::Unrecognized(_) => None,
        }
    }

    /// Resolve the label, failing with a validation error when unrecognized.
    pub fn require(&self) -> Result<TournamentClass, EngineError> {
        match self {
            ClassLabel::Known(class) => Ok(*class),
            ClassLabel::Unrecognized(raw) => Err(EngineError::Validation(format!(
                "unrecognized tournament class '{}'",
                raw
            ))),
        }
    }
}

impl From<String> for ClassLabel {
    fn from(raw: String) -> Self {
        match TournamentClass::parse(&raw) {
            Some(class) => ClassLabel::Known(class),
            None => ClassLabel::Unrecognized(raw),
        }
    }
}

impl From<ClassLabel> for String {
    fn from(label: ClassLabel) -> Self {
        match label {
            ClassLabel::Known(class) => class.as_str().to_string(),
            ClassLabel::Unrecognized(raw) => raw,
        }
    }
}

impl From<TournamentClass> for ClassLabel {
    fn from(class: TournamentClass) -> Self {
        ClassLabel::Known(class)
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Known(class) => write!(f, "{}", class),
            ClassLabel::Unrecognized(raw) => write!(f, "{}?", raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    First,
    Second,
    Third,
}

impl Placement {
    /// Parse "1st"/"2nd"/"3rd" (or bare "1"/"2"/"3"). Empty or anything else
    /// means the competitor did not place.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1st" | "1" => Some(Placement::First),
            "2nd" | "2" => Some(Placement::Second),
            "3rd" | "3" => Some(Placement::Third),
            _ => None,
        }
    }
}

/// The eight fixed event categories. Scoring runs independently per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Event {
    TraditionalForms,
    TraditionalWeapons,
    CombatSparring,
    TraditionalSparring,
    CreativeForms,
    CreativeWeapons,
    XtremeForms,
    XtremeWeapons,
}

impl Event {
    pub const ALL: [Event; 8] = [
        Event::TraditionalForms,
        Event::TraditionalWeapons,
        Event::CombatSparring,
        Event::TraditionalSparring,
        Event::CreativeForms,
        Event::CreativeWeapons,
        Event::XtremeForms,
        Event::XtremeWeapons,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Event::TraditionalForms => "Traditional Forms",
            Event::TraditionalWeapons => "Traditional Weapons",
            Event::CombatSparring => "Combat Sparring",
            Event::TraditionalSparring => "Traditional Sparring",
            Event::CreativeForms => "Creative Forms",
            Event::CreativeWeapons => "Creative Weapons",
            Event::XtremeForms => "xTreme Forms",
            Event::XtremeWeapons => "xTreme Weapons",
        }
    }

    /// Two-letter column label for narrow tables
    pub fn short(&self) -> &'static str {
        match self {
            Event::TraditionalForms => "TF",
            Event::TraditionalWeapons => "TW",
            Event::CombatSparring => "CS",
            Event::TraditionalSparring => "TS",
            Event::CreativeForms => "CF",
            Event::CreativeWeapons => "CW",
            Event::XtremeForms => "XF",
            Event::XtremeWeapons => "XW",
        }
    }

    /// Match either the full name or the short label, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Event::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s) || e.short().eq_ignore_ascii_case(s))
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Points for each of the eight events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPoints([u32; 8]);

impl EventPoints {
    pub fn get(&self, event: Event) -> u32 {
        self.0[event.index()]
    }

    pub fn set(&mut self, event: Event, points: u32) {
        self.0[event.index()] = points;
    }
}

/// Identifies one record within a competitor's record set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub date: NaiveDate,
    pub tournament: String,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.tournament, self.date)
    }
}

/// One tournament's results for a competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub date: NaiveDate,
    pub class: ClassLabel,
    pub tournament: String,
    pub points: EventPoints,
}

impl ResultRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            date: self.date,
            tournament: self.tournament.clone(),
        }
    }

    pub fn matches(&self, key: &RecordKey) -> bool {
        self.date == key.date && self.tournament == key.tournament
    }
}

/// Competitor identity, normalized from a first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompetitorName(String);

impl CompetitorName {
    pub fn new(first: &str, last: &str) -> Result<Self, EngineError> {
        let first = title_case(first);
        let last = title_case(last);
        if first.is_empty() || last.is_empty() {
            return Err(EngineError::Validation(
                "both a first and a last name are required".to_string(),
            ));
        }
        Ok(Self(format!("{} {}", first, last)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompetitorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uppercase the first letter after any non-letter, lowercase the rest:
/// "mary-jane o'brien" becomes "Mary-Jane O'Brien".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut after_letter = false;
    for c in s.split_whitespace().collect::<Vec<_>>().join(" ").chars() {
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}
