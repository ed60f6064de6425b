use serde::{Deserialize, Serialize};

use crate::results::{Placement, TournamentClass};

/// Main scoring configuration.
///
/// Defines the placement point table and the per-pool selection caps. Every
/// section is optional in YAML and falls back to the federation's standard
/// rule set.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   points:
///     aa: { first: 15, second: 10, third: 5 }
///   caps:
///     c: { keep: 3, cap: 9 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub points: PointTable,

    #[serde(default)]
    pub caps: CapRules,
}

/// Points awarded for 1st/2nd/3rd place.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlacementPoints {
    pub first: u32,
    pub second: u32,
    pub third: u32,
}

impl PlacementPoints {
    pub const fn new(first: u32, second: u32, third: u32) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    pub fn get(&self, placement: Placement) -> u32 {
        match placement {
            Placement::First => self.first,
            Placement::Second => self.second,
            Placement::Third => self.third,
        }
    }
}

/// Placement points per class. Class C has no table: its points are entered
/// directly.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PointTable {
    #[serde(default = "default_aaa_points")]
    pub aaa: PlacementPoints,
    #[serde(default = "default_aa_points")]
    pub aa: PlacementPoints,
    #[serde(default = "default_a_points")]
    pub a: PlacementPoints,
    #[serde(default = "default_b_points")]
    pub b: PlacementPoints,
}

fn default_aaa_points() -> PlacementPoints {
    PlacementPoints::new(20, 15, 10)
}

fn default_aa_points() -> PlacementPoints {
    PlacementPoints::new(15, 10, 5)
}

fn default_a_points() -> PlacementPoints {
    PlacementPoints::new(8, 5, 2)
}

fn default_b_points() -> PlacementPoints {
    PlacementPoints::new(5, 3, 1)
}

impl Default for PointTable {
    fn default() -> Self {
        Self {
            aaa: default_aaa_points(),
            aa: default_aa_points(),
            a: default_a_points(),
            b: default_b_points(),
        }
    }
}

impl PointTable {
    /// Placement table for a class, `None` for class C.
    pub fn table(&self, class: TournamentClass) -> Option<&PlacementPoints> {
        match class {
            TournamentClass::Aaa => Some(&self.aaa),
            TournamentClass::Aa => Some(&self.aa),
            TournamentClass::A => Some(&self.a),
            TournamentClass::B => Some(&self.b),
            TournamentClass::C => None,
        }
    }

    /// Convert a placement string to points. Empty or unrecognized
    /// placements, and class C, are worth 0 here.
    pub fn points_for(&self, class: TournamentClass, placement: &str) -> u32 {
        match (self.table(class), Placement::parse(placement)) {
            (Some(table), Some(placement)) => table.get(placement),
            _ => 0,
        }
    }

    /// Best possible single result for a class (its 1st-place value).
    pub fn ceiling(&self, class: TournamentClass) -> Option<u32> {
        self.table(class).map(|t| t.first)
    }
}

/// How many of a pool's best results count, and an optional ceiling on
/// their sum.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CapRule {
    pub keep: usize,
    #[serde(default)]
    pub cap: Option<u32>,
}

impl CapRule {
    pub const fn new(keep: usize, cap: Option<u32>) -> Self {
        Self { keep, cap }
    }

    pub fn clamp(&self, sum: u32) -> u32 {
        match self.cap {
            Some(cap) => sum.min(cap),
            None => sum,
        }
    }
}

/// Selection rules for the four pools. A and B share one pool counted by
/// weekend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CapRules {
    #[serde(default = "default_aaa_rule")]
    pub aaa: CapRule,
    #[serde(default = "default_aa_rule")]
    pub aa: CapRule,
    #[serde(default = "default_ab_rule")]
    pub ab: CapRule,
    #[serde(default = "default_c_rule")]
    pub c: CapRule,
}

fn default_aaa_rule() -> CapRule {
    CapRule::new(1, Some(20))
}

fn default_aa_rule() -> CapRule {
    CapRule::new(2, Some(30))
}

fn default_ab_rule() -> CapRule {
    CapRule::new(5, Some(40))
}

fn default_c_rule() -> CapRule {
    CapRule::new(3, Some(9))
}

impl Default for CapRules {
    fn default() -> Self {
        Self {
            aaa: default_aaa_rule(),
            aa: default_aa_rule(),
            ab: default_ab_rule(),
            c: default_c_rule(),
        }
    }
}
