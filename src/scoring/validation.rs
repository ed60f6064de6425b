use super::config::{CapRule, PlacementPoints, ScoringConfig};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let tables = [
        ("aaa", &config.points.aaa),
        ("aa", &config.points.aa),
        ("a", &config.points.a),
        ("b", &config.points.b),
    ];
    for (name, table) in tables {
        check_decreasing(name, table, &mut errors);
    }

    // Higher classes must offer a higher ceiling; A and B may tie.
    let points = &config.points;
    if points.aaa.first <= points.aa.first {
        errors.push(format!(
            "scoring.points: aaa.first ({}) must be greater than aa.first ({})",
            points.aaa.first, points.aa.first
        ));
    }
    if points.aa.first <= points.a.first.max(points.b.first) {
        errors.push(format!(
            "scoring.points: aa.first ({}) must be greater than a.first and b.first",
            points.aa.first
        ));
    }
    if points.a.first < points.b.first {
        errors.push(format!(
            "scoring.points: a.first ({}) must not be less than b.first ({})",
            points.a.first, points.b.first
        ));
    }

    let rules = [
        ("aaa", &config.caps.aaa),
        ("aa", &config.caps.aa),
        ("ab", &config.caps.ab),
        ("c", &config.caps.c),
    ];
    for (name, rule) in rules {
        check_rule(name, rule, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_decreasing(name: &str, table: &PlacementPoints, errors: &mut Vec<String>) {
    if !(table.first > table.second && table.second > table.third) {
        errors.push(format!(
            "scoring.points.{}: placements must decrease (got {}/{}/{})",
            name, table.first, table.second, table.third
        ));
    }
}

fn check_rule(name: &str, rule: &CapRule, errors: &mut Vec<String>) {
    if rule.keep == 0 {
        errors.push(format!("scoring.caps.{}.keep: must be at least 1", name));
    }
    if rule.cap == Some(0) {
        errors.push(format!(
            "scoring.caps.{}.cap: a zero cap discards the pool; omit the pool's results instead",
            name
        ));
    }
}
