use super::storage::ResultStore;
use super::types::{CompetitorName, Event, EventPoints, RecordKey, ResultRecord, TournamentClass};
use crate::calendar::ScheduledTournament;
use crate::error::EngineError;
use crate::scoring::{sort_records, PointTable};

/// Largest raw value accepted for a class C event.
pub const MAX_C_POINTS: u32 = 100;

/// Outcome of submitting a new record.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved,
    /// A record for the same tournament and date already exists. Nothing was
    /// written; the caller decides whether to edit it or cancel.
    Duplicate(ResultRecord),
}

/// Parse an `EVENT=VALUE` pair, e.g. `"Traditional Forms=1st"` or `"CS=4"`.
pub fn parse_event_input(s: &str) -> Result<(Event, String), EngineError> {
    let (event, value) = s.split_once('=').ok_or_else(|| {
        EngineError::Validation(format!("expected EVENT=VALUE, got '{}'", s))
    })?;
    let event = Event::parse(event)
        .ok_or_else(|| EngineError::Validation(format!("unknown event '{}'", event.trim())))?;
    Ok((event, value.trim().to_string()))
}

/// Convert per-event inputs into a record for the given tournament.
///
/// Placement classes take "1st"/"2nd"/"3rd"; anything else scores 0. Class C
/// takes an integer from 0 to `MAX_C_POINTS`. Events without input score 0.
pub fn build_record(
    tournament: &ScheduledTournament,
    inputs: &[(Event, String)],
    table: &PointTable,
) -> Result<ResultRecord, EngineError> {
    let class = tournament.class.require()?;
    let mut points = EventPoints::default();
    let mut seen = Vec::with_capacity(inputs.len());

    for (event, value) in inputs {
        if seen.contains(event) {
            return Err(EngineError::Validation(format!(
                "{} entered more than once",
                event
            )));
        }
        seen.push(*event);
        points.set(*event, event_points(class, *event, value, table)?);
    }

    Ok(ResultRecord {
        date: tournament.date,
        class: class.into(),
        tournament: tournament.name.clone(),
        points,
    })
}

fn event_points(
    class: TournamentClass,
    event: Event,
    value: &str,
    table: &PointTable,
) -> Result<u32, EngineError> {
    let value = value.trim();
    if class.uses_placements() {
        let points = table.points_for(class, value);
        if points == 0 && !value.is_empty() {
            tracing::debug!(event = event.name(), value, "placement not recognized, scoring 0");
        }
        return Ok(points);
    }

    if value.is_empty() {
        return Ok(0);
    }
    let points = value.parse::<u32>().map_err(|_| {
        EngineError::Validation(format!(
            "{}: '{}' is not a whole, non-negative number of points",
            event, value
        ))
    })?;
    if points > MAX_C_POINTS {
        return Err(EngineError::Validation(format!(
            "{}: {} points is above the class C limit of {}",
            event, points, MAX_C_POINTS
        )));
    }
    Ok(points)
}

/// Submit a new record, opening the competitor's record set if needed.
///
/// Never overwrites: an existing record with the same key is returned as
/// `SubmitOutcome::Duplicate`.
pub fn submit<S: ResultStore + ?Sized>(
    store: &mut S,
    competitor: &CompetitorName,
    record: ResultRecord,
) -> Result<SubmitOutcome, EngineError> {
    store.create_competitor(competitor)?;

    let key = record.key();
    if let Some(existing) = store
        .list_results(competitor)?
        .into_iter()
        .find(|r| r.matches(&key))
    {
        tracing::info!(competitor = %competitor, record = %key, "duplicate submission rejected");
        return Ok(SubmitOutcome::Duplicate(existing));
    }

    store.append_result(competitor, record)?;
    tracing::info!(competitor = %competitor, record = %key, "result saved");
    Ok(SubmitOutcome::Saved)
}

/// Replace the record stored under `old_key` with a whole new record.
pub fn edit<S: ResultStore + ?Sized>(
    store: &mut S,
    competitor: &CompetitorName,
    old_key: &RecordKey,
    record: ResultRecord,
) -> Result<(), EngineError> {
    store.replace_result(competitor, old_key, record)?;
    tracing::info!(competitor = %competitor, record = %old_key, "result replaced");
    Ok(())
}

pub fn delete<S: ResultStore + ?Sized>(
    store: &mut S,
    competitor: &CompetitorName,
    key: &RecordKey,
) -> Result<(), EngineError> {
    store.delete_result(competitor, key)?;
    tracing::info!(competitor = %competitor, record = %key, "result deleted");
    Ok(())
}

/// A competitor's records ordered by date.
pub fn list_sorted<S: ResultStore + ?Sized>(
    store: &S,
    competitor: &CompetitorName,
) -> Result<Vec<ResultRecord>, EngineError> {
    let mut records = store.list_results(competitor)?;
    sort_records(&mut records);
    Ok(records)
}
