pub mod entry;
pub mod storage;
pub mod types;

pub use entry::{build_record, parse_event_input, submit, SubmitOutcome};
pub use storage::{get_results_path, JsonResultStore, ResultStore};
pub use types::{
    ClassLabel, CompetitorName, Event, EventPoints, Placement, RecordKey, ResultRecord,
    TournamentClass,
};
