pub mod config;
pub mod engine;
pub mod validation;
pub mod weekend;

pub use config::*;
pub use engine::{score_records, sort_records, Pool, PoolTotal, ScoreReport, ScoredRecord, SeasonalTotal};
pub use validation::validate_scoring;
pub use weekend::{weekend_values, WeekendEntry, WeekendKey, WeekendValue};
