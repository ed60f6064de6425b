pub mod engine;
pub mod window;

pub use engine::{
    project, EventProjection, FutureWeekend, PoolProjection, ProjectionReport, ScheduleSummary,
};
pub use window::SeasonWindow;
