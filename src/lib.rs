pub mod calendar;
pub mod config;
pub mod error;
pub mod output;
pub mod projection;
pub mod results;
pub mod scoring;
pub mod telemetry;

pub use error::EngineError;
