use launchcore::mission::{AltitudeField, RocketOption, TimestampWindow};
use std::path::PathBuf;

/// How the user hands over a TLE catalogue.
#[derive(Debug, Clone, PartialEq)]
pub enum TleAnswer {
    File(PathBuf),
    Text(String),
}

/// Source of the raw answers typed into each wizard step.
///
/// Answers are returned untouched; validation belongs to the orchestrator.
pub trait StepInput {
    fn tle(&mut self) -> anyhow::Result<TleAnswer>;
    fn timestamp(&mut self, window: &TimestampWindow) -> anyhow::Result<String>;
    fn orbit(&mut self) -> anyhow::Result<String>;
    fn altitude(&mut self, field: &AltitudeField) -> anyhow::Result<String>;
    fn rocket(&mut self, options: &[RocketOption]) -> anyhow::Result<String>;
    fn debris_count(&mut self) -> anyhow::Result<String>;

    /// Shows a blocking alert for a rejected step.
    fn alert(&mut self, message: &str);

    /// Whether a rejected step is asked again instead of ending the run.
    fn retries(&self) -> bool;
}
