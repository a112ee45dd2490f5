use crate::workflow::input::{StepInput, TleAnswer};
use anyhow::Context;
use launchcore::mission::{AltitudeField, RocketOption, TimestampWindow};
use launchcore::MissionFlow;
use log::error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Pre-recorded answers for an unattended wizard run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionPlan {
    pub flow: Option<MissionFlow>,
    /// Relative paths are taken from the plan's own directory.
    pub tle_file: Option<PathBuf>,
    pub tle_text: Option<String>,
    pub timestamp: Option<String>,
    pub orbit: Option<String>,
    pub altitude: Option<f64>,
    /// Zero-based index into the rocket list served for the orbit.
    pub rocket: Option<usize>,
    pub debris_count: Option<u32>,
}

impl MissionPlan {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading mission plan {}", path_ref.display()))?;
        let mut plan: MissionPlan = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing mission plan {}", path_ref.display()))?;
        if let (Some(file), Some(dir)) = (plan.tle_file.as_mut(), path_ref.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
        Ok(plan)
    }
}

/// Answers the wizard from a [`MissionPlan`]; the first rejection ends the run.
pub struct PlanInput {
    plan: MissionPlan,
}

impl PlanInput {
    pub fn new(plan: MissionPlan) -> Self {
        Self { plan }
    }
}

fn answer<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl StepInput for PlanInput {
    fn tle(&mut self) -> anyhow::Result<TleAnswer> {
        Ok(match (&self.plan.tle_file, &self.plan.tle_text) {
            (Some(path), _) => TleAnswer::File(path.clone()),
            (None, text) => TleAnswer::Text(answer(text)),
        })
    }

    fn timestamp(&mut self, _window: &TimestampWindow) -> anyhow::Result<String> {
        Ok(answer(&self.plan.timestamp))
    }

    fn orbit(&mut self) -> anyhow::Result<String> {
        Ok(answer(&self.plan.orbit))
    }

    fn altitude(&mut self, _field: &AltitudeField) -> anyhow::Result<String> {
        Ok(answer(&self.plan.altitude))
    }

    fn rocket(&mut self, _options: &[RocketOption]) -> anyhow::Result<String> {
        Ok(answer(&self.plan.rocket))
    }

    fn debris_count(&mut self) -> anyhow::Result<String> {
        Ok(answer(&self.plan.debris_count))
    }

    fn alert(&mut self, message: &str) {
        error!("mission plan rejected: {}", message);
    }

    fn retries(&self) -> bool {
        false
    }
}
