use crate::session::WizardStage;
use log::{info, warn};

/// Thin logging front for stage transitions and user-facing alerts.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, stage: WizardStage, message: &str) {
        info!("[{}] {}", stage, message);
    }

    pub fn alert(&self, stage: WizardStage, message: &str) {
        warn!("[{}] {}", stage, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
