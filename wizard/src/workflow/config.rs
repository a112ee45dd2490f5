use anyhow::Context;
use launchcore::MissionFlow;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub backend_url: String,
    pub timeout_secs: u64,
    /// Pause between status lines during playback.
    pub step_interval_ms: u64,
    pub flow: MissionFlow,
    /// Blank timestamp input selects the start of the window.
    pub default_to_window_start: bool,
    pub report_dir: Option<PathBuf>,
    pub stub_port: u16,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: 30,
            step_interval_ms: 1_000,
            flow: MissionFlow::Synthetic,
            default_to_window_start: false,
            report_dir: None,
            stub_port: 5_000,
        }
    }
}

impl WizardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading wizard config {}", path_ref.display()))?;
        let config: WizardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing wizard config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Command-line values win over whatever the file said.
    pub fn apply_overrides(
        &mut self,
        backend_url: Option<String>,
        flow: Option<MissionFlow>,
        step_interval_ms: Option<u64>,
        report_dir: Option<PathBuf>,
    ) {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        if let Some(flow) = flow {
            self.flow = flow;
        }
        if let Some(interval) = step_interval_ms {
            self.step_interval_ms = interval;
        }
        if let Some(dir) = report_dir {
            self.report_dir = Some(dir);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}
