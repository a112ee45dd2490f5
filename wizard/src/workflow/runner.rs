use crate::backend::{BackendClient, BackendError};
use crate::workflow::config::WizardConfig;
use crate::workflow::input::TleAnswer;
use crate::workflow::playback::{play_steps, StatusSink};
use chrono::Utc;
use launchcore::api::ProcessingReport;
use launchcore::mission::tle::{earliest_epoch, element_pairs, validate_file_name, validate_pasted};
use launchcore::mission::{
    AltitudeField, LaunchTimestamp, OrbitType, RocketOption, TimestampWindow, TleSubmission,
};
use launchcore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use launchcore::{MissionFlow, MissionSession, WizardError, WizardResult};
use reqwest::Url;
use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a wizard step did not go through.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Rejected(#[from] WizardError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("could not access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Where a finished mission can be looked at.
#[derive(Debug, Clone)]
pub struct MissionOutcome {
    pub visualization: Url,
    pub report: Url,
    pub report_path: Option<PathBuf>,
    pub collisions: Option<usize>,
}

/// Drives one mission: validates each answer, calls the backend and keeps
/// the session in step with what the backend accepted.
pub struct Orchestrator {
    client: BackendClient,
    session: MissionSession,
    config: WizardConfig,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl Orchestrator {
    pub fn new(config: WizardConfig) -> Result<Self, BackendError> {
        let client = BackendClient::new(&config.backend_url, config.timeout())?;
        Ok(Self {
            client,
            session: MissionSession::new(config.flow),
            config,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn session(&self) -> &MissionSession {
        &self.session
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn local<T>(&self, result: WizardResult<T>) -> Result<T, StepError> {
        result.map_err(|err| {
            self.metrics.record_rejection();
            self.logger.alert(self.session.stage(), &err.to_string());
            StepError::Rejected(err)
        })
    }

    async fn remote<T, F>(&self, call: F) -> Result<T, StepError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        self.metrics.record_call();
        call.await.map_err(|err| {
            self.metrics.record_failure();
            let message = match err.endpoint() {
                Some(endpoint) => format!("/{endpoint}: {err}"),
                None => err.to_string(),
            };
            self.logger.alert(self.session.stage(), &message);
            StepError::Backend(err)
        })
    }

    fn note(&self, message: &str) {
        self.logger.record(self.session.stage(), message);
    }

    /// Synthetic missions open on a week-long window starting now.
    pub fn prepare(&mut self) -> Result<(), StepError> {
        if self.session.flow() == MissionFlow::Synthetic {
            let window = TimestampWindow::synthetic(Utc::now());
            let result = self.session.use_window(window);
            self.local(result)?;
            self.note(&format!("launch window {window}"));
        }
        Ok(())
    }

    /// Uploads the catalogue and fetches the timestamp window it covers.
    pub async fn submit_tle(&mut self, answer: TleAnswer) -> Result<TimestampWindow, StepError> {
        let submission = match answer {
            TleAnswer::File(path) => {
                let name = self.local(validate_file_name(&path))?;
                let contents = fs::read(&path).map_err(|source| StepError::Io {
                    path: path.clone(),
                    source,
                })?;
                TleSubmission::File { name, contents }
            }
            TleAnswer::Text(text) => TleSubmission::Text(self.local(validate_pasted(&text))?),
        };

        let text = submission.text();
        let pairs = element_pairs(&text).len();
        match earliest_epoch(&text) {
            Some(epoch) => self.note(&format!("{pairs} element sets, earliest epoch {epoch}")),
            None => self.note(&format!("{pairs} element sets")),
        }

        let message = match submission {
            TleSubmission::File { name, contents } => {
                self.remote(self.client.upload_file(&name, contents)).await?
            }
            TleSubmission::Text(text) => self.remote(self.client.upload_text(&text)).await?,
        };
        self.note(&message);

        let bounds = self.remote(self.client.timestamp_bounds()).await?;
        let window = self.local(TimestampWindow::from_bounds(&bounds.min, &bounds.max))?;
        let result = self.session.catalog_accepted(window);
        self.local(result)?;
        Ok(window)
    }

    pub fn confirm_timestamp(&mut self, input: &str) -> Result<LaunchTimestamp, StepError> {
        let result = self
            .session
            .confirm_timestamp(input, self.config.default_to_window_start);
        let timestamp = self.local(result)?;
        self.note(&format!("launch at {timestamp}"));
        Ok(timestamp)
    }

    /// Parses the orbit choice and returns the altitude field it calls for.
    pub fn select_orbit(&mut self, input: &str) -> Result<AltitudeField, StepError> {
        let orbit = self.local(input.parse::<OrbitType>())?;
        let result = self.session.select_orbit(orbit).cloned();
        self.local(result)
    }

    /// Confirms orbit and altitude and loads the rockets able to fly them.
    /// The list is fetched once per confirmation and kept by the session.
    pub async fn confirm_orbit(
        &mut self,
        orbit: OrbitType,
        altitude: &str,
    ) -> Result<usize, StepError> {
        let result = self.session.confirm_orbit(orbit, altitude);
        let query = self.local(result)?;
        let rockets = self.remote(self.client.rockets(&query)).await?;
        let result = self.session.load_rockets(rockets);
        self.local(result)?;
        let count = self.session.rockets().len();
        self.note(&format!(
            "{count} rockets for {orbit} at {} km",
            query.target_altitude
        ));
        Ok(count)
    }

    /// Selects a rocket. Synthetic missions also ask the backend for the
    /// initial trajectory before debris can be placed.
    pub async fn confirm_rocket(&mut self, selection: &str) -> Result<RocketOption, StepError> {
        let result = self.session.confirm_rocket(selection);
        let request = self.local(result)?;
        if self.session.flow() == MissionFlow::Synthetic {
            let message = self.remote(self.client.initial_trajectory(&request)).await?;
            if let Some(message) = message {
                self.note(&message);
            }
            let result = self.session.initial_trajectory_ready();
            self.local(result)?;
        }
        let rocket = self.local(
            self.session
                .rocket()
                .cloned()
                .ok_or(WizardError::MissingRocket),
        )?;
        Ok(rocket)
    }

    /// Catalogue missions: runs the full trajectory processing.
    pub async fn process_catalog(&mut self) -> Result<ProcessingReport, StepError> {
        let result = self.session.trajectory_request();
        let request = self.local(result)?;
        let result = self.session.begin_processing();
        self.local(result)?;
        match self.remote(self.client.process_trajectory(&request)).await {
            Ok(report) => Ok(report),
            Err(err) => {
                self.session.processing_failed();
                Err(err)
            }
        }
    }

    /// Synthetic missions: places debris along the trajectory, then processes it.
    pub async fn generate_debris(&mut self, input: &str) -> Result<ProcessingReport, StepError> {
        let result = self.session.confirm_debris(input);
        let request = self.local(result)?;
        if let Some(message) = self.remote(self.client.generate_debris(&request)).await? {
            self.note(&message);
        }
        let result = self.session.begin_processing();
        self.local(result)?;
        match self.remote(self.client.process_synthetic(&request)).await {
            Ok(report) => Ok(report),
            Err(err) => {
                self.session.processing_failed();
                Err(err)
            }
        }
    }

    /// Plays the processing steps back and hands out the result links.
    pub async fn finish<S: StatusSink>(
        &mut self,
        report: ProcessingReport,
        sink: &mut S,
    ) -> Result<MissionOutcome, StepError> {
        play_steps(&report.steps, self.config.step_interval(), sink).await;

        let visualization = self.client.resolve(&report.viz_url)?;
        let report_url = self.client.report_url(&report.report_content)?;
        let report_path = match &self.config.report_dir {
            Some(dir) => Some(self.save_report(dir, &report.report_content)?),
            None => None,
        };

        let result = self.session.complete();
        self.local(result)?;
        self.note(&format!("visualization ready at {visualization}"));
        Ok(MissionOutcome {
            visualization,
            report: report_url,
            report_path,
            collisions: report.collisions,
        })
    }

    fn save_report(&self, dir: &Path, content: &str) -> Result<PathBuf, StepError> {
        let stamp = self
            .session
            .timestamp()
            .map(|ts| ts.as_naive().format("%Y%m%d_%H%M%S").to_string())
            .unwrap_or_else(|| "unscheduled".to_string());
        let path = dir.join(format!("mission_report_{stamp}.txt"));
        fs::create_dir_all(dir)
            .and_then(|_| fs::write(&path, content))
            .map_err(|source| StepError::Io {
                path: path.clone(),
                source,
            })?;
        self.note(&format!("report saved to {}", path.display()));
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubBackend;
    use launchcore::WizardStage;

    const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   25057.47232210  .00016717  00000-0  10270-3 0  9005
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[derive(Default)]
    struct Silent {
        shown: Vec<String>,
    }

    impl StatusSink for Silent {
        fn show(&mut self, line: &str) {
            self.shown.push(line.to_string());
        }

        fn hide(&mut self) {}
    }

    fn orchestrator(stub: &StubBackend, flow: MissionFlow) -> Orchestrator {
        let config = WizardConfig {
            backend_url: stub.base_url(),
            flow,
            step_interval_ms: 0,
            timeout_secs: 5,
            ..Default::default()
        };
        Orchestrator::new(config).unwrap()
    }

    #[tokio::test]
    async fn catalog_mission_reaches_completion() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let mut orch = orchestrator(&stub, MissionFlow::Catalog);

        let window = orch
            .submit_tle(TleAnswer::Text(ISS_TLE.into()))
            .await
            .unwrap();
        assert_eq!(window.min().to_string(), "2025/02/26 11:20:08");
        assert_eq!(orch.session().stage(), WizardStage::Timestamp);

        orch.confirm_timestamp("2025/02/27 00:00:00").unwrap();
        let field = orch.select_orbit("leo").unwrap();
        assert!(!field.locked);
        assert_eq!(orch.confirm_orbit(OrbitType::Leo, "1400").await.unwrap(), 2);
        let rocket = orch.confirm_rocket("1").await.unwrap();
        assert_eq!(rocket.rocket_type, "PSLV");

        let report = orch.process_catalog().await.unwrap();
        let mut sink = Silent::default();
        let outcome = orch.finish(report, &mut sink).await.unwrap();

        assert_eq!(orch.session().stage(), WizardStage::Complete);
        assert_eq!(
            outcome.visualization.as_str(),
            format!("{}static/trajectory.html", stub.base_url())
        );
        assert!(outcome
            .report
            .as_str()
            .contains("report?report_content=Mission%20Report"));
        assert_eq!(sink.shown.first().unwrap(), "Calculated initial trajectory 🚀");
        assert_eq!(stub.rocket_requests(), 1);
        let metrics = orch.metrics();
        assert_eq!(metrics.remote_calls, 4);
        assert_eq!(metrics.failures, 0);
    }

    #[tokio::test]
    async fn synthetic_mission_places_debris() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let mut orch = orchestrator(&stub, MissionFlow::Synthetic);
        orch.prepare().unwrap();
        let window = *orch.session().window().unwrap();
        let launch = window.min().to_string();

        orch.confirm_timestamp(&launch).unwrap();
        let field = orch.select_orbit("GEO").unwrap();
        assert!(field.locked);
        orch.confirm_orbit(OrbitType::Geo, "").await.unwrap();
        orch.confirm_rocket("0").await.unwrap();
        assert_eq!(orch.session().stage(), WizardStage::Debris);

        let report = orch.generate_debris("40").await.unwrap();
        assert_eq!(report.collisions, Some(4));

        let reports = tempfile::tempdir().unwrap();
        orch.config.report_dir = Some(reports.path().to_path_buf());
        let outcome = orch.finish(report, &mut Silent::default()).await.unwrap();
        let saved = fs::read_to_string(outcome.report_path.unwrap()).unwrap();
        assert!(saved.contains("Orbit: GEO at 35786 km"));
    }

    #[tokio::test]
    async fn local_rejections_stay_off_the_network() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let mut orch = orchestrator(&stub, MissionFlow::Catalog);

        let err = orch
            .submit_tle(TleAnswer::Text("   ".into()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), WizardError::MissingTleText.to_string());
        let err = orch
            .submit_tle(TleAnswer::File(PathBuf::from("catalog.csv")))
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::Rejected(WizardError::TleFileType(_))));

        orch.submit_tle(TleAnswer::Text(ISS_TLE.into())).await.unwrap();
        orch.confirm_timestamp("2025/02/27 00:00:00").unwrap();
        let err = orch.confirm_orbit(OrbitType::Leo, "90").await.unwrap_err();
        assert!(matches!(
            err,
            StepError::Rejected(WizardError::AltitudeOutOfRange { .. })
        ));
        assert_eq!(stub.rocket_requests(), 0);
        assert_eq!(orch.metrics().rejections, 3);
    }

    #[tokio::test]
    async fn backend_error_text_reaches_the_user() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let mut orch = orchestrator(&stub, MissionFlow::Catalog);
        orch.submit_tle(TleAnswer::Text(ISS_TLE.into())).await.unwrap();
        orch.confirm_timestamp("2025/02/27 00:00:00").unwrap();

        let err = orch.confirm_orbit(OrbitType::Meo, "30000").await.unwrap_err();
        assert!(matches!(
            err,
            StepError::Backend(BackendError::Status { status: 400, .. })
        ));
        assert!(err.to_string().contains("No rockets available"));
        assert_eq!(orch.session().stage(), WizardStage::Orbit);
        assert_eq!(orch.metrics().failures, 1);
    }

    #[tokio::test]
    async fn failed_processing_returns_to_rocket_step() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let mut orch = orchestrator(&stub, MissionFlow::Synthetic);
        orch.prepare().unwrap();
        let launch = orch.session().window().unwrap().min().to_string();
        orch.confirm_timestamp(&launch).unwrap();
        orch.confirm_orbit(OrbitType::Leo, "500").await.unwrap();
        orch.confirm_rocket("0").await.unwrap();

        // Skip debris generation so the stub refuses to process.
        let result = orch.session.confirm_debris("10");
        let request = result.unwrap();
        orch.session.begin_processing().unwrap();
        let err = orch
            .remote(orch.client.process_synthetic(&request))
            .await
            .unwrap_err();
        orch.session.processing_failed();
        assert!(err.to_string().contains("No dummy TLEs generated"));
        assert_eq!(orch.session().stage(), WizardStage::Debris);

        let report = orch.generate_debris("10").await.unwrap();
        assert_eq!(report.collisions, Some(1));
    }

    #[tokio::test]
    async fn catalogue_file_is_uploaded_as_multipart() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let mut orch = orchestrator(&stub, MissionFlow::Catalog);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.txt");
        fs::write(&path, ISS_TLE).unwrap();

        let window = orch.submit_tle(TleAnswer::File(path)).await.unwrap();
        assert_eq!(window.min().to_string(), "2025/02/26 11:20:08");
        assert_eq!(orch.session().stage(), WizardStage::Timestamp);
        assert_eq!(orch.metrics().failures, 0);
    }

    #[tokio::test]
    async fn missing_catalogue_file_never_reaches_backend() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let mut orch = orchestrator(&stub, MissionFlow::Catalog);
        let dir = tempfile::tempdir().unwrap();

        let err = orch
            .submit_tle(TleAnswer::File(dir.path().join("absent.txt")))
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::Io { .. }));
        assert_eq!(orch.metrics().remote_calls, 0);
    }

    #[tokio::test]
    async fn error_field_in_reply_keeps_rocket_step() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let mut orch = orchestrator(&stub, MissionFlow::Synthetic);
        orch.prepare().unwrap();
        let launch = orch.session().window().unwrap().min().to_string();
        orch.confirm_timestamp(&launch).unwrap();
        orch.session.confirm_orbit(OrbitType::Leo, "500").unwrap();
        orch.session
            .load_rockets(vec![RocketOption {
                rocket_type: "Falcon 9".into(),
                launch_site: "Cape Canaveral SLC-40".into(),
                launch_site_coordinates: "garbage".into(),
            }])
            .unwrap();

        let err = orch.confirm_rocket("0").await.unwrap_err();
        assert!(matches!(
            &err,
            StepError::Backend(BackendError::Server { .. })
        ));
        assert_eq!(err.to_string(), "Launch site coordinates are unreadable");
        assert_eq!(orch.session().stage(), WizardStage::Rocket);
        assert_eq!(orch.metrics().failures, 1);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let config = WizardConfig {
            backend_url: "http://127.0.0.1:9".into(),
            flow: MissionFlow::Catalog,
            timeout_secs: 2,
            ..Default::default()
        };
        let mut orch = Orchestrator::new(config).unwrap();
        let err = orch
            .submit_tle(TleAnswer::Text(ISS_TLE.into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StepError::Backend(BackendError::Transport { .. })
        ));
        assert_eq!(orch.session().stage(), WizardStage::TleIngest);
    }
}
