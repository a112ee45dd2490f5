use crate::backend::error::BackendError;
use launchcore::api::{
    Acknowledgement, DebrisRequest, ProcessingReport, RocketQuery, TimestampBounds,
    TrajectoryRequest, UploadText,
};
use launchcore::mission::RocketOption;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const UPLOAD: &str = "upload";
pub const GET_TIMESTAMPS: &str = "get_timestamps";
pub const GET_ROCKETS: &str = "get_rockets";
pub const INITIAL_TRAJECTORY: &str = "dummy_initial_trajectory";
pub const GENERATE_DEBRIS: &str = "generate_dummy_tles";
pub const PROCESS_TRAJECTORY: &str = "process_trajectory";
pub const PROCESS_SYNTHETIC: &str = "process_dummy_trajectory";
pub const REPORT: &str = "report";

/// HTTP client for the trajectory backend. Every call is a single request;
/// nothing is retried.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let invalid = |reason: String| BackendError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut base = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".into()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| BackendError::Transport {
                endpoint: "client",
                source,
            })?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves a path or absolute URL served by the backend against the base URL.
    pub fn resolve(&self, reference: &str) -> Result<Url, BackendError> {
        self.base
            .join(reference.trim_start_matches('/'))
            .map_err(|err| BackendError::InvalidUrl {
                url: reference.to_string(),
                reason: err.to_string(),
            })
    }

    /// Report view carrying the report text as `report_content` query parameter.
    /// Spaces are sent as `%20`.
    pub fn report_url(&self, report_content: &str) -> Result<Url, BackendError> {
        let mut url = self.resolve(REPORT)?;
        url.query_pairs_mut()
            .append_pair("report_content", report_content);
        // A literal '+' is already escaped as %2B, so any left are spaces.
        let query = url.query().map(|query| query.replace('+', "%20"));
        url.set_query(query.as_deref());
        Ok(url)
    }

    pub async fn upload_text(&self, text: &str) -> Result<String, BackendError> {
        let request = self.http.post(self.resolve(UPLOAD)?).json(&UploadText {
            text: text.to_string(),
        });
        let ack: Acknowledgement = self.send(UPLOAD, request).await?;
        acknowledged(UPLOAD, ack)
    }

    pub async fn upload_file(&self, name: &str, contents: Vec<u8>) -> Result<String, BackendError> {
        let form = Form::new().part("file", Part::bytes(contents).file_name(name.to_string()));
        let request = self.http.post(self.resolve(UPLOAD)?).multipart(form);
        let ack: Acknowledgement = self.send(UPLOAD, request).await?;
        acknowledged(UPLOAD, ack)
    }

    pub async fn timestamp_bounds(&self) -> Result<TimestampBounds, BackendError> {
        let request = self.http.get(self.resolve(GET_TIMESTAMPS)?);
        self.send(GET_TIMESTAMPS, request).await
    }

    pub async fn rockets(&self, query: &RocketQuery) -> Result<Vec<RocketOption>, BackendError> {
        let request = self.http.post(self.resolve(GET_ROCKETS)?).json(query);
        self.send(GET_ROCKETS, request).await
    }

    pub async fn initial_trajectory(
        &self,
        payload: &TrajectoryRequest,
    ) -> Result<Option<String>, BackendError> {
        let request = self.http.post(self.resolve(INITIAL_TRAJECTORY)?).json(payload);
        let ack: Acknowledgement = self.send(INITIAL_TRAJECTORY, request).await?;
        ack.into_result().map_err(|message| BackendError::Server {
            endpoint: INITIAL_TRAJECTORY,
            message,
        })
    }

    pub async fn generate_debris(
        &self,
        payload: &DebrisRequest,
    ) -> Result<Option<String>, BackendError> {
        let request = self.http.post(self.resolve(GENERATE_DEBRIS)?).json(payload);
        let ack: Acknowledgement = self.send(GENERATE_DEBRIS, request).await?;
        ack.into_result().map_err(|message| BackendError::Server {
            endpoint: GENERATE_DEBRIS,
            message,
        })
    }

    pub async fn process_trajectory(
        &self,
        payload: &TrajectoryRequest,
    ) -> Result<ProcessingReport, BackendError> {
        let request = self.http.post(self.resolve(PROCESS_TRAJECTORY)?).json(payload);
        let report: ProcessingReport = self.send(PROCESS_TRAJECTORY, request).await?;
        processed(PROCESS_TRAJECTORY, report)
    }

    pub async fn process_synthetic(
        &self,
        payload: &DebrisRequest,
    ) -> Result<ProcessingReport, BackendError> {
        let request = self.http.post(self.resolve(PROCESS_SYNTHETIC)?).json(payload);
        let report: ProcessingReport = self.send(PROCESS_SYNTHETIC, request).await?;
        processed(PROCESS_SYNTHETIC, report)
    }

    async fn send<R: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<R, BackendError> {
        debug!("-> /{}", endpoint);
        let response = request
            .send()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;
        debug!("<- /{} {} ({} bytes)", endpoint, status, body.len());

        if !status.is_success() {
            let detail = serde_json::from_slice::<Acknowledgement>(&body)
                .ok()
                .and_then(|ack| ack.error);
            return Err(BackendError::Status {
                endpoint,
                status: status.as_u16(),
                detail,
            });
        }
        serde_json::from_slice(&body).map_err(|source| BackendError::Decode { endpoint, source })
    }
}

fn acknowledged(endpoint: &'static str, ack: Acknowledgement) -> Result<String, BackendError> {
    ack.into_result()
        .map(|message| message.unwrap_or_else(|| "TLE processed successfully".to_string()))
        .map_err(|message| BackendError::Server { endpoint, message })
}

fn processed(endpoint: &'static str, report: ProcessingReport) -> Result<ProcessingReport, BackendError> {
    report
        .into_result()
        .map_err(|message| BackendError::Server { endpoint, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::server::StubBackend;
    use launchcore::mission::OrbitType;

    fn client() -> BackendClient {
        BackendClient::new("http://127.0.0.1:5000/mission", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoints_resolve_under_base_path() {
        let client = client();
        assert_eq!(
            client.resolve("/static/trajectory.html").unwrap().as_str(),
            "http://127.0.0.1:5000/mission/static/trajectory.html"
        );
        assert_eq!(
            client.resolve("https://cdn.example.com/viz.html").unwrap().as_str(),
            "https://cdn.example.com/viz.html"
        );
    }

    #[test]
    fn report_url_encodes_content() {
        let url = client().report_url("Collisions: 2 & counting").unwrap();
        assert_eq!(url.path(), "/mission/report");
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "report_content");
        assert_eq!(value, "Collisions: 2 & counting");
        assert!(!url.as_str().contains(" & "));
    }

    #[test]
    fn report_url_sends_spaces_as_percent_twenty() {
        let url = client().report_url("Delta v: 1+2 km/s").unwrap();
        assert_eq!(
            url.query(),
            Some("report_content=Delta%20v%3A%201%2B2%20km%2Fs")
        );
        let (_, value) = url.query_pairs().next().unwrap();
        assert_eq!(value, "Delta v: 1+2 km/s");
    }

    #[tokio::test]
    async fn uploads_catalogue_file_as_multipart() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let client = BackendClient::new(&stub.base_url(), Duration::from_secs(5)).unwrap();
        let tle = "1 25544U 98067A   25057.47232210  .00016717  00000-0  10270-3 0  9005
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

        let message = client
            .upload_file("active.txt", tle.as_bytes().to_vec())
            .await
            .unwrap();
        assert_eq!(message, "TLE processed successfully");
        let bounds = client.timestamp_bounds().await.unwrap();
        assert_eq!(bounds.min, "2025/02/26 11:20:08");
    }

    #[tokio::test]
    async fn error_field_in_success_reply_is_server_error() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let client = BackendClient::new(&stub.base_url(), Duration::from_secs(5)).unwrap();
        let request = TrajectoryRequest {
            rocket_type: "Falcon 9".into(),
            launch_site: "Cape Canaveral SLC-40".into(),
            launch_site_coordinates: "garbage".into(),
            target_altitude: 500.0,
            orbit_type: OrbitType::Leo,
            timestamp: "2025/02/27 00:00:00".parse().unwrap(),
        };

        let err = client.initial_trajectory(&request).await.unwrap_err();
        assert!(matches!(
            &err,
            BackendError::Server {
                endpoint: INITIAL_TRAJECTORY,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Launch site coordinates are unreadable");
    }

    #[test]
    fn rejects_non_hierarchical_base() {
        assert!(matches!(
            BackendClient::new("mailto:ops@example.com", Duration::from_secs(1)),
            Err(BackendError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn fetches_rockets_from_backend() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let client = BackendClient::new(&stub.base_url(), Duration::from_secs(5)).unwrap();
        let rockets = client
            .rockets(&RocketQuery {
                orbit_type: OrbitType::Geo,
                target_altitude: 35_786.0,
            })
            .await
            .unwrap();
        assert!(!rockets.is_empty());
        assert!(rockets.iter().all(|rocket| !rocket.launch_site.is_empty()));
    }

    #[tokio::test]
    async fn server_error_status_carries_detail() {
        let stub = StubBackend::spawn(([127, 0, 0, 1], 0).into()).unwrap();
        let client = BackendClient::new(&stub.base_url(), Duration::from_secs(5)).unwrap();
        let err = client.timestamp_bounds().await.unwrap_err();
        match err {
            BackendError::Status { status, detail, .. } => {
                assert_eq!(status, 400);
                assert!(detail.unwrap().contains("No TLE data"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let client = BackendClient::new("http://127.0.0.1:9/", Duration::from_millis(500)).unwrap();
        let err = client.timestamp_bounds().await.unwrap_err();
        assert!(matches!(err, BackendError::Transport { .. }));
    }
}
