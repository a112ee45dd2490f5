use crate::backend::client::{
    GENERATE_DEBRIS, GET_ROCKETS, GET_TIMESTAMPS, INITIAL_TRAJECTORY, PROCESS_SYNTHETIC,
    PROCESS_TRAJECTORY, REPORT, UPLOAD,
};
use crate::stub::catalog;
use anyhow::Context;
use chrono::Duration;
use futures::TryStreamExt;
use launchcore::api::{
    Acknowledgement, DebrisRequest, ProcessingReport, RocketQuery, TimestampBounds,
    TrajectoryRequest, UploadText,
};
use launchcore::mission::timestamp::SYNTHETIC_WINDOW_DAYS;
use launchcore::mission::tle::{earliest_epoch, validate_file_name};
use launchcore::mission::{LaunchCoordinates, LaunchTimestamp};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use warp::http::StatusCode;
use warp::hyper::body::Buf;
use warp::multipart::{FormData, Part};
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection};

const MAX_UPLOAD_BYTES: u64 = 8 * 1024 * 1024;
const VIZ_PATH: &str = "static/trajectory.html";

/// What the stub remembers between requests.
#[derive(Debug, Default)]
struct StubState {
    catalog_epoch: Option<LaunchTimestamp>,
    generated_debris: Option<u32>,
    rocket_requests: usize,
}

type SharedState = Arc<RwLock<StubState>>;

fn read(state: &SharedState) -> RwLockReadGuard<'_, StubState> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(state: &SharedState) -> RwLockWriteGuard<'_, StubState> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deterministic stand-in for the trajectory backend.
///
/// It speaks the same endpoints with canned answers so the wizard can be
/// demonstrated and exercised end to end without the real service.
pub struct StubBackend {
    addr: SocketAddr,
    state: SharedState,
}

impl StubBackend {
    /// Binds `addr` (port 0 picks a free one) and serves on the current tokio runtime.
    pub fn spawn(addr: SocketAddr) -> anyhow::Result<Self> {
        let state: SharedState = Arc::new(RwLock::new(StubState::default()));
        let (addr, server) = warp::serve(routes(state.clone()))
            .try_bind_ephemeral(addr)
            .with_context(|| format!("binding stub backend on {addr}"))?;
        tokio::spawn(server);
        info!("stub backend listening on http://{}", addr);
        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Number of `/get_rockets` calls served so far.
    pub fn rocket_requests(&self) -> usize {
        read(&self.state).rocket_requests
    }
}

fn reply<T: Serialize>(body: &T, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn failure(status: StatusCode, message: &str) -> WithStatus<Json> {
    warn!("stub backend refusing request: {}", message);
    reply(&Acknowledgement::rejected(message), status)
}

fn routes(
    state: SharedState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let timestamps = warp::path(GET_TIMESTAMPS)
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedState| timestamp_bounds(&state));

    let upload_text = warp::path(UPLOAD)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .map(|body: UploadText, state: SharedState| {
            ingest(&state, &body.text, "TLE text saved and processed successfully")
        });

    let upload_file = warp::path(UPLOAD)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::multipart::form().max_length(MAX_UPLOAD_BYTES))
        .and(state_filter.clone())
        .and_then(upload_form);

    let rockets = warp::path(GET_ROCKETS)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .map(|query: RocketQuery, state: SharedState| {
            write(&state).rocket_requests += 1;
            let rockets = catalog::eligible(query.orbit_type, query.target_altitude);
            if rockets.is_empty() {
                return failure(
                    StatusCode::BAD_REQUEST,
                    &format!(
                        "No rockets available for {} at {} km",
                        query.orbit_type, query.target_altitude
                    ),
                );
            }
            reply(&rockets, StatusCode::OK)
        });

    let initial = warp::path(INITIAL_TRAJECTORY)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .map(|payload: TrajectoryRequest| {
            if payload.launch_site_coordinates.parse::<LaunchCoordinates>().is_err() {
                return reply(
                    &Acknowledgement::rejected("Launch site coordinates are unreadable"),
                    StatusCode::OK,
                );
            }
            reply(
                &Acknowledgement::accepted(format!(
                    "Initial trajectory calculated for {} from {}",
                    payload.rocket_type, payload.launch_site
                )),
                StatusCode::OK,
            )
        });

    let generate = warp::path(GENERATE_DEBRIS)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .map(|payload: DebrisRequest, state: SharedState| {
            write(&state).generated_debris = Some(payload.count.get());
            reply(
                &Acknowledgement::accepted(format!(
                    "Generated {} dummy TLEs positioned on trajectory",
                    payload.count
                )),
                StatusCode::OK,
            )
        });

    let process_synthetic = warp::path(PROCESS_SYNTHETIC)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .map(|payload: DebrisRequest, state: SharedState| {
            if read(&state).generated_debris.is_none() {
                return failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No dummy TLEs generated for this trajectory",
                );
            }
            let collisions = (payload.count.get() / 10) as usize;
            let summary = MissionSummary {
                rocket_type: &payload.rocket_type,
                launch_site: None,
                orbit: payload.orbit_type.code(),
                altitude_km: payload.target_altitude,
                timestamp: payload.timestamp,
                debris: Some(payload.count.get()),
            };
            reply(&summary.report(collisions), StatusCode::OK)
        });

    let process_catalog = warp::path(PROCESS_TRAJECTORY)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter)
        .map(|payload: TrajectoryRequest, state: SharedState| {
            if read(&state).catalog_epoch.is_none() {
                return failure(StatusCode::INTERNAL_SERVER_ERROR, "TLE data file not found");
            }
            let summary = MissionSummary {
                rocket_type: &payload.rocket_type,
                launch_site: Some(&payload.launch_site),
                orbit: payload.orbit_type.code(),
                altitude_km: payload.target_altitude,
                timestamp: payload.timestamp,
                debris: None,
            };
            reply(&summary.report(0), StatusCode::OK)
        });

    let report = warp::path(REPORT)
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .map(|query: HashMap<String, String>| {
            query.get("report_content").cloned().unwrap_or_default()
        });

    let visualization = warp::path("static")
        .and(warp::path("trajectory.html"))
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::html("<html><body><h1>Trajectory preview</h1></body></html>"));

    timestamps
        .or(upload_text.or(upload_file).unify())
        .or(rockets)
        .or(initial)
        .or(generate)
        .or(process_synthetic)
        .or(process_catalog)
        .or(report)
        .or(visualization)
}

fn timestamp_bounds(state: &SharedState) -> WithStatus<Json> {
    match read(state).catalog_epoch {
        Some(start) => {
            let end = start.offset_by(Duration::days(SYNTHETIC_WINDOW_DAYS));
            reply(
                &TimestampBounds {
                    min: start.to_string(),
                    max: end.to_string(),
                },
                StatusCode::OK,
            )
        }
        None => failure(StatusCode::BAD_REQUEST, "No TLE data uploaded yet"),
    }
}

fn ingest(state: &SharedState, text: &str, message: &str) -> WithStatus<Json> {
    match earliest_epoch(text) {
        Some(epoch) => {
            write(state).catalog_epoch = Some(epoch);
            info!("stub catalogue epoch starts {}", epoch);
            reply(&Acknowledgement::accepted(message), StatusCode::OK)
        }
        None => failure(StatusCode::BAD_REQUEST, "No valid TLE pairs found."),
    }
}

fn unreadable(err: warp::Error) -> WithStatus<Json> {
    failure(StatusCode::BAD_REQUEST, &format!("Unreadable upload: {err}"))
}

/// Drains one part. It must be fully read before the form yields the next one.
async fn read_part(part: Part) -> Result<Vec<u8>, warp::Error> {
    let mut contents = Vec::new();
    let mut stream = Box::pin(part.stream());
    while let Some(chunk) = stream.try_next().await? {
        contents.extend_from_slice(chunk.chunk());
    }
    Ok(contents)
}

async fn upload_form(form: FormData, state: SharedState) -> Result<WithStatus<Json>, Rejection> {
    let mut form = Box::pin(form);
    let mut upload = None;
    loop {
        let part = match form.try_next().await {
            Ok(Some(part)) => part,
            Ok(None) => break,
            Err(err) => return Ok(unreadable(err)),
        };
        let field = part.name().to_string();
        let file_name = part.filename().unwrap_or_default().to_string();
        let contents = match read_part(part).await {
            Ok(contents) => contents,
            Err(err) => return Ok(unreadable(err)),
        };
        if field == "file" && upload.is_none() {
            upload = Some((file_name, contents));
        }
    }

    let Some((name, contents)) = upload else {
        return Ok(failure(StatusCode::BAD_REQUEST, "Invalid file"));
    };
    if validate_file_name(Path::new(&name)).is_err() {
        return Ok(failure(StatusCode::BAD_REQUEST, "Invalid file"));
    }
    Ok(ingest(
        &state,
        &String::from_utf8_lossy(&contents),
        "TLE processed successfully",
    ))
}

/// Inputs echoed back in the canned mission report.
struct MissionSummary<'a> {
    rocket_type: &'a str,
    launch_site: Option<&'a str>,
    orbit: &'a str,
    altitude_km: f64,
    timestamp: LaunchTimestamp,
    debris: Option<u32>,
}

impl MissionSummary<'_> {
    fn report(&self, collisions: usize) -> ProcessingReport {
        let mut steps = vec!["Calculated initial trajectory".to_string()];
        if let Some(count) = self.debris {
            steps.push(format!("Placed {count} debris objects"));
        }
        steps.push(format!("Detected {collisions} collisions"));
        steps.push(if collisions > 0 {
            "Optimized trajectory".to_string()
        } else {
            "No optimization needed".to_string()
        });

        let mut content = format!(
            "Mission Report\nRocket: {}\n",
            self.rocket_type
        );
        if let Some(site) = self.launch_site {
            content.push_str(&format!("Launch site: {site}\n"));
        }
        content.push_str(&format!(
            "Orbit: {} at {} km\nLaunch time: {}\nCollisions: {}\n",
            self.orbit, self.altitude_km, self.timestamp, collisions
        ));

        ProcessingReport {
            steps,
            viz_url: format!("/{VIZ_PATH}"),
            report_content: content,
            collisions: Some(collisions),
            error: None,
        }
    }
}
