//! Retained state of one wizard run.
//!
//! The session is the single source of truth for every confirmed answer. In
//! particular the rocket list is stored once at the orbit step and every
//! later step reads it from here instead of asking the backend again.

use crate::api::dto::{DebrisRequest, RocketQuery, TrajectoryRequest};
use crate::mission::debris::DebrisCount;
use crate::mission::orbit::{AltitudeField, OrbitType};
use crate::mission::rocket::{select_rocket, RocketOption};
use crate::mission::timestamp::{LaunchTimestamp, TimestampWindow};
use crate::prelude::{WizardError, WizardResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which backend pipeline a mission runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionFlow {
    /// User-supplied TLE catalogue, processed by `/process_trajectory`.
    Catalog,
    /// Backend-generated debris, processed by `/process_dummy_trajectory`.
    #[default]
    Synthetic,
}

impl FromStr for MissionFlow {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "synthetic" => Ok(Self::Synthetic),
            other => Err(format!(
                "unknown flow {other:?} (expected catalog or synthetic)"
            )),
        }
    }
}

impl fmt::Display for MissionFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => f.write_str("catalog"),
            Self::Synthetic => f.write_str("synthetic"),
        }
    }
}

/// Wizard stages in the order they unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStage {
    TleIngest,
    Timestamp,
    Orbit,
    Rocket,
    Debris,
    Processing,
    Complete,
}

impl fmt::Display for WizardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TleIngest => "TLE ingest",
            Self::Timestamp => "timestamp",
            Self::Orbit => "orbit",
            Self::Rocket => "rocket",
            Self::Debris => "debris",
            Self::Processing => "processing",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Confirmed orbit parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitChoice {
    pub orbit: OrbitType,
    pub altitude_km: f64,
}

/// In-memory mission state, populated step by step.
#[derive(Debug, Clone)]
pub struct MissionSession {
    flow: MissionFlow,
    stage: WizardStage,
    window: Option<TimestampWindow>,
    timestamp: Option<LaunchTimestamp>,
    altitude_field: Option<AltitudeField>,
    orbit: Option<OrbitChoice>,
    rockets: Vec<RocketOption>,
    rocket: Option<RocketOption>,
    debris: Option<DebrisCount>,
}

impl MissionSession {
    pub fn new(flow: MissionFlow) -> Self {
        let stage = match flow {
            MissionFlow::Catalog => WizardStage::TleIngest,
            MissionFlow::Synthetic => WizardStage::Timestamp,
        };
        Self {
            flow,
            stage,
            window: None,
            timestamp: None,
            altitude_field: None,
            orbit: None,
            rockets: Vec::new(),
            rocket: None,
            debris: None,
        }
    }

    pub fn flow(&self) -> MissionFlow {
        self.flow
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn window(&self) -> Option<&TimestampWindow> {
        self.window.as_ref()
    }

    pub fn timestamp(&self) -> Option<LaunchTimestamp> {
        self.timestamp
    }

    pub fn orbit(&self) -> Option<OrbitChoice> {
        self.orbit
    }

    pub fn altitude_field(&self) -> Option<&AltitudeField> {
        self.altitude_field.as_ref()
    }

    pub fn rockets(&self) -> &[RocketOption] {
        &self.rockets
    }

    pub fn rocket(&self) -> Option<&RocketOption> {
        self.rocket.as_ref()
    }

    pub fn debris(&self) -> Option<DebrisCount> {
        self.debris
    }

    /// Accepts an action for `stage` only once that stage is unlocked and
    /// nothing is being processed.
    fn require(&self, stage: WizardStage, action: &'static str) -> WizardResult<()> {
        let busy = matches!(self.stage, WizardStage::Processing | WizardStage::Complete);
        if busy || self.stage < stage {
            return Err(WizardError::OutOfOrder {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    /// Moves to `stage`, dropping everything confirmed after it.
    fn unlock(&mut self, stage: WizardStage) {
        if stage <= WizardStage::Timestamp {
            self.timestamp = None;
        }
        if stage <= WizardStage::Orbit {
            self.orbit = None;
            self.altitude_field = None;
        }
        if stage <= WizardStage::Rocket {
            self.rockets.clear();
            self.rocket = None;
        }
        if stage <= WizardStage::Debris {
            self.debris = None;
        }
        self.stage = stage;
    }

    /// Stores the validity window served for the accepted catalogue.
    pub fn catalog_accepted(&mut self, window: TimestampWindow) -> WizardResult<()> {
        self.require(WizardStage::TleIngest, "catalog upload")?;
        self.window = Some(window);
        self.unlock(WizardStage::Timestamp);
        Ok(())
    }

    /// Installs the locally generated window of a synthetic mission.
    pub fn use_window(&mut self, window: TimestampWindow) -> WizardResult<()> {
        self.require(WizardStage::Timestamp, "timestamp window")?;
        self.window = Some(window);
        self.unlock(WizardStage::Timestamp);
        Ok(())
    }

    pub fn confirm_timestamp(
        &mut self,
        input: &str,
        default_to_start: bool,
    ) -> WizardResult<LaunchTimestamp> {
        self.require(WizardStage::Timestamp, "timestamp confirmation")?;
        let window = self.window.ok_or(WizardError::WindowUnavailable)?;
        let timestamp = window.resolve(input, default_to_start)?;
        self.unlock(WizardStage::Orbit);
        self.timestamp = Some(timestamp);
        Ok(timestamp)
    }

    /// Picking an orbit type only reshapes the altitude input.
    pub fn select_orbit(&mut self, orbit: OrbitType) -> WizardResult<&AltitudeField> {
        self.require(WizardStage::Orbit, "orbit selection")?;
        let field = self.altitude_field.insert(AltitudeField::for_orbit(orbit));
        Ok(&*field)
    }

    /// Validates orbit and altitude; the returned query is what `/get_rockets` expects.
    pub fn confirm_orbit(&mut self, orbit: OrbitType, altitude: &str) -> WizardResult<RocketQuery> {
        self.require(WizardStage::Orbit, "orbit confirmation")?;
        let altitude_km = orbit.validate_altitude(altitude)?;
        self.unlock(WizardStage::Orbit);
        self.altitude_field = Some(AltitudeField::for_orbit(orbit));
        self.orbit = Some(OrbitChoice { orbit, altitude_km });
        Ok(RocketQuery {
            orbit_type: orbit,
            target_altitude: altitude_km,
        })
    }

    /// Retains the rocket list for the confirmed orbit and reveals the rocket step.
    pub fn load_rockets(&mut self, rockets: Vec<RocketOption>) -> WizardResult<()> {
        self.require(WizardStage::Orbit, "rocket list")?;
        let choice = self.orbit.ok_or(WizardError::OutOfOrder {
            action: "rocket list",
            stage: self.stage,
        })?;
        if rockets.is_empty() {
            return Err(WizardError::NoRockets {
                orbit: choice.orbit,
                altitude: choice.altitude_km,
            });
        }
        self.unlock(WizardStage::Rocket);
        self.rockets = rockets;
        Ok(())
    }

    /// Resolves the picked index against the retained list.
    pub fn confirm_rocket(&mut self, selection: &str) -> WizardResult<TrajectoryRequest> {
        self.require(WizardStage::Rocket, "rocket selection")?;
        let rocket = select_rocket(&self.rockets, selection)?.clone();
        self.rocket = Some(rocket);
        self.debris = None;
        self.stage = WizardStage::Rocket;
        self.trajectory_request()
    }

    /// Payload shared by `/dummy_initial_trajectory` and `/process_trajectory`.
    pub fn trajectory_request(&self) -> WizardResult<TrajectoryRequest> {
        let missing = WizardError::OutOfOrder {
            action: "trajectory request",
            stage: self.stage,
        };
        let (Some(timestamp), Some(choice), Some(rocket)) =
            (self.timestamp, self.orbit, self.rocket.as_ref())
        else {
            return Err(missing);
        };
        Ok(TrajectoryRequest {
            rocket_type: rocket.rocket_type.clone(),
            launch_site: rocket.launch_site.clone(),
            launch_site_coordinates: rocket.launch_site_coordinates.clone(),
            target_altitude: choice.altitude_km,
            orbit_type: choice.orbit,
            timestamp,
        })
    }

    /// The backend accepted the initial trajectory; synthetic missions move on to debris.
    pub fn initial_trajectory_ready(&mut self) -> WizardResult<()> {
        self.require(WizardStage::Rocket, "initial trajectory")?;
        if self.flow != MissionFlow::Synthetic || self.rocket.is_none() {
            return Err(WizardError::OutOfOrder {
                action: "initial trajectory",
                stage: self.stage,
            });
        }
        self.stage = WizardStage::Debris;
        Ok(())
    }

    pub fn confirm_debris(&mut self, input: &str) -> WizardResult<DebrisRequest> {
        self.require(WizardStage::Debris, "debris generation")?;
        let count: DebrisCount = input.parse()?;
        let trajectory = self.trajectory_request()?;
        self.debris = Some(count);
        Ok(DebrisRequest {
            count,
            timestamp: trajectory.timestamp,
            target_altitude: trajectory.target_altitude,
            orbit_type: trajectory.orbit_type,
            rocket_type: trajectory.rocket_type,
            launch_site_coordinates: trajectory.launch_site_coordinates,
        })
    }

    /// Stage that issues the processing call for this flow.
    pub fn processing_origin(&self) -> WizardStage {
        match self.flow {
            MissionFlow::Catalog => WizardStage::Rocket,
            MissionFlow::Synthetic => WizardStage::Debris,
        }
    }

    pub fn begin_processing(&mut self) -> WizardResult<()> {
        let origin = self.processing_origin();
        self.require(origin, "processing")?;
        let ready = match self.flow {
            MissionFlow::Catalog => self.rocket.is_some(),
            MissionFlow::Synthetic => self.debris.is_some(),
        };
        if !ready {
            return Err(WizardError::OutOfOrder {
                action: "processing",
                stage: self.stage,
            });
        }
        self.stage = WizardStage::Processing;
        Ok(())
    }

    /// Returns control to the issuing step after a failed processing call.
    pub fn processing_failed(&mut self) {
        if self.stage == WizardStage::Processing {
            self.stage = self.processing_origin();
        }
    }

    pub fn complete(&mut self) -> WizardResult<()> {
        if self.stage != WizardStage::Processing {
            return Err(WizardError::OutOfOrder {
                action: "completion",
                stage: self.stage,
            });
        }
        self.stage = WizardStage::Complete;
        Ok(())
    }
}
