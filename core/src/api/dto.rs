use crate::mission::debris::DebrisCount;
use crate::mission::orbit::OrbitType;
use crate::mission::timestamp::LaunchTimestamp;
use serde::{Deserialize, Serialize};

/// `GET /get_timestamps` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampBounds {
    pub min: String,
    pub max: String,
}

/// JSON body of a pasted-catalogue `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadText {
    pub text: String,
}

/// `POST /get_rockets` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RocketQuery {
    pub orbit_type: OrbitType,
    pub target_altitude: f64,
}

/// Rocket + orbit + timestamp payload for trajectory endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryRequest {
    pub rocket_type: String,
    pub launch_site: String,
    pub launch_site_coordinates: String,
    pub target_altitude: f64,
    pub orbit_type: OrbitType,
    pub timestamp: LaunchTimestamp,
}

/// Payload for `/generate_dummy_tles` and `/process_dummy_trajectory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebrisRequest {
    pub count: DebrisCount,
    pub timestamp: LaunchTimestamp,
    pub target_altitude: f64,
    pub orbit_type: OrbitType,
    pub rocket_type: String,
    pub launch_site_coordinates: String,
}

/// Generic `{message?, error?}` reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Acknowledgement {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(error.into()),
        }
    }

    /// Splits the reply into the message on success or the server's error text.
    pub fn into_result(self) -> Result<Option<String>, String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.message),
        }
    }
}

/// Reply of the processing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub viz_url: String,
    #[serde(default)]
    pub report_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collisions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingReport {
    pub fn into_result(self) -> Result<Self, String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}
