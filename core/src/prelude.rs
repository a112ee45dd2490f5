use crate::mission::orbit::OrbitType;
use crate::session::WizardStage;

/// Rejection raised by local validation or by the session state machine.
///
/// The `Display` text of each variant is the alert shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("Invalid format. Use YYYY/MM/DD HH:MM:SS (e.g., 2024/06/06 05:11:42)")]
    TimestampFormat,
    #[error("Timestamp must be between {min} and {max}")]
    TimestampOutOfWindow { min: String, max: String },
    #[error("timestamp window is inverted: {min} is after {max}")]
    InvertedWindow { min: String, max: String },
    #[error("timestamp window has not been loaded yet")]
    WindowUnavailable,
    #[error("Unknown orbit type {0:?}. Choose one of LEO, MEO, GEO, HEO.")]
    UnknownOrbit(String),
    #[error("Altitude for {orbit} must be between {min} and {max} km")]
    AltitudeOutOfRange { orbit: OrbitType, min: f64, max: f64 },
    #[error("No rockets available for {orbit} at {altitude} km")]
    NoRockets { orbit: OrbitType, altitude: f64 },
    #[error("Please select a rocket.")]
    MissingRocket,
    #[error("Rocket #{index} is not in the list ({available} available)")]
    UnknownRocket { index: String, available: usize },
    #[error("invalid launch site coordinates {0:?}")]
    Coordinates(String),
    #[error("Please enter a number between {min} and {max}.")]
    DebrisCountOutOfRange { min: u32, max: u32 },
    #[error("Please paste some TLE data first.")]
    MissingTleText,
    #[error("Invalid TLE format: needs \"1 \" and \"2 \" lines.")]
    MalformedTle,
    #[error("Please upload a TLE file first.")]
    MissingTleFile,
    #[error("Invalid file {0:?}: only .txt TLE files are accepted")]
    TleFileType(String),
    #[error("{action} is not available during the {stage} step")]
    OutOfOrder {
        action: &'static str,
        stage: WizardStage,
    },
}

pub type WizardResult<T> = Result<T, WizardError>;
