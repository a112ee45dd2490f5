pub mod debris;
pub mod orbit;
pub mod rocket;
pub mod timestamp;
pub mod tle;

pub use debris::DebrisCount;
pub use orbit::{AltitudeField, AltitudeRange, OrbitType, GEO_ALTITUDE_KM};
pub use rocket::{select_rocket, LaunchCoordinates, RocketOption};
pub use timestamp::{LaunchTimestamp, TimestampWindow, TIMESTAMP_FORMAT};
pub use tle::TleSubmission;
