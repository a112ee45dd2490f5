use crate::prelude::{WizardError, WizardResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geostationary altitude in km; the only altitude a GEO mission may target.
pub const GEO_ALTITUDE_KM: f64 = 35_786.0;

/// Altitude-banded orbit classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrbitType {
    Leo,
    Meo,
    Geo,
    Heo,
}

impl OrbitType {
    pub const ALL: [OrbitType; 4] = [Self::Leo, Self::Meo, Self::Geo, Self::Heo];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Leo => "LEO",
            Self::Meo => "MEO",
            Self::Geo => "GEO",
            Self::Heo => "HEO",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Leo => "Low Earth Orbit",
            Self::Meo => "Medium Earth Orbit",
            Self::Geo => "Geostationary Orbit",
            Self::Heo => "High Earth Orbit",
        }
    }

    pub fn altitude_range(&self) -> AltitudeRange {
        match self {
            Self::Leo => AltitudeRange::new(200.0, 2_000.0),
            Self::Meo => AltitudeRange::new(2_000.0, GEO_ALTITUDE_KM),
            Self::Geo => AltitudeRange::new(GEO_ALTITUDE_KM, GEO_ALTITUDE_KM),
            Self::Heo => AltitudeRange::new(35_787.0, 50_000.0),
        }
    }

    /// Checks a numeric altitude against this orbit's band.
    pub fn validate_altitude_km(&self, altitude: f64) -> WizardResult<f64> {
        let range = self.altitude_range();
        if range.contains(altitude) {
            Ok(altitude)
        } else {
            Err(WizardError::AltitudeOutOfRange {
                orbit: *self,
                min: range.min_km,
                max: range.max_km,
            })
        }
    }

    /// Validates the text of the altitude field. GEO ignores the text entirely.
    pub fn validate_altitude(&self, input: &str) -> WizardResult<f64> {
        if self.altitude_range().is_fixed() {
            return Ok(self.altitude_range().min_km);
        }
        let altitude = input.trim().parse::<f64>().unwrap_or(f64::NAN);
        self.validate_altitude_km(altitude)
    }
}

impl fmt::Display for OrbitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OrbitType {
    type Err = WizardError;

    fn from_str(text: &str) -> WizardResult<Self> {
        let wanted = text.trim();
        Self::ALL
            .into_iter()
            .find(|orbit| orbit.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| WizardError::UnknownOrbit(wanted.to_string()))
    }
}

/// Closed altitude interval in km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeRange {
    pub min_km: f64,
    pub max_km: f64,
}

impl AltitudeRange {
    pub const fn new(min_km: f64, max_km: f64) -> Self {
        Self { min_km, max_km }
    }

    pub fn is_fixed(&self) -> bool {
        self.min_km == self.max_km
    }

    /// NaN never falls inside a range.
    pub fn contains(&self, altitude: f64) -> bool {
        altitude >= self.min_km && altitude <= self.max_km
    }
}

/// State of the altitude input after an orbit type has been picked.
#[derive(Debug, Clone, PartialEq)]
pub struct AltitudeField {
    pub orbit: OrbitType,
    pub value: Option<f64>,
    pub locked: bool,
}

impl AltitudeField {
    pub fn for_orbit(orbit: OrbitType) -> Self {
        let range = orbit.altitude_range();
        if range.is_fixed() {
            Self {
                orbit,
                value: Some(range.min_km),
                locked: true,
            }
        } else {
            Self {
                orbit,
                value: None,
                locked: false,
            }
        }
    }

    pub fn hint(&self) -> String {
        let range = self.orbit.altitude_range();
        if range.is_fixed() {
            format!("Fixed at {} km", range.min_km)
        } else {
            format!(
                "Enter target altitude between {}-{} km",
                range.min_km, range.max_km
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leo_accepts_in_band_altitude() {
        assert_eq!(OrbitType::Leo.validate_altitude("1500").unwrap(), 1500.0);
    }

    #[test]
    fn leo_rejects_out_of_band_altitude_with_range_message() {
        let err = OrbitType::Leo.validate_altitude("3000").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Altitude for LEO must be between 200 and 2000 km"
        );
    }

    #[test]
    fn non_numeric_altitude_is_out_of_range() {
        assert!(matches!(
            OrbitType::Meo.validate_altitude("high"),
            Err(WizardError::AltitudeOutOfRange { .. })
        ));
        assert!(OrbitType::Heo.validate_altitude("").is_err());
    }

    #[test]
    fn band_edges_follow_the_fixed_table() {
        assert!(OrbitType::Meo.validate_altitude_km(2_000.0).is_ok());
        assert!(OrbitType::Meo.validate_altitude_km(35_786.0).is_ok());
        assert!(OrbitType::Heo.validate_altitude_km(35_786.0).is_err());
        assert!(OrbitType::Heo.validate_altitude_km(50_000.0).is_ok());
        assert!(OrbitType::Heo.validate_altitude_km(50_000.5).is_err());
    }

    #[test]
    fn geo_forces_fixed_altitude_and_locks_field() {
        let field = AltitudeField::for_orbit(OrbitType::Geo);
        assert_eq!(field.value, Some(GEO_ALTITUDE_KM));
        assert!(field.locked);
        assert_eq!(field.hint(), "Fixed at 35786 km");
        assert_eq!(OrbitType::Geo.validate_altitude("12").unwrap(), GEO_ALTITUDE_KM);
    }

    #[test]
    fn other_orbits_clear_and_unlock_field() {
        let field = AltitudeField::for_orbit(OrbitType::Leo);
        assert_eq!(field.value, None);
        assert!(!field.locked);
        assert_eq!(field.hint(), "Enter target altitude between 200-2000 km");
    }

    #[test]
    fn orbit_codes_parse_case_insensitively() {
        assert_eq!("heo".parse::<OrbitType>().unwrap(), OrbitType::Heo);
        assert_eq!(" GEO ".parse::<OrbitType>().unwrap(), OrbitType::Geo);
        assert!(matches!(
            "SSO".parse::<OrbitType>(),
            Err(WizardError::UnknownOrbit(_))
        ));
    }

    #[test]
    fn orbit_serializes_as_upper_case_code() {
        assert_eq!(serde_json::to_string(&OrbitType::Meo).unwrap(), "\"MEO\"");
    }
}
