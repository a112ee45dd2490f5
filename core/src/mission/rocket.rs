use crate::prelude::{WizardError, WizardResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rocket/launch-site pairing as returned by `/get_rockets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketOption {
    #[serde(rename = "Rocket_Type")]
    pub rocket_type: String,
    #[serde(rename = "Launch_Site")]
    pub launch_site: String,
    #[serde(rename = "Launch_Site_Coordinates")]
    pub launch_site_coordinates: String,
}

impl RocketOption {
    pub fn label(&self) -> String {
        format!("{} - {}", self.rocket_type, self.launch_site)
    }

    pub fn coordinates(&self) -> WizardResult<LaunchCoordinates> {
        self.launch_site_coordinates.parse()
    }
}

/// Launch site position carried as `(x, y, z)` text on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchCoordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FromStr for LaunchCoordinates {
    type Err = WizardError;

    fn from_str(text: &str) -> WizardResult<Self> {
        let invalid = || WizardError::Coordinates(text.to_string());
        let inner = text
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');
        let values = inner
            .split([',', ';'])
            .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<WizardResult<Vec<_>>>()?;
        match values.as_slice() {
            [x, y, z] => Ok(Self {
                x: *x,
                y: *y,
                z: *z,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for LaunchCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Resolves the textual value of a rocket picker against the retained list.
///
/// Blank text means nothing was picked.
pub fn select_rocket<'a>(options: &'a [RocketOption], selection: &str) -> WizardResult<&'a RocketOption> {
    let selection = selection.trim();
    if selection.is_empty() {
        return Err(WizardError::MissingRocket);
    }
    selection
        .parse::<usize>()
        .ok()
        .and_then(|index| options.get(index))
        .ok_or_else(|| WizardError::UnknownRocket {
            index: selection.to_string(),
            available: options.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<RocketOption> {
        vec![
            RocketOption {
                rocket_type: "Falcon 9".into(),
                launch_site: "Cape Canaveral".into(),
                launch_site_coordinates: "(28.5, -80.6, 0.0)".into(),
            },
            RocketOption {
                rocket_type: "Electron".into(),
                launch_site: "Mahia Peninsula".into(),
                launch_site_coordinates: "(-39.26, 177.86, 0.0)".into(),
            },
        ]
    }

    #[test]
    fn decodes_backend_field_names() {
        let json = r#"[{"Rocket_Type":"PSLV","Launch_Site":"Sriharikota","Launch_Site_Coordinates":"(13.72, 80.23, 0)"}]"#;
        let rockets: Vec<RocketOption> = serde_json::from_str(json).unwrap();
        assert_eq!(rockets[0].label(), "PSLV - Sriharikota");
        assert_eq!(rockets[0].coordinates().unwrap().y, 80.23);
    }

    #[test]
    fn blank_selection_is_missing_rocket() {
        assert_eq!(
            select_rocket(&options(), " "),
            Err(WizardError::MissingRocket)
        );
    }

    #[test]
    fn selection_indexes_retained_list() {
        let options = options();
        assert_eq!(select_rocket(&options, "1").unwrap().rocket_type, "Electron");
        assert!(matches!(
            select_rocket(&options, "2"),
            Err(WizardError::UnknownRocket { available: 2, .. })
        ));
        assert!(select_rocket(&options, "first").is_err());
    }

    #[test]
    fn coordinates_accept_comma_or_semicolon_separators() {
        let coords: LaunchCoordinates = "(1.5;2;-3)".parse().unwrap();
        assert_eq!(coords, LaunchCoordinates { x: 1.5, y: 2.0, z: -3.0 });
        assert_eq!(coords.to_string(), "(1.5, 2, -3)");
        assert!("(1, 2)".parse::<LaunchCoordinates>().is_err());
    }
}
