//! Client-side checks for TLE catalogues handed to `/upload`.
//!
//! The backend does the real preprocessing; these helpers only keep obviously
//! broken input off the network and give the user an early look at the data.

use crate::mission::timestamp::LaunchTimestamp;
use crate::prelude::{WizardError, WizardResult};
use chrono::{Duration, NaiveDate};
use std::path::Path;

/// Catalogue ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum TleSubmission {
    File { name: String, contents: Vec<u8> },
    Text(String),
}

impl TleSubmission {
    pub fn text(&self) -> String {
        match self {
            Self::File { contents, .. } => String::from_utf8_lossy(contents).into_owned(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Pasted catalogue text: must be present and carry both line markers.
pub fn validate_pasted(text: &str) -> WizardResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WizardError::MissingTleText);
    }
    if !text.contains("1 ") || !text.contains("2 ") {
        return Err(WizardError::MalformedTle);
    }
    Ok(text.to_string())
}

/// Uploaded catalogues must be `.txt` files.
pub fn validate_file_name(path: &Path) -> WizardResult<String> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or(WizardError::MissingTleFile)?;
    let is_txt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if !is_txt {
        return Err(WizardError::TleFileType(name.to_string()));
    }
    Ok(name.to_string())
}

/// Adjacent `1 `/`2 ` line pairs, skipping blanks, comments and name lines.
pub fn element_pairs(text: &str) -> Vec<(&str, &str)> {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>();

    let mut pairs = Vec::new();
    let mut idx = 0;
    while idx + 1 < lines.len() {
        if lines[idx].starts_with("1 ") && lines[idx + 1].starts_with("2 ") {
            pairs.push((lines[idx], lines[idx + 1]));
            idx += 2;
        } else {
            idx += 1;
        }
    }
    pairs
}

/// Epoch of a line 1, read from columns 18..32 (`YYDDD.dddddddd`).
pub fn line_epoch(line1: &str) -> Option<LaunchTimestamp> {
    let field = line1.get(18..32)?.trim();
    let value: f64 = field.parse().ok()?;
    // Two-digit year followed by a three-digit day of year.
    if !(0.0..100_000.0).contains(&value) {
        return None;
    }
    let year = 2000 + (value / 1000.0).floor() as i32;
    let day_of_year = value % 1000.0;
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let offset_ms = ((day_of_year - 1.0) * 86_400_000.0).round() as i64;
    Some(LaunchTimestamp::new(start + Duration::milliseconds(offset_ms)))
}

/// Earliest epoch across every well-formed pair in the catalogue.
pub fn earliest_epoch(text: &str) -> Option<LaunchTimestamp> {
    element_pairs(text)
        .into_iter()
        .filter_map(|(line1, _)| line_epoch(line1))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS: &str = "ISS (ZARYA)
1 25544U 98067A   25057.47232210  .00016717  00000-0  10270-3 0  9005
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

    const OLDER: &str = "1 43013U 17073A   25050.00000000  .00000036  00000-0  38405-4 0  9991
2 43013  98.7280  78.4710 0001362  87.2143 272.9190 14.19544419374318";

    #[test]
    fn pasted_text_needs_content_and_markers() {
        assert_eq!(validate_pasted("   "), Err(WizardError::MissingTleText));
        assert_eq!(validate_pasted("hello world"), Err(WizardError::MalformedTle));
        assert!(validate_pasted(ISS).is_ok());
    }

    #[test]
    fn files_must_be_txt() {
        assert_eq!(
            validate_file_name(Path::new("/tmp/catalog.TXT")).unwrap(),
            "catalog.TXT"
        );
        assert!(matches!(
            validate_file_name(Path::new("catalog.csv")),
            Err(WizardError::TleFileType(_))
        ));
        assert_eq!(
            validate_file_name(Path::new("")),
            Err(WizardError::MissingTleFile)
        );
    }

    #[test]
    fn pairs_skip_name_lines_and_orphans() {
        let text = format!("{ISS}\n2 99999 orphan line\n{OLDER}");
        assert_eq!(element_pairs(&text).len(), 2);
    }

    #[test]
    fn epoch_decodes_day_of_year_fraction() {
        let line1 = element_pairs(ISS)[0].0;
        let epoch = line_epoch(line1).unwrap();
        assert_eq!(epoch.to_string(), "2025/02/26 11:20:08");
    }

    #[test]
    fn earliest_epoch_picks_minimum() {
        let text = format!("{ISS}{OLDER}");
        assert_eq!(
            earliest_epoch(&text).unwrap().to_string(),
            "2025/02/19 00:00:00"
        );
        assert_eq!(earliest_epoch("no elements here"), None);
    }

    #[test]
    fn oversized_epoch_field_is_skipped() {
        let bad = ISS.replace("25057.47232210", "99999999999999");
        assert!(validate_pasted(&bad).is_ok());
        let line1 = element_pairs(&bad)[0].0;
        assert_eq!(line_epoch(line1), None);
        assert_eq!(
            earliest_epoch(&format!("{bad}{OLDER}")).unwrap().to_string(),
            "2025/02/19 00:00:00"
        );
    }
}
