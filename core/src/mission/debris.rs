use crate::prelude::{WizardError, WizardResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of synthetic debris objects the backend should place on the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DebrisCount(u32);

impl DebrisCount {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 100;

    pub fn new(count: u32) -> WizardResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(Self::out_of_range())
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    fn out_of_range() -> WizardError {
        WizardError::DebrisCountOutOfRange {
            min: Self::MIN,
            max: Self::MAX,
        }
    }
}

impl FromStr for DebrisCount {
    type Err = WizardError;

    fn from_str(text: &str) -> WizardResult<Self> {
        let count = text
            .trim()
            .parse::<u32>()
            .map_err(|_| Self::out_of_range())?;
        Self::new(count)
    }
}

impl TryFrom<u32> for DebrisCount {
    type Error = WizardError;

    fn try_from(count: u32) -> WizardResult<Self> {
        Self::new(count)
    }
}

impl From<DebrisCount> for u32 {
    fn from(count: DebrisCount) -> u32 {
        count.0
    }
}

impl fmt::Display for DebrisCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_is_rejected() {
        let err = "3".parse::<DebrisCount>().unwrap_err();
        assert_eq!(err.to_string(), "Please enter a number between 5 and 100.");
    }

    #[test]
    fn fifty_is_accepted() {
        assert_eq!("50".parse::<DebrisCount>().unwrap().get(), 50);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(DebrisCount::new(5).is_ok());
        assert!(DebrisCount::new(100).is_ok());
        assert!(DebrisCount::new(101).is_err());
    }

    #[test]
    fn blank_or_fractional_text_is_rejected() {
        assert!("".parse::<DebrisCount>().is_err());
        assert!("12.5".parse::<DebrisCount>().is_err());
        assert!("-7".parse::<DebrisCount>().is_err());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let count = DebrisCount::new(42).unwrap();
        assert_eq!(serde_json::to_string(&count).unwrap(), "42");
        assert!(serde_json::from_str::<DebrisCount>("2").is_err());
    }
}
