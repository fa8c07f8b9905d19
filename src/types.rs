use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How the device accepts work.
///
/// - `Manual`: single tasks are started one at a time by the caller.
/// - `GuidedCooking`: recipes run their steps in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Manual,
    #[serde(alias = "guided_cooking")]
    #[serde(rename = "guided")]
    GuidedCooking,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Manual
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Manual => f.write_str("manual"),
            Mode::GuidedCooking => f.write_str("guided cooking"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(Mode::Manual),
            "guided" | "guided_cooking" | "guided-cooking" => Ok(Mode::GuidedCooking),
            other => Err(format!(
                "invalid mode: {other} (expected \"manual\" or \"guided\")"
            )),
        }
    }
}

/// How live readouts approach a task's targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ramp {
    /// Move linearly from the baseline to the target over the task duration.
    Linear,
    /// Jump to the target on the first tick.
    Step,
}

impl Default for Ramp {
    fn default() -> Self {
        Ramp::Linear
    }
}

/// Recipe difficulty, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Medium => f.write_str("medium"),
            Difficulty::Hard => f.write_str("hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "invalid difficulty: {other} (expected \"easy\", \"medium\" or \"hard\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("Guided".parse::<Mode>(), Ok(Mode::GuidedCooking));
        assert_eq!("guided-cooking".parse::<Mode>(), Ok(Mode::GuidedCooking));
        assert_eq!(" manual ".parse::<Mode>(), Ok(Mode::Manual));
        assert!("auto".parse::<Mode>().is_err());
    }

    #[test]
    fn difficulty_is_ordinal() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
    }
}
