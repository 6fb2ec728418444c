use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
    Strength,
    #[default]
    Hypertrophy,
    Endurance,
    /// Disables the engine: the form is left as the lifter typed it.
    NoRecommendation,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown training goal: {0}")]
pub struct GoalParseError(pub String);

/// Tunables for one training goal. Fractions are relative to the computed weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalConfig {
    pub reps_low: u32,
    pub reps_high: u32,
    pub target_rir: f64,
    pub max_step_up: f64,
    pub max_step_down: f64,
    pub fatigue_drop: f64,
    pub min_delta_compound: f64,
    pub min_delta_isolation: f64,
}

const STRENGTH: GoalConfig = GoalConfig {
    reps_low: 3,
    reps_high: 6,
    target_rir: 2.0,
    max_step_up: 0.05,
    max_step_down: 0.10,
    fatigue_drop: 0.05,
    min_delta_compound: 2.5,
    min_delta_isolation: 1.25,
};

const HYPERTROPHY: GoalConfig = GoalConfig {
    reps_low: 6,
    reps_high: 12,
    target_rir: 2.0,
    max_step_up: 0.05,
    max_step_down: 0.10,
    fatigue_drop: 0.05,
    min_delta_compound: 2.5,
    min_delta_isolation: 1.25,
};

const ENDURANCE: GoalConfig = GoalConfig {
    reps_low: 12,
    reps_high: 20,
    target_rir: 3.0,
    max_step_up: 0.04,
    max_step_down: 0.10,
    fatigue_drop: 0.08,
    min_delta_compound: 2.5,
    min_delta_isolation: 1.25,
};

impl TrainingGoal {
    pub fn all() -> &'static [TrainingGoal] {
        &[
            TrainingGoal::Strength,
            TrainingGoal::Hypertrophy,
            TrainingGoal::Endurance,
            TrainingGoal::NoRecommendation,
        ]
    }

    /// `None` for [`TrainingGoal::NoRecommendation`], which has nothing to tune.
    pub fn config(self) -> Option<&'static GoalConfig> {
        match self {
            TrainingGoal::Strength => Some(&STRENGTH),
            TrainingGoal::Hypertrophy => Some(&HYPERTROPHY),
            TrainingGoal::Endurance => Some(&ENDURANCE),
            TrainingGoal::NoRecommendation => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TrainingGoal::Strength => "Strength",
            TrainingGoal::Hypertrophy => "Hypertrophy",
            TrainingGoal::Endurance => "Endurance",
            TrainingGoal::NoRecommendation => "No recommendation",
        }
    }
}

impl fmt::Display for TrainingGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TrainingGoal {
    type Err = GoalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "strength" => Ok(TrainingGoal::Strength),
            "hypertrophy" => Ok(TrainingGoal::Hypertrophy),
            "endurance" => Ok(TrainingGoal::Endurance),
            "no_recommendation" | "none" | "off" => Ok(TrainingGoal::NoRecommendation),
            _ => Err(GoalParseError(s.to_string())),
        }
    }
}

impl GoalConfig {
    /// Middle of the rep range, rounded down.
    pub fn target_reps(&self) -> u32 {
        (self.reps_low + self.reps_high) / 2
    }

    pub fn clamp_reps(&self, reps: u32) -> u32 {
        reps.clamp(self.reps_low, self.reps_high)
    }

    pub fn min_delta(&self, is_compound: bool) -> f64 {
        if is_compound {
            self.min_delta_compound
        } else {
            self.min_delta_isolation
        }
    }
}
