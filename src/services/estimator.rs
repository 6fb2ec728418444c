use serde::{Deserialize, Serialize};

use crate::clients::models::common::SetRecord;
use crate::services::intensity::{intensity_fraction, rir_from_effort};

/// A weight × reps result, with the lifter's effort rating when one was given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub weight: f64,
    pub reps: u32,
    pub effort: Option<f64>,
}

impl From<&SetRecord> for Performance {
    fn from(set: &SetRecord) -> Self {
        Self {
            weight: set.weight,
            reps: set.reps,
            effort: set.rpe,
        }
    }
}

/// Estimated one-rep-max for a single performance.
///
/// Uses Epley, `weight × (1 + reps / 30)`, unless an effort rating is present, in which
/// case the load is scaled by the chart fraction for those reps and reps-in-reserve.
pub fn estimate_one_rep_max(performance: &Performance) -> f64 {
    let weight = performance.weight;
    if weight <= 0.0 {
        return 0.0;
    }

    let reps = performance.reps.max(1);
    let epley = weight * (1.0 + f64::from(reps) / 30.0);

    match performance.effort {
        Some(effort) => {
            let pct = intensity_fraction(reps, rir_from_effort(effort));
            if pct > 0.20 && pct < 1.20 {
                weight / pct
            } else {
                epley
            }
        }
        None => epley,
    }
}
