//! Percent-of-1RM chart keyed by reps and reps-in-reserve.

pub const MIN_REPS: u32 = 1;
pub const MAX_REPS: u32 = 20;
pub const MAX_RIR: f64 = 5.0;

const RIR_PENALTY: f64 = 0.025;
const MIN_FRACTION: f64 = 0.30;
const MAX_FRACTION: f64 = 1.10;

/// Rep counts scanned by [`predict_reps`]. Singles and doubles are never suggested.
const PREDICTION_RANGE: std::ops::RangeInclusive<u32> = 3..=20;

/// Fraction of 1RM liftable for `reps` at failure. Reps missing from the chart
/// are interpolated between their neighbours, so 18 and 19 sit at roughly 0.577 and
/// 0.563 rather than flat at 0.55. A flat tail would let `predict_reps` miss the rep
/// count a weight was derived from by more than one.
const BREAKPOINTS: &[(u32, f64)] = &[
    (1, 1.00),
    (2, 0.955),
    (3, 0.925),
    (4, 0.895),
    (5, 0.865),
    (6, 0.84),
    (7, 0.815),
    (8, 0.79),
    (9, 0.765),
    (10, 0.74),
    (11, 0.715),
    (12, 0.69),
    (13, 0.665),
    (14, 0.645),
    (15, 0.625),
    (17, 0.59),
    (20, 0.55),
];

fn base_fraction(reps: u32) -> f64 {
    let reps = reps.clamp(MIN_REPS, MAX_REPS);

    for pair in BREAKPOINTS.windows(2) {
        let (lo_reps, lo_fraction) = pair[0];
        let (hi_reps, hi_fraction) = pair[1];

        if reps == lo_reps {
            return lo_fraction;
        }
        if reps < hi_reps {
            let t = f64::from(reps - lo_reps) / f64::from(hi_reps - lo_reps);
            return lo_fraction + (hi_fraction - lo_fraction) * t;
        }
    }

    BREAKPOINTS[BREAKPOINTS.len() - 1].1
}

/// Converts effort on the 0-10 scale into reps in reserve.
pub fn rir_from_effort(effort: f64) -> f64 {
    (10.0 - effort).clamp(0.0, MAX_RIR)
}

/// Fraction of one-rep-max that can be lifted for `reps` leaving `rir` reps in reserve.
///
/// Reps are clamped to 1..=20 and rir to 0..=5; each rep in reserve costs 2.5% of the
/// failure load. The result always lies within [0.30, 1.10].
pub fn intensity_fraction(reps: u32, rir: f64) -> f64 {
    let rir = rir.clamp(0.0, MAX_RIR);
    (base_fraction(reps) * (1.0 - RIR_PENALTY * rir)).clamp(MIN_FRACTION, MAX_FRACTION)
}

/// Rep count whose predicted load best matches `weight`.
///
/// Ties resolve to the lowest rep count.
pub fn predict_reps(one_rep_max: f64, weight: f64, rir: f64) -> u32 {
    let mut best_reps = *PREDICTION_RANGE.start();
    let mut best_error = f64::INFINITY;

    for reps in PREDICTION_RANGE {
        let predicted = intensity_fraction(reps, rir) * one_rep_max;
        let error = (predicted - weight).abs();
        if error < best_error {
            best_error = error;
            best_reps = reps;
        }
    }

    best_reps
}
