/// Smallest practical weight increment, in mass units.
pub const PLATE_STEP: f64 = 2.5;

const TOLERANCE: f64 = 1e-9;

/// Rounds to the nearest multiple of `step`, ties away from zero.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

pub fn round_to_plate(value: f64) -> f64 {
    round_to_step(value, PLATE_STEP)
}

/// Pushes `raw` at least `min_delta` away from `last` when it differs from it at all,
/// keeping the direction of the change.
pub fn enforce_min_delta(raw: f64, last: f64, min_delta: f64) -> f64 {
    if raw == last {
        return raw;
    }

    let delta = raw - last;
    if delta.abs() >= min_delta {
        return raw;
    }

    let direction = if delta >= 0.0 { 1.0 } else { -1.0 };
    last + direction * min_delta
}

/// Rounds a weight that must stay at least `min_delta` away from `last` to a plate.
/// When the nearest plate falls back inside that band, rounds away from `last` instead.
pub fn round_clear_of(value: f64, last: f64, min_delta: f64) -> f64 {
    let nearest = round_to_plate(value);
    if (nearest - last).abs() >= min_delta - TOLERANCE {
        return nearest;
    }

    let steps = value / PLATE_STEP;
    if value > last {
        steps.ceil() * PLATE_STEP
    } else {
        steps.floor() * PLATE_STEP
    }
}
