use regex::Regex;
use std::sync::LazyLock;

static TYPED_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:[.,]\d+)?)\s*(?:kgs?|lbs?)?\s*$").expect("valid weight pattern")
});

/// Reads the weight the lifter typed into the form.
///
/// Accepts a plain number with `.` or `,` as decimal separator and an optional unit
/// suffix, which is ignored. Anything that isn't a positive finite number is `None`.
pub fn parse_typed_weight(text: &str) -> Option<f64> {
    let captures = TYPED_WEIGHT.captures(text)?;
    let number = captures.get(1)?.as_str().replace(',', ".");

    number
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite() && *weight > 0.0)
}
