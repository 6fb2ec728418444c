use crate::services::progressive_overload::Recommendation;

pub fn format_weight(weight: f64) -> String {
    if weight.fract().abs() < f64::EPSILON {
        format!("{:.0}", weight)
    } else {
        format!("{:.1}", weight)
    }
}

/// Compact "weight x reps" line shown next to the form and written to the logs.
pub fn format_recommendation(recommendation: &Recommendation) -> String {
    format!(
        "{} x {}",
        format_weight(recommendation.weight),
        recommendation.reps
    )
}
