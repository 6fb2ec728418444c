use std::cmp::Ordering;

use crate::clients::models::common::SetRecord;
use crate::services::estimator::Performance;

const WORKING_EFFORT_MIN: f64 = 7.0;
const WORKING_EFFORT_MAX: f64 = 9.0;

fn is_working_set(set: &SetRecord) -> bool {
    set.rpe
        .is_some_and(|effort| (WORKING_EFFORT_MIN..=WORKING_EFFORT_MAX).contains(&effort))
}

fn by_weight(a: &SetRecord, b: &SetRecord) -> Ordering {
    a.weight.total_cmp(&b.weight)
}

/// Picks the set that best represents what the lifter did last time.
///
/// Rated working sets (effort 7-9) win when there are any: heaviest first, then most
/// recent. Otherwise every set is considered: heaviest first, then most reps.
pub fn select_baseline(sets: &[SetRecord]) -> Option<Performance> {
    let working: Vec<&SetRecord> = sets.iter().filter(|set| is_working_set(set)).collect();

    let chosen = if working.is_empty() {
        sets.iter()
            .max_by(|a, b| by_weight(a, b).then_with(|| a.reps.cmp(&b.reps)))
    } else {
        working.into_iter().max_by(|a, b| {
            by_weight(a, b).then_with(|| a.timestamp_utc.cmp(&b.timestamp_utc))
        })
    };

    chosen.map(Performance::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn set(set_number: u32, weight: f64, reps: u32, rpe: Option<f64>) -> SetRecord {
        let start = Utc.with_ymd_and_hms(2026, 10, 12, 17, 0, 0).unwrap();
        SetRecord {
            id: i64::from(set_number),
            session_id: 4,
            exercise_id: 2,
            set_number,
            reps,
            weight,
            rpe,
            timestamp_utc: start + Duration::minutes(i64::from(set_number) * 3),
        }
    }

    #[test]
    fn test_empty_history_has_no_baseline() {
        assert_eq!(select_baseline(&[]), None);
    }

    #[test]
    fn test_working_sets_beat_heavier_unrated_sets() {
        let sets = [
            set(1, 40.0, 10, Some(5.0)),
            set(2, 60.0, 8, Some(8.0)),
            set(3, 70.0, 3, Some(9.5)),
            set(4, 80.0, 1, None),
        ];
        let baseline = select_baseline(&sets).unwrap();
        assert_eq!((baseline.weight, baseline.reps), (60.0, 8));
        assert_eq!(baseline.effort, Some(8.0));
    }

    #[test]
    fn test_working_tie_goes_to_most_recent() {
        let sets = [
            set(1, 60.0, 10, Some(7.0)),
            set(2, 60.0, 8, Some(8.5)),
            set(3, 57.5, 9, Some(9.0)),
        ];
        let baseline = select_baseline(&sets).unwrap();
        assert_eq!(baseline.reps, 8);
        assert_eq!(baseline.effort, Some(8.5));
    }

    #[test]
    fn test_unrated_tie_goes_to_more_reps() {
        let sets = [
            set(1, 50.0, 12, None),
            set(2, 50.0, 10, None),
            set(3, 45.0, 15, Some(6.0)),
        ];
        let baseline = select_baseline(&sets).unwrap();
        assert_eq!((baseline.weight, baseline.reps), (50.0, 12));
    }

    #[test]
    fn test_effort_band_is_inclusive() {
        let sets = [set(1, 30.0, 10, Some(9.0)), set(2, 35.0, 8, Some(9.1))];
        assert_eq!(select_baseline(&sets).unwrap().weight, 30.0);
    }
}
