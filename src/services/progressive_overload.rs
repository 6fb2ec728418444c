use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::clients::models::common::{
    ExerciseClassification, ExerciseId, SessionId, SetRecord,
};
use crate::clients::workout_log::{WorkoutLog, WorkoutLogError};
use crate::services::anchors::{AnchorState, SessionAnchorStore};
use crate::services::baseline::select_baseline;
use crate::services::estimator::{Performance, estimate_one_rep_max};
use crate::services::goals::{GoalConfig, TrainingGoal};
use crate::services::input_parser::parse_typed_weight;
use crate::services::intensity::{MAX_RIR, intensity_fraction, predict_reps, rir_from_effort};
use crate::services::output_formatter::format_recommendation;
use crate::services::plates::{PLATE_STEP, enforce_min_delta, round_clear_of, round_to_plate};

/// Growth applied to last session's baseline when it was a clean working set.
const FIRST_SET_STEP_UP: f64 = 0.025;
/// Effort above which last session's baseline counts as too hard to progress from.
const GOOD_SET_MAX_EFFORT: f64 = 8.5;

const DEFAULT_WEIGHT: f64 = 20.0;
const DEFAULT_REPS: u32 = 8;

/// Weight change per rep of difference between inferred and target reps-in-reserve.
const BIAS_PER_RIR: f64 = 0.02;
/// Reps-in-reserve assumed when the anchor hit exactly the target reps without a rating.
const NEUTRAL_RIR: f64 = 2.0;
const ASSUMED_EFFORT: f64 = 8.0;
const FATIGUE_EFFORT: f64 = 9.0;

const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Progressed from last session's baseline before any set was logged today.
    FirstSet,
    /// Modelled from today's last set or the session anchor.
    SteadyState,
    /// Nothing to go on; a conservative starting load.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub weight: f64,
    pub reps: u32,
    pub source: RecommendationSource,
}

#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub exercise_id: ExerciseId,
    pub goal: TrainingGoal,
    pub typed_weight: Option<String>,
}

#[derive(Clone)]
pub struct ProgressiveOverloadService {
    workout_log: Arc<dyn WorkoutLog>,
    anchors: Arc<Mutex<SessionAnchorStore>>,
    last_recommendations: Arc<Mutex<HashMap<ExerciseId, Recommendation>>>,
}

impl ProgressiveOverloadService {
    pub fn new(workout_log: Arc<dyn WorkoutLog>) -> Self {
        Self {
            workout_log,
            anchors: Arc::new(Mutex::new(SessionAnchorStore::new())),
            last_recommendations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn anchors(&self) -> MutexGuard<'_, SessionAnchorStore> {
        self.anchors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn last_recommendations(&self) -> MutexGuard<'_, HashMap<ExerciseId, Recommendation>> {
        self.last_recommendations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.anchors().session_id()
    }

    /// Points the engine at the currently open session. Anchors from any other session are
    /// dropped. Returns whether the session changed.
    pub fn sync_session(&self, session_id: Option<SessionId>) -> bool {
        let changed = self.anchors().sync_session(session_id);
        if changed {
            self.last_recommendations().clear();
        }
        changed
    }

    /// Suggested weight and reps for the next set, or `None` when there is nothing to
    /// suggest: the goal is [`TrainingGoal::NoRecommendation`] or the workout log failed.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Option<Recommendation> {
        let config = request.goal.config()?;
        let exercise_id = request.exercise_id;

        let recommendation = match self
            .compute(exercise_id, config, request.typed_weight.as_deref())
            .await
        {
            Ok(recommendation) => recommendation,
            Err(e) => {
                tracing::warn!(error = %e, exercise_id, "recommendation.skipped");
                return None;
            }
        };

        let previous = self
            .last_recommendations()
            .insert(exercise_id, recommendation);
        let changed = previous
            .is_some_and(|p| p.weight != recommendation.weight || p.reps != recommendation.reps);
        if changed {
            debug!(exercise_id, "recommendation.changed");
        }

        tracing::info!(
            exercise_id,
            goal = %request.goal,
            source = ?recommendation.source,
            suggestion = %format_recommendation(&recommendation),
            "recommendation.computed"
        );

        Some(recommendation)
    }

    /// Picks the anchor and runs the model for one exercise.
    ///
    /// The first-set suggestion is itself anchored without an effort rating, so the call
    /// after it re-estimates from that suggestion and can land lower: a 100 x 10 @ 8
    /// baseline gives 102.5 x 9 first and 97.5 x 9 on every call after. Repeated calls
    /// from then on agree until a set is logged or the session changes.
    async fn compute(
        &self,
        exercise_id: ExerciseId,
        config: &GoalConfig,
        typed_weight: Option<&str>,
    ) -> Result<Recommendation, WorkoutLogError> {
        let session_id = self.active_session();

        let today: Vec<SetRecord> = match session_id {
            Some(session_id) => self
                .workout_log
                .session_sets(session_id)
                .await?
                .into_iter()
                .filter(|set| set.exercise_id == exercise_id)
                .collect(),
            None => Vec::new(),
        };

        let last_today = today.iter().max_by_key(|set| set.set_number);
        let mut anchor_state = self.anchors().state(exercise_id);

        // The first set actually logged this session becomes the anchor.
        if let (AnchorState::NoAnchor, Some(first)) =
            (anchor_state, today.iter().min_by_key(|set| set.set_number))
        {
            let performance = Performance::from(first);
            if self.anchor_in_session(session_id, exercise_id, performance) {
                anchor_state = AnchorState::Anchored(performance);
            }
        }

        let mut baseline = None;
        if last_today.is_none() && anchor_state == AnchorState::NoAnchor {
            let prior = self
                .workout_log
                .prior_session_sets(exercise_id, session_id)
                .await?;
            baseline = select_baseline(&prior);

            if let Some(baseline) = baseline {
                let recommendation = first_set_recommendation(&baseline, config);
                debug!(
                    exercise_id,
                    baseline_weight = baseline.weight,
                    baseline_reps = baseline.reps,
                    "recommendation.first_set"
                );
                self.anchor_in_session(
                    session_id,
                    exercise_id,
                    Performance {
                        weight: recommendation.weight,
                        reps: recommendation.reps,
                        effort: None,
                    },
                );
                return Ok(recommendation);
            }
        }

        // Today's last set, then the session anchor, then last session's baseline. The
        // baseline is used as-is and never anchored here.
        let anchor = match (last_today, anchor_state) {
            (Some(set), _) => Performance::from(set),
            (None, AnchorState::Anchored(performance)) => performance,
            (None, AnchorState::NoAnchor) => match baseline {
                Some(baseline) => baseline,
                None => {
                    debug!(exercise_id, "recommendation.no_history");
                    return Ok(default_recommendation(
                        config,
                        typed_weight.and_then(parse_typed_weight),
                    ));
                }
            },
        };

        let min_jump = match last_today {
            Some(set) => {
                let classification = self.classification(exercise_id).await;
                let min_delta = classification
                    .min_increment_override
                    .unwrap_or_else(|| config.min_delta(classification.is_compound));
                Some((set.weight, min_delta))
            }
            None => None,
        };

        Ok(steady_state_recommendation(&anchor, config, min_jump))
    }

    async fn classification(&self, exercise_id: ExerciseId) -> ExerciseClassification {
        match self.workout_log.exercise_classification(exercise_id).await {
            Ok(classification) => classification,
            Err(e) => {
                tracing::warn!(error = %e, exercise_id, "classification.lookup_failed");
                ExerciseClassification::default()
            }
        }
    }

    /// Anchors the exercise only if the session hasn't moved on while the log was queried.
    fn anchor_in_session(
        &self,
        session_id: Option<SessionId>,
        exercise_id: ExerciseId,
        performance: Performance,
    ) -> bool {
        let mut anchors = self.anchors();
        if anchors.session_id() != session_id {
            debug!(exercise_id, "anchors.stale_session");
            return false;
        }
        anchors.set(exercise_id, performance)
    }
}

/// Opening suggestion for an exercise, progressed from last session's baseline.
pub fn first_set_recommendation(baseline: &Performance, config: &GoalConfig) -> Recommendation {
    let in_range = (config.reps_low..=config.reps_high).contains(&baseline.reps);
    let not_too_hard = baseline
        .effort
        .is_none_or(|effort| effort <= GOOD_SET_MAX_EFFORT);

    let weight = if in_range && not_too_hard {
        (baseline.weight * (1.0 + FIRST_SET_STEP_UP)).max(baseline.weight + PLATE_STEP)
    } else {
        baseline.weight
    };

    Recommendation {
        weight: round_to_plate(weight),
        reps: config.clamp_reps(config.target_reps()),
        source: RecommendationSource::FirstSet,
    }
}

pub fn default_recommendation(config: &GoalConfig, typed_weight: Option<f64>) -> Recommendation {
    let weight = typed_weight
        .filter(|weight| *weight > 0.0)
        .unwrap_or(DEFAULT_WEIGHT);

    Recommendation {
        weight: round_to_plate(weight),
        reps: config.clamp_reps(config.reps_low.max(DEFAULT_REPS)),
        source: RecommendationSource::Default,
    }
}

/// Models the next set from an anchor performance.
///
/// `min_jump` carries today's last weight and the smallest change allowed away from it.
pub fn steady_state_recommendation(
    anchor: &Performance,
    config: &GoalConfig,
    min_jump: Option<(f64, f64)>,
) -> Recommendation {
    let one_rep_max = estimate_one_rep_max(anchor);
    let target_reps = config.target_reps();

    let inferred_rir = match anchor.effort {
        Some(effort) => rir_from_effort(effort),
        // Centered on 2 in reserve when the anchor hit the target reps exactly.
        None => (NEUTRAL_RIR + f64::from(target_reps) - f64::from(anchor.reps)).clamp(0.0, MAX_RIR),
    };

    let mut raw = intensity_fraction(target_reps, config.target_rir) * one_rep_max;

    let bias = ((inferred_rir - config.target_rir) * BIAS_PER_RIR)
        .clamp(-config.max_step_down, config.max_step_up);
    raw *= 1.0 + bias;

    if anchor.effort.unwrap_or(ASSUMED_EFFORT) >= FATIGUE_EFFORT {
        raw *= 1.0 - config.fatigue_drop;
    }

    let weight = match min_jump {
        Some((last_weight, min_delta)) if (raw - last_weight).abs() > WEIGHT_TOLERANCE => {
            round_clear_of(
                enforce_min_delta(raw, last_weight, min_delta),
                last_weight,
                min_delta,
            )
        }
        _ => round_to_plate(raw),
    };
    let reps = config.clamp_reps(predict_reps(one_rep_max, weight, config.target_rir));

    Recommendation {
        weight,
        reps,
        source: RecommendationSource::SteadyState,
    }
}
