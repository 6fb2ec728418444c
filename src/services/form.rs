use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::clients::models::common::ExerciseId;
use crate::services::goals::TrainingGoal;
use crate::services::output_formatter::{format_recommendation, format_weight};
use crate::services::progressive_overload::{Recommendation, RecommendationSource};

/// The set-entry form the lifter fills in; suggestions are written straight into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetForm {
    pub exercise_id: Option<ExerciseId>,
    /// Goal the exercise was selected with; background refreshes reuse it.
    pub goal: Option<TrainingGoal>,
    pub weight_text: String,
    pub reps: Option<u32>,
    pub suggestion: Option<String>,
    pub source: Option<RecommendationSource>,
}

impl SetForm {
    pub fn apply(&mut self, recommendation: &Recommendation) {
        self.weight_text = format_weight(recommendation.weight);
        self.reps = Some(recommendation.reps);
        self.suggestion = Some(format_recommendation(recommendation));
        self.source = Some(recommendation.source);
    }
}

/// Token handed out for one exercise selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionToken(u64);

/// Tracks which selection is current so slow computations can't overwrite newer ones.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    generation: Arc<AtomicU64>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new selection, invalidating every token handed out before.
    pub fn begin(&self) -> SelectionToken {
        SelectionToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> SelectionToken {
        SelectionToken(self.generation.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: SelectionToken) -> bool {
        self.current() == token
    }
}
