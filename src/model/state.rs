//! Model state
//!
//! The full mutable state of the predictor, owned by the engine and passed
//! explicitly - there is no process-wide singleton. `train`/`load` rewrite
//! it wholesale, `predict` only reads it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MODEL_VERSION;
use super::lstm::SequenceModel;
use super::regressor::FallbackRegressor;
use super::scaler::MinMaxScaler;

/// Which scoring tiers the current state can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelAvailability {
    /// No sequence model, regressor unfit - only the rule-based tier works
    Untrained,
    /// Regressor fit, sequence model absent
    FallbackOnly,
    /// Sequence model and regressor both present
    Ready,
}

impl ModelAvailability {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelAvailability::Untrained => "untrained",
            ModelAvailability::FallbackOnly => "fallback_only",
            ModelAvailability::Ready => "ready",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelState {
    pub sequence_model: Option<SequenceModel>,
    pub regressor: FallbackRegressor,
    pub scaler: MinMaxScaler,
    pub model_version: String,
    pub last_trained: Option<DateTime<Utc>>,
    /// Populated by a future evaluation pass; exposed but currently empty
    pub performance_metrics: HashMap<String, f32>,
}

impl Default for ModelState {
    fn default() -> Self {
        Self {
            sequence_model: None,
            regressor: FallbackRegressor::default(),
            scaler: MinMaxScaler::default(),
            model_version: MODEL_VERSION.to_string(),
            last_trained: None,
            performance_metrics: HashMap::new(),
        }
    }
}

impl ModelState {
    pub fn availability(&self) -> ModelAvailability {
        match (self.sequence_model.is_some(), self.regressor.is_fitted()) {
            (true, true) => ModelAvailability::Ready,
            (false, true) => ModelAvailability::FallbackOnly,
            _ => ModelAvailability::Untrained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fresh_state_is_untrained() {
        let state = ModelState::default();
        assert_eq!(state.availability(), ModelAvailability::Untrained);
        assert!(state.last_trained.is_none());
        assert!(state.performance_metrics.is_empty());
    }

    #[test]
    fn test_sequence_model_alone_is_not_ready() {
        let mut state = ModelState::default();
        state.sequence_model = Some(SequenceModel::new(&mut StdRng::seed_from_u64(1)));
        assert_eq!(state.availability(), ModelAvailability::Untrained);
    }
}
