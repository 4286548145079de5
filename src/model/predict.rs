//! Tiered scoring chain
//!
//! Strategies are tried in a fixed order and decline with a typed reason:
//! sequence model first, fallback regressor second.
//! When every tier declines the caller regenerates the result through the
//! rule-based path. The formatter always receives a probability, never an
//! error.

use crate::constants::{DEFAULT_FAILURE_PROBABILITY, SEQUENCE_LENGTH};
use crate::features::builder::sequence_windows;
use crate::features::FeatureMatrix;
use crate::report::Algorithm;
use super::state::ModelState;

/// Why a scoring tier declined to produce a probability
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategySkip {
    #[error("sequence model not loaded")]
    ModelUnavailable,
    #[error("feature scaler has not been fitted")]
    ScalerUnfit,
    #[error("window too short: {rows} rows, need {need}")]
    ShortWindow { rows: usize, need: usize },
    #[error("fallback regressor has not been fitted")]
    RegressorUnfit,
    #[error("model produced a non-finite output")]
    NonFiniteOutput,
    #[error("feature matrix is empty")]
    EmptyFeatures,
}

/// Outcome of running the chain
#[derive(Debug, Clone)]
pub enum ScoreOutcome {
    Scored {
        probability: f32,
        algorithm: Algorithm,
    },
    /// Every tier declined; the rule-based path takes over
    Exhausted { skips: Vec<StrategySkip> },
}

/// Run the scoring tiers in order over an asset's feature matrix.
pub fn score(state: &ModelState, matrix: &FeatureMatrix) -> ScoreOutcome {
    let mut skips = Vec::new();

    match sequence_probability(state, matrix) {
        Ok(probability) => {
            return ScoreOutcome::Scored {
                probability: probability.clamp(0.0, 1.0),
                algorithm: Algorithm::Lstm,
            }
        }
        Err(skip) => {
            log::debug!("sequence tier declined: {skip}");
            skips.push(skip);
        }
    }

    match regressor_probability(state, matrix) {
        Ok(probability) => {
            return ScoreOutcome::Scored {
                probability: probability.clamp(0.0, 1.0),
                algorithm: Algorithm::Fallback,
            }
        }
        Err(skip) => {
            log::debug!("regressor tier declined: {skip}");
            skips.push(skip);
        }
    }

    ScoreOutcome::Exhausted { skips }
}

/// Tier 1: scaled window through the sequence model.
fn sequence_probability(state: &ModelState, matrix: &FeatureMatrix) -> Result<f32, StrategySkip> {
    let model = state
        .sequence_model
        .as_ref()
        .ok_or(StrategySkip::ModelUnavailable)?;

    if !state.scaler.is_fitted() {
        return Err(StrategySkip::ScalerUnfit);
    }
    if matrix.len() < SEQUENCE_LENGTH {
        return Err(StrategySkip::ShortWindow {
            rows: matrix.len(),
            need: SEQUENCE_LENGTH,
        });
    }

    let scaled = state.scaler.transform_matrix(matrix);
    let windows = sequence_windows(&scaled);
    let last = windows.last().ok_or(StrategySkip::EmptyFeatures)?;

    let probability = model.forward(last);
    if !probability.is_finite() {
        return Err(StrategySkip::NonFiniteOutput);
    }
    Ok(probability)
}

/// Tier 2: fallback regressor over the most recent row.
///
/// An unfit regressor declines; a fitted one that emits garbage returns the
/// constant default instead.
fn regressor_probability(state: &ModelState, matrix: &FeatureMatrix) -> Result<f32, StrategySkip> {
    let last = matrix.last_row().ok_or(StrategySkip::EmptyFeatures)?;

    let probability = state
        .regressor
        .predict(&last.as_array())
        .ok_or(StrategySkip::RegressorUnfit)?;

    if !probability.is_finite() {
        return Ok(DEFAULT_FAILURE_PROBABILITY);
    }
    Ok(probability)
}

// ============================================================================
// TESTS
// ============================================================================
