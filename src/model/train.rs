//! Training
//!
//! `train` always rebuilds the sequence-model architecture from scratch and
//! refits the scaler and fallback regressor. When the caller supplies no
//! usable samples, a bootstrap set is derived from simulated telemetry
//! across asset types and ages, with targets taken from the aging factor and
//! the health score of the synthesized window.

use chrono::{DateTime, Duration, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::asset::{AssetContext, AssetType};
use crate::features::{build_features, FeatureRow, FEATURE_COUNT};
use crate::sensor::health::health_score;
use crate::sensor::simulate::synthesize_for_asset;
use super::lstm::SequenceModel;
use super::state::ModelState;

/// Asset ages (months) sampled when bootstrapping a training set
const BOOTSTRAP_AGES_MONTHS: [f32; 6] = [6.0, 24.0, 48.0, 84.0, 120.0, 180.0];

// ============================================================================
// TYPES
// ============================================================================

/// One labelled training row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSample {
    pub row: FeatureRow,
    /// Observed failure indicator in [0,1]
    pub failure: f32,
}

/// Summary returned to the adapter after training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub model_version: String,
    pub training_date: DateTime<Utc>,
    pub samples_trained: usize,
}

/// Training only fails on malformed input, never on model internals
#[derive(Debug, Clone, thiserror::Error)]
pub enum TrainError {
    #[error("training sample {index} contains a non-finite value")]
    NonFiniteSample { index: usize },
    #[error("fallback regressor fit failed on the supplied samples")]
    RegressorFit,
}

// ============================================================================
// TRAINING
// ============================================================================

/// Retrain the whole model state in place.
pub fn train(state: &mut ModelState, samples: &[TrainingSample]) -> Result<TrainingSummary, TrainError> {
    for (index, sample) in samples.iter().enumerate() {
        if !sample.row.is_finite() || !sample.failure.is_finite() {
            return Err(TrainError::NonFiniteSample { index });
        }
    }

    let (inputs, targets) = if samples.is_empty() {
        log::info!("no training samples supplied - bootstrapping from simulated telemetry");
        bootstrap_training_set()
    } else {
        let mut inputs = Array2::zeros((samples.len(), FEATURE_COUNT));
        let mut targets = Array1::zeros(samples.len());
        for (i, sample) in samples.iter().enumerate() {
            let values = sample.row.as_array();
            for (j, &v) in values.iter().enumerate() {
                inputs[[i, j]] = v;
            }
            targets[i] = sample.failure.clamp(0.0, 1.0);
        }
        (inputs, targets)
    };

    let mut rng = rand::thread_rng();
    state.sequence_model = Some(SequenceModel::new(&mut rng));
    state.scaler.fit(&inputs);
    if !state.regressor.fit(&inputs, &targets) {
        return Err(TrainError::RegressorFit);
    }

    let now = Utc::now();
    state.last_trained = Some(now);

    log::info!(
        "model trained: version {} on {} rows",
        state.model_version,
        inputs.nrows()
    );

    Ok(TrainingSummary {
        model_version: state.model_version.clone(),
        training_date: now,
        samples_trained: samples.len(),
    })
}

/// Derive a training set from simulated telemetry.
///
/// For every asset type and a spread of ages, synthesize a 24-hour window,
/// build its feature rows, and label them with a degradation target mixing
/// the aging factor and the inverse health score of the window.
fn bootstrap_training_set() -> (Array2<f32>, Array1<f32>) {
    let now = Utc::now();
    let types = [
        AssetType::Bridge,
        AssetType::Road,
        AssetType::Building,
        AssetType::Tunnel,
    ];

    let mut rows: Vec<[f32; FEATURE_COUNT]> = Vec::new();
    let mut targets: Vec<f32> = Vec::new();

    for asset_type in types {
        for age_months in BOOTSTRAP_AGES_MONTHS {
            let records = synthesize_for_asset(asset_type, age_months);
            let health = health_score(&records, asset_type);
            let aging = (age_months / 120.0).clamp(0.0, 1.0);
            let target = (0.5 * aging + 0.5 * (1.0 - health)).clamp(0.0, 1.0);

            let mut ctx = AssetContext::new("bootstrap", asset_type);
            ctx.installation_date = Some(now - Duration::days((age_months * 30.0) as i64));
            ctx.last_maintenance = Some(now - Duration::days((age_months * 15.0) as i64));

            let matrix = build_features(&records, &ctx, now);
            for row in matrix.rows() {
                rows.push(row.as_array());
                targets.push(target);
            }
        }
    }

    let mut inputs = Array2::zeros((rows.len(), FEATURE_COUNT));
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            inputs[[i, j]] = v;
        }
    }

    (inputs, Array1::from_vec(targets))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::state::ModelAvailability;

    fn sample(age_months: f32, failure: f32) -> TrainingSample {
        TrainingSample {
            row: FeatureRow {
                temperature: 20.0,
                vibration: 12.0,
                pressure: 101.3,
                humidity: 60.0,
                strain: 55.0,
                asset_age_months: age_months,
                months_since_maintenance: age_months / 2.0,
                asset_type_encoded: 1.0,
            },
            failure,
        }
    }

    #[test]
    fn test_train_reaches_ready() {
        let mut state = ModelState::default();
        let samples: Vec<TrainingSample> = (0..40)
            .map(|i| sample(i as f32 * 5.0, i as f32 / 40.0))
            .collect();

        let summary = train(&mut state, &samples).unwrap();
        assert_eq!(state.availability(), ModelAvailability::Ready);
        assert_eq!(summary.samples_trained, 40);
        assert!(state.last_trained.is_some());
        assert!(state.scaler.is_fitted());
    }

    #[test]
    fn test_train_without_samples_bootstraps() {
        let mut state = ModelState::default();
        let summary = train(&mut state, &[]).unwrap();

        assert_eq!(state.availability(), ModelAvailability::Ready);
        assert_eq!(summary.samples_trained, 0);
    }

    #[test]
    fn test_retrain_replaces_sequence_model() {
        let mut state = ModelState::default();
        train(&mut state, &[]).unwrap();
        let first = state.last_trained;

        train(&mut state, &[]).unwrap();
        assert!(state.sequence_model.is_some());
        assert!(state.last_trained >= first);
    }

    #[test]
    fn test_non_finite_sample_is_rejected() {
        let mut state = ModelState::default();
        let bad = vec![sample(10.0, f32::NAN)];

        match train(&mut state, &bad) {
            Err(TrainError::NonFiniteSample { index }) => assert_eq!(index, 0),
            other => panic!("expected NonFiniteSample, got {other:?}"),
        }
        assert_eq!(state.availability(), ModelAvailability::Untrained);
    }

    #[test]
    fn test_bootstrap_targets_grow_with_age() {
        let (inputs, targets) = bootstrap_training_set();
        assert_eq!(inputs.nrows(), targets.len());
        assert!(inputs.nrows() >= 24 * 4 * BOOTSTRAP_AGES_MONTHS.len());

        // Compare mean target of the youngest and oldest bridge cohorts.
        let per_cohort = 24;
        let young: f32 = targets.slice(ndarray::s![0..per_cohort]).mean().unwrap();
        let oldest_start = (BOOTSTRAP_AGES_MONTHS.len() - 1) * per_cohort;
        let old: f32 = targets
            .slice(ndarray::s![oldest_start..oldest_start + per_cohort])
            .mean()
            .unwrap();
        assert!(old > young);
    }
}
