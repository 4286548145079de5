//! Prediction engine
//!
//! The adapter-facing surface. Owns the model state behind a single-writer/
//! many-reader guard: `predict` takes a read lock, `train` and `load` take
//! the write lock, so a retrain cannot race concurrent predictions.
//!
//! `predict` never fails. Input defects are repaired during preprocessing,
//! model unavailability walks down the scoring tiers, and a malformed date
//! drops the request straight onto the rule-based path.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::asset::{parse_iso_date, AssetContext, AssetType};
use crate::constants::MODEL_VERSION;
use crate::features::{build_features, FEATURE_LAYOUT};
use crate::model::{
    self, rule_based_prediction, ModelAvailability, ModelState, ScoreOutcome, TrainError,
    TrainingSample, TrainingSummary,
};
use crate::report::{format_result, Algorithm, PredictionResult};
use crate::sensor::{preprocess_batch, simulate, RawSensorReading, SensorRecord};

// ============================================================================
// REQUEST / INFO TYPES
// ============================================================================

/// One scoring request as the adapter hands it over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub asset_id: String,
    pub asset_type: AssetType,
    #[serde(default)]
    pub sensor_data: Vec<RawSensorReading>,
    #[serde(default)]
    pub installation_date: Option<String>,
    #[serde(default)]
    pub last_maintenance: Option<String>,
}

/// Model status snapshot for the adapter's info endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_version: String,
    pub availability: ModelAvailability,
    pub last_trained: Option<DateTime<Utc>>,
    pub feature_names: Vec<String>,
    pub performance_metrics: HashMap<String, f32>,
    pub predictions_total: u64,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct PredictionEngine {
    state: RwLock<ModelState>,
    artifact_dir: PathBuf,
    predictions_total: AtomicU64,
    lstm_served: AtomicU64,
    fallback_served: AtomicU64,
    rule_based_served: AtomicU64,
}

impl PredictionEngine {
    /// Engine with the default artifact directory.
    pub fn new() -> Self {
        Self::with_artifact_dir(model::default_artifact_dir())
    }

    pub fn with_artifact_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            state: RwLock::new(ModelState::default()),
            artifact_dir: dir.into(),
            predictions_total: AtomicU64::new(0),
            lstm_served: AtomicU64::new(0),
            fallback_served: AtomicU64::new(0),
            rule_based_served: AtomicU64::new(0),
        }
    }

    /// Score one asset. Always returns a result; the `algorithm` field says
    /// which tier produced it.
    pub fn predict(&self, request: &PredictionRequest) -> PredictionResult {
        let now = Utc::now();
        self.predictions_total.fetch_add(1, Ordering::Relaxed);

        let installation = parse_optional_date(request.installation_date.as_deref());
        let maintenance = parse_optional_date(request.last_maintenance.as_deref());

        let (installation, maintenance) = match (installation, maintenance) {
            (Ok(i), Ok(m)) => (i, m),
            (installation, _) => {
                log::warn!(
                    "asset {}: malformed date in request - using rule-based path",
                    request.asset_id
                );
                let result = rule_based_prediction(
                    &request.asset_id,
                    installation.ok().flatten(),
                    MODEL_VERSION,
                    now,
                );
                self.record_algorithm(result.algorithm);
                return result;
            }
        };

        let mut ctx = AssetContext::new(request.asset_id.clone(), request.asset_type);
        ctx.installation_date = installation;
        ctx.last_maintenance = maintenance;

        let records = preprocess_batch(&request.sensor_data);
        let matrix = build_features(&records, &ctx, now);

        let state = self.state.read();
        let result = match model::score(&state, &matrix) {
            ScoreOutcome::Scored {
                probability,
                algorithm,
            } => format_result(
                &request.asset_id,
                probability,
                algorithm,
                &state.model_version,
                now,
            ),
            ScoreOutcome::Exhausted { skips } => {
                log::info!(
                    "asset {}: all scoring tiers declined ({} skips) - using rule-based path",
                    request.asset_id,
                    skips.len()
                );
                rule_based_prediction(&request.asset_id, installation, &state.model_version, now)
            }
        };
        drop(state);

        self.record_algorithm(result.algorithm);
        result
    }

    /// Retrain and persist. Persistence failures are logged, not raised.
    pub fn train(&self, samples: &[TrainingSample]) -> Result<TrainingSummary, TrainError> {
        let mut state = self.state.write();
        let summary = model::train(&mut state, samples)?;

        if let Err(e) = model::save_state(&state, &self.artifact_dir) {
            log::error!("saving model artifacts failed: {e}");
        }

        Ok(summary)
    }

    /// Persist the current state; failures are logged and swallowed.
    pub fn save(&self) {
        let state = self.state.read();
        if let Err(e) = model::save_state(&state, &self.artifact_dir) {
            log::error!("saving model artifacts failed: {e}");
        }
    }

    /// Restore whatever artifacts exist; failures are logged and swallowed.
    pub fn load(&self) {
        let mut state = self.state.write();
        model::load_state(&mut state, &self.artifact_dir);
        log::info!("model state after load: {}", state.availability().as_str());
    }

    /// Generate simulated telemetry for an asset type.
    pub fn simulate(&self, asset_type: AssetType, duration_hours: u32) -> Vec<SensorRecord> {
        simulate(asset_type, duration_hours)
    }

    pub fn model_info(&self) -> ModelInfo {
        let state = self.state.read();
        ModelInfo {
            model_version: state.model_version.clone(),
            availability: state.availability(),
            last_trained: state.last_trained,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            performance_metrics: state.performance_metrics.clone(),
            predictions_total: self.predictions_total.load(Ordering::Relaxed),
        }
    }

    /// Predictions served per scoring tier: (sequence, fallback, rule-based)
    pub fn served_by_tier(&self) -> (u64, u64, u64) {
        (
            self.lstm_served.load(Ordering::Relaxed),
            self.fallback_served.load(Ordering::Relaxed),
            self.rule_based_served.load(Ordering::Relaxed),
        )
    }

    fn record_algorithm(&self, algorithm: Algorithm) {
        let counter = match algorithm {
            Algorithm::Lstm => &self.lstm_served,
            Algorithm::Fallback => &self.fallback_served,
            Algorithm::RuleBased => &self.rule_based_served,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_optional_date(
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, crate::asset::InvalidDate> {
    match value {
        None => Ok(None),
        Some(s) => parse_iso_date(s).map(Some),
    }
}
