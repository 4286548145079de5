//! Artifact persistence
//!
//! Three named artifacts under one directory: sequence-model weights,
//! fallback-regressor parameters, scaler parameters. Every artifact embeds
//! the feature layout version and hash; load refuses artifacts produced
//! under a different layout. A missing or corrupt artifact is a valid state,
//! not an error - the corresponding piece simply stays absent/default.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::{MODEL_DIR_ENV, SERVICE_NAME};
use crate::features::{layout_hash, validate_layout, LayoutMismatchError, FEATURE_VERSION};
use super::lstm::SequenceModel;
use super::regressor::FallbackRegressor;
use super::scaler::MinMaxScaler;
use super::state::ModelState;

pub const SEQUENCE_MODEL_FILE: &str = "sequence_model.json";
pub const FALLBACK_REGRESSOR_FILE: &str = "fallback_regressor.json";
pub const SCALER_FILE: &str = "scaler.json";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),
}

// ============================================================================
// ARTIFACT WRAPPER
// ============================================================================

/// Envelope written around every persisted payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Artifact<T> {
    feature_version: u8,
    layout_hash: u32,
    model_version: String,
    saved_at: DateTime<Utc>,
    payload: T,
}

/// Default artifact directory, honoring the environment override.
pub fn default_artifact_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SERVICE_NAME)
        .join("models")
}

fn save_artifact<T: Serialize>(
    dir: &Path,
    file: &str,
    model_version: &str,
    saved_at: DateTime<Utc>,
    payload: &T,
) -> Result<(), ArtifactError> {
    fs::create_dir_all(dir)?;

    let artifact = Artifact {
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        model_version: model_version.to_string(),
        saved_at,
        payload,
    };

    let json = serde_json::to_vec_pretty(&artifact)?;
    fs::write(dir.join(file), json)?;
    Ok(())
}

fn load_artifact<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Artifact<T>, ArtifactError> {
    let path = dir.join(file);
    if !path.exists() {
        return Err(ArtifactError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("artifact not found: {}", path.display()),
        )));
    }

    let data = fs::read(&path)?;
    let artifact: Artifact<T> = serde_json::from_slice(&data)?;
    validate_layout(artifact.feature_version, artifact.layout_hash)?;
    Ok(artifact)
}

// ============================================================================
// STATE SAVE / LOAD
// ============================================================================

/// Persist every present artifact. Partial failure is reported but the
/// remaining artifacts are still written.
pub fn save_state(state: &ModelState, dir: &Path) -> Result<(), ArtifactError> {
    let saved_at = state.last_trained.unwrap_or_else(Utc::now);
    let mut first_error = None;

    if let Some(model) = &state.sequence_model {
        if let Err(e) = save_artifact(dir, SEQUENCE_MODEL_FILE, &state.model_version, saved_at, model)
        {
            log::error!("failed to save sequence model: {e}");
            first_error.get_or_insert(e);
        }
    }
    if let Err(e) = save_artifact(
        dir,
        FALLBACK_REGRESSOR_FILE,
        &state.model_version,
        saved_at,
        &state.regressor,
    ) {
        log::error!("failed to save fallback regressor: {e}");
        first_error.get_or_insert(e);
    }
    if let Err(e) = save_artifact(dir, SCALER_FILE, &state.model_version, saved_at, &state.scaler) {
        log::error!("failed to save scaler: {e}");
        first_error.get_or_insert(e);
    }

    match first_error {
        None => {
            log::info!("model artifacts saved to {}", dir.display());
            Ok(())
        }
        Some(e) => Err(e),
    }
}

/// Restore whatever artifacts exist under `dir` into `state`.
///
/// Each artifact loads independently; a missing or invalid one leaves the
/// corresponding piece of state untouched.
pub fn load_state(state: &mut ModelState, dir: &Path) {
    match load_artifact::<SequenceModel>(dir, SEQUENCE_MODEL_FILE) {
        Ok(artifact) => {
            state.sequence_model = Some(artifact.payload);
            state.last_trained = Some(artifact.saved_at);
            log::info!("sequence model loaded (saved {})", artifact.saved_at);
        }
        Err(e) => log::warn!("sequence model not loaded: {e}"),
    }

    match load_artifact::<FallbackRegressor>(dir, FALLBACK_REGRESSOR_FILE) {
        Ok(artifact) => {
            if state.last_trained.is_none() {
                state.last_trained = Some(artifact.saved_at);
            }
            state.regressor = artifact.payload;
            log::info!("fallback regressor loaded");
        }
        Err(e) => log::warn!("fallback regressor not loaded: {e}"),
    }

    match load_artifact::<MinMaxScaler>(dir, SCALER_FILE) {
        Ok(artifact) => {
            state.scaler = artifact.payload;
            log::info!("scaler loaded");
        }
        Err(e) => log::warn!("scaler not loaded: {e}"),
    }
}

// ============================================================================
// TESTS
// ============================================================================
