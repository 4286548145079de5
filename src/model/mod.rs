//! Predictor
//!
//! The model state machine and the tiered scoring chain: sequence model,
//! fallback regressor, rule-based path. Training rebuilds the state
//! wholesale; persistence keeps three named artifacts under one directory.

pub mod lstm;
pub mod predict;
pub mod regressor;
pub mod rules;
pub mod scaler;
pub mod state;
pub mod storage;
pub mod train;


pub use lstm::SequenceModel;
pub use predict::{score, ScoreOutcome, StrategySkip};
pub use regressor::FallbackRegressor;
pub use rules::rule_based_prediction;
pub use scaler::MinMaxScaler;
pub use state::{ModelAvailability, ModelState};
pub use storage::{default_artifact_dir, load_state, save_state, ArtifactError};
pub use train::{train, TrainError, TrainingSample, TrainingSummary};
