//! Predictive-maintenance scoring core for infrastructure assets.
//!
//! Given recent sensor telemetry and asset metadata, the engine estimates a
//! failure probability, a risk tier and a recommended maintenance action.
//! Scoring walks three tiers: a sequence model over a 24-hour feature
//! window, a fallback regressor over the latest row, and an age-only
//! rule-based path that cannot fail. Whatever the input and model state,
//! [`PredictionEngine::predict`] always returns a result, tagged with the
//! tier that produced it.
//!
//! The HTTP adapter lives elsewhere; this crate is the core it calls into.
//!
//! ```no_run
//! use infra_maintenance_core::{AssetType, PredictionEngine, PredictionRequest};
//!
//! let engine = PredictionEngine::new();
//! engine.load();
//!
//! let result = engine.predict(&PredictionRequest {
//!     asset_id: "BR-1044".to_string(),
//!     asset_type: AssetType::Bridge,
//!     sensor_data: vec![],
//!     installation_date: Some("2013-05-01".to_string()),
//!     last_maintenance: Some("2023-11-15".to_string()),
//! });
//!
//! println!("{}: {} ({})", result.asset_id, result.risk_level, result.algorithm);
//! ```

pub mod asset;
pub mod constants;
pub mod engine;
pub mod features;
pub mod model;
pub mod report;
pub mod sensor;

pub use asset::{AssetContext, AssetType};
pub use engine::{ModelInfo, PredictionEngine, PredictionRequest};
pub use model::{
    ModelAvailability, ModelState, TrainError, TrainingSample, TrainingSummary,
};
pub use report::{Algorithm, PredictionResult, RiskLevel};
pub use sensor::{AnomalyFlag, AnomalySeverity, RawSensorReading, SensorKind, SensorRecord};
