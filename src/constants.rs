//! Central configuration constants
//!
//! Single source of truth for the scoring defaults. To change the model
//! version or the input window, only edit this file.

/// Model version reported in every prediction result
pub const MODEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name, used for the artifact storage directory
pub const SERVICE_NAME: &str = "infra-maintenance";

/// Number of hourly records the sequence model consumes per window
pub const SEQUENCE_LENGTH: usize = 24;

/// Probability returned when a fitted fallback regressor produces garbage
pub const DEFAULT_FAILURE_PROBABILITY: f32 = 0.3;

/// Environment override for the artifact storage directory
pub const MODEL_DIR_ENV: &str = "MAINTENANCE_MODEL_DIR";
