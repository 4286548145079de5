//! Statistical anomaly flags
//!
//! Batch z-score screening over the five sensor channels. This is the cheap
//! first-pass signal surfaced alongside predictions, not part of the scoring
//! chain itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{SensorKind, SensorRecord};

/// Minimum batch size before z-scores mean anything
pub const MIN_RECORDS: usize = 10;

/// Default z-score cutoff for flagging a reading
pub const DEFAULT_THRESHOLD_FACTOR: f32 = 2.5;

/// Above this z-score a flag is escalated from Medium to High
const HIGH_SEVERITY_Z: f32 = 3.0;

/// A channel whose readings barely move yields degenerate z-scores
const MIN_STD: f32 = 1e-6;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalySeverity {
    Medium,
    High,
}

impl AnomalySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalySeverity::Medium => "MEDIUM",
            AnomalySeverity::High => "HIGH",
        }
    }
}

/// One flagged reading on one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyFlag {
    pub timestamp: DateTime<Utc>,
    pub sensor: SensorKind,
    pub value: f32,
    pub z_score: f32,
    pub severity: AnomalySeverity,
}

// ============================================================================
// DETECTION
// ============================================================================

/// Flag readings whose z-score against the batch exceeds `threshold_factor`.
///
/// Returns an empty list for batches under [`MIN_RECORDS`] - too few samples
/// is not an error, just not enough signal. Channels with near-zero spread
/// are skipped.
pub fn detect_anomalies(records: &[SensorRecord], threshold_factor: f32) -> Vec<AnomalyFlag> {
    let mut anomalies = Vec::new();

    if records.len() < MIN_RECORDS {
        return anomalies;
    }

    for kind in SensorKind::ALL {
        let values: Vec<f32> = records.iter().map(|r| r.value(kind)).collect();
        let (mean, std) = mean_std(&values);

        if std < MIN_STD {
            continue;
        }

        for (index, &value) in values.iter().enumerate() {
            let z = ((value - mean) / std).abs();
            if z > threshold_factor {
                anomalies.push(AnomalyFlag {
                    timestamp: records[index].timestamp,
                    sensor: kind,
                    value,
                    z_score: z,
                    severity: if z > HIGH_SEVERITY_Z {
                        AnomalySeverity::High
                    } else {
                        AnomalySeverity::Medium
                    },
                });
            }
        }
    }

    anomalies
}

/// Population mean and standard deviation
pub(crate) fn mean_std(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    (mean, variance.sqrt())
}

// ============================================================================
// TESTS
// ============================================================================
