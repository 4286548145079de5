//! Risk tiers and result formatting
//!
//! Pure mapping from a failure probability to the discretized result the
//! adapter serializes: risk tier, failure horizon, confidence, recommended
//! action. No side effects here.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// RISK LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn severity_rank(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }

    pub fn recommended_action(&self) -> &'static str {
        match self {
            RiskLevel::Critical => {
                "Immediate maintenance required. Schedule emergency inspection."
            }
            RiskLevel::High => {
                "Schedule maintenance within 30 days. Increase monitoring frequency."
            }
            RiskLevel::Medium => {
                "Schedule maintenance within 90 days. Continue regular monitoring."
            }
            RiskLevel::Low => "Continue regular maintenance schedule. Monitor for changes.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ALGORITHM TAG
// ============================================================================

/// Which scoring tier produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "LSTM")]
    Lstm,
    #[serde(rename = "Fallback")]
    Fallback,
    #[serde(rename = "Rule-based")]
    RuleBased,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Lstm => "LSTM",
            Algorithm::Fallback => "Fallback",
            Algorithm::RuleBased => "Rule-based",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PREDICTION RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub asset_id: String,
    pub prediction_date: DateTime<Utc>,
    pub predicted_failure_date: DateTime<Utc>,
    pub failure_probability: f32,
    pub risk_level: RiskLevel,
    pub confidence_score: f32,
    pub recommended_action: String,
    pub model_version: String,
    pub algorithm: Algorithm,
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Map a failure probability onto (tier, horizon days, confidence)
fn tier_for(probability: f32) -> (RiskLevel, i64, f32) {
    if probability > 0.8 {
        (RiskLevel::Critical, 30, 0.9)
    } else if probability > 0.6 {
        (RiskLevel::High, 90, 0.8)
    } else if probability > 0.4 {
        (RiskLevel::Medium, 180, 0.7)
    } else {
        (RiskLevel::Low, 365, 0.6)
    }
}

/// Build the final result from a model probability.
///
/// The probability is clamped to [0,1] no matter what the model emitted.
pub fn format_result(
    asset_id: &str,
    probability: f32,
    algorithm: Algorithm,
    model_version: &str,
    now: DateTime<Utc>,
) -> PredictionResult {
    let probability = if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (risk_level, horizon_days, confidence) = tier_for(probability);

    PredictionResult {
        asset_id: asset_id.to_string(),
        prediction_date: now,
        predicted_failure_date: now + Duration::days(horizon_days),
        failure_probability: probability,
        risk_level,
        confidence_score: confidence,
        recommended_action: risk_level.recommended_action().to_string(),
        model_version: model_version.to_string(),
        algorithm,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn result_for(p: f32) -> PredictionResult {
        format_result("A-1", p, Algorithm::Lstm, "1.0.0", Utc::now())
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(result_for(0.95).risk_level, RiskLevel::Critical);
        assert_eq!(result_for(0.7).risk_level, RiskLevel::High);
        assert_eq!(result_for(0.5).risk_level, RiskLevel::Medium);
        assert_eq!(result_for(0.1).risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Boundary values land in the lower tier.
        assert_eq!(result_for(0.8).risk_level, RiskLevel::High);
        assert_eq!(result_for(0.6).risk_level, RiskLevel::Medium);
        assert_eq!(result_for(0.4).risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_horizon_and_confidence_per_tier() {
        let now = Utc::now();
        let critical = format_result("A", 0.9, Algorithm::Lstm, "1.0.0", now);
        assert_eq!((critical.predicted_failure_date - now).num_days(), 30);
        assert_eq!(critical.confidence_score, 0.9);

        let low = format_result("A", 0.2, Algorithm::Lstm, "1.0.0", now);
        assert_eq!((low.predicted_failure_date - now).num_days(), 365);
        assert_eq!(low.confidence_score, 0.6);
    }

    #[test]
    fn test_probability_is_clamped() {
        assert_eq!(result_for(1.7).failure_probability, 1.0);
        assert_eq!(result_for(-0.4).failure_probability, 0.0);
        assert_eq!(result_for(f32::NAN).failure_probability, 0.0);
    }

    #[test]
    fn test_actions_follow_tier() {
        assert!(result_for(0.9).recommended_action.contains("emergency"));
        assert!(result_for(0.7).recommended_action.contains("30 days"));
        assert!(result_for(0.5).recommended_action.contains("90 days"));
        assert!(result_for(0.1).recommended_action.contains("regular"));
    }

    #[test]
    fn test_wire_tags() {
        assert_eq!(
            serde_json::to_string(&Algorithm::RuleBased).unwrap(),
            "\"Rule-based\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
    }
}
