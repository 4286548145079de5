//! Rule-based prediction
//!
//! The last scoring tier: no sensor data, no fitted models, just asset age.
//! This path has no failure modes, so the caller always gets a usable
//! result when every other tier declines.

use chrono::{DateTime, Duration, Utc};

use crate::report::{Algorithm, PredictionResult, RiskLevel};

/// Installation fallback when no usable date is known: three years ago
const DEFAULT_AGE_DAYS: i64 = 1095;

/// Confidence reported by this tier
const RULE_CONFIDENCE: f32 = 0.6;

/// Age-tier table: (minimum age in years, risk, probability, horizon days)
const AGE_TIERS: [(f32, RiskLevel, f32, i64); 2] = [
    (10.0, RiskLevel::High, 0.7, 60),
    (5.0, RiskLevel::Medium, 0.5, 180),
];

/// Score an asset from its age alone.
pub fn rule_based_prediction(
    asset_id: &str,
    installation_date: Option<DateTime<Utc>>,
    model_version: &str,
    now: DateTime<Utc>,
) -> PredictionResult {
    let installed = installation_date.unwrap_or_else(|| now - Duration::days(DEFAULT_AGE_DAYS));
    let age_years = (now - installed).num_days() as f32 / 365.0;

    let (risk_level, probability, horizon_days) = AGE_TIERS
        .iter()
        .find(|(min_age, ..)| age_years > *min_age)
        .map(|&(_, risk, p, days)| (risk, p, days))
        .unwrap_or((RiskLevel::Low, 0.3, 365));

    PredictionResult {
        asset_id: asset_id.to_string(),
        prediction_date: now,
        predicted_failure_date: now + Duration::days(horizon_days),
        failure_probability: probability,
        risk_level,
        confidence_score: RULE_CONFIDENCE,
        recommended_action: risk_level.recommended_action().to_string(),
        model_version: model_version.to_string(),
        algorithm: Algorithm::RuleBased,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at_age(years: i64) -> PredictionResult {
        let now = Utc::now();
        rule_based_prediction(
            "A-1",
            Some(now - Duration::days(years * 365 + 10)),
            "1.0.0",
            now,
        )
    }

    #[test]
    fn test_age_tiers() {
        let old = at_age(11);
        assert_eq!(old.risk_level, RiskLevel::High);
        assert_eq!(old.failure_probability, 0.7);
        assert_eq!(
            (old.predicted_failure_date - old.prediction_date).num_days(),
            60
        );

        let middle = at_age(7);
        assert_eq!(middle.risk_level, RiskLevel::Medium);
        assert_eq!(middle.failure_probability, 0.5);

        let young = at_age(2);
        assert_eq!(young.risk_level, RiskLevel::Low);
        assert_eq!(young.failure_probability, 0.3);
        assert_eq!(
            (young.predicted_failure_date - young.prediction_date).num_days(),
            365
        );
    }

    #[test]
    fn test_risk_is_monotonic_in_age() {
        let mut previous = 0;
        for years in [1, 4, 6, 9, 12, 20] {
            let rank = at_age(years).risk_level.severity_rank();
            assert!(rank >= previous, "risk dropped at age {years}");
            previous = rank;
        }
    }

    #[test]
    fn test_missing_date_defaults_to_three_years() {
        let result = rule_based_prediction("A-1", None, "1.0.0", Utc::now());
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.failure_probability, 0.3);
    }

    #[test]
    fn test_always_tagged_rule_based() {
        assert_eq!(at_age(11).algorithm, Algorithm::RuleBased);
        assert_eq!(at_age(1).algorithm, Algorithm::RuleBased);
        assert_eq!(at_age(11).confidence_score, 0.6);
    }
}
