//! Asset health scoring
//!
//! A coarse [0,1] score from recent telemetry: per channel, the fraction of
//! readings inside the asset-specific healthy band, minus a penalty for
//! erratic readings, averaged across channels.

use crate::asset::AssetType;
use crate::constants::SEQUENCE_LENGTH;
use super::anomaly::mean_std;
use super::types::{SensorKind, SensorRecord};

/// Score reported when there is no telemetry to judge
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Cap on the variability penalty (std/mean)
const MAX_VARIABILITY_PENALTY: f32 = 0.5;

/// Healthy operating band for one channel on one asset type
fn healthy_band(asset_type: AssetType, kind: SensorKind) -> (f32, f32) {
    use AssetType::*;
    use SensorKind::*;

    match (asset_type, kind) {
        (Bridge | Unknown, Temperature) => (15.0, 25.0),
        (Bridge | Unknown, Vibration) => (5.0, 20.0),
        (Bridge | Unknown, Humidity) => (40.0, 80.0),
        (Bridge | Unknown, Strain) => (30.0, 80.0),

        (Road, Temperature) => (20.0, 30.0),
        (Road, Vibration) => (10.0, 30.0),
        (Road, Humidity) => (30.0, 70.0),
        (Road, Strain) => (20.0, 60.0),

        (Building, Temperature) => (18.0, 26.0),
        (Building, Vibration) => (2.0, 15.0),
        (Building, Humidity) => (30.0, 70.0),
        (Building, Strain) => (10.0, 50.0),

        (Tunnel, Temperature) => (15.0, 22.0),
        (Tunnel, Vibration) => (5.0, 20.0),
        (Tunnel, Humidity) => (60.0, 95.0),
        (Tunnel, Strain) => (40.0, 100.0),

        (_, Pressure) => (100.0, 102.0),
    }
}

/// Overall health score over the most recent 24 records.
///
/// Returns [`NEUTRAL_SCORE`] when no records are supplied.
pub fn health_score(records: &[SensorRecord], asset_type: AssetType) -> f32 {
    if records.is_empty() {
        return NEUTRAL_SCORE;
    }

    let recent = &records[records.len().saturating_sub(SEQUENCE_LENGTH)..];

    let total: f32 = SensorKind::ALL
        .iter()
        .map(|&kind| {
            let values: Vec<f32> = recent.iter().map(|r| r.value(kind)).collect();
            channel_health(&values, healthy_band(asset_type, kind))
        })
        .sum();

    (total / SensorKind::ALL.len() as f32).clamp(0.0, 1.0)
}

fn channel_health(values: &[f32], (lo, hi): (f32, f32)) -> f32 {
    if values.is_empty() {
        return NEUTRAL_SCORE;
    }

    let in_range = values.iter().filter(|&&v| (lo..=hi).contains(&v)).count();
    let in_range_ratio = in_range as f32 / values.len() as f32;

    let (mean, std) = mean_std(values);
    let variability_penalty = if mean > 0.0 {
        (std / mean).min(MAX_VARIABILITY_PENALTY)
    } else {
        0.0
    };

    (in_range_ratio - variability_penalty).clamp(0.0, 1.0)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn steady_records(count: usize) -> Vec<SensorRecord> {
        let now = Utc::now();
        (0..count)
            .map(|i| SensorRecord {
                timestamp: now - Duration::hours((count - i) as i64),
                temperature: 20.0,
                vibration: 12.0,
                pressure: 101.0,
                humidity: 60.0,
                strain: 55.0,
            })
            .collect()
    }

    #[test]
    fn test_empty_is_neutral() {
        assert_eq!(health_score(&[], AssetType::Bridge), NEUTRAL_SCORE);
    }

    #[test]
    fn test_steady_in_band_scores_high() {
        let score = health_score(&steady_records(24), AssetType::Bridge);
        assert!(score > 0.9, "steady in-band telemetry scored {score}");
    }

    #[test]
    fn test_out_of_band_scores_lower() {
        let mut records = steady_records(24);
        for r in &mut records {
            r.vibration = 400.0;
            r.strain = 450.0;
        }
        let degraded = health_score(&records, AssetType::Bridge);
        let healthy = health_score(&steady_records(24), AssetType::Bridge);
        assert!(degraded < healthy - 0.2);
    }

    #[test]
    fn test_score_is_bounded() {
        let score = health_score(&steady_records(5), AssetType::Road);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_only_recent_window_counts() {
        // 48 bad readings followed by 24 good ones: only the good window
        // should be judged.
        let mut records: Vec<SensorRecord> = steady_records(48)
            .into_iter()
            .map(|mut r| {
                r.vibration = 500.0;
                r
            })
            .collect();
        records.extend(steady_records(24));

        let score = health_score(&records, AssetType::Bridge);
        assert!(score > 0.9);
    }
}
