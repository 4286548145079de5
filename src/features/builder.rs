//! Feature matrix assembly and sequence windowing

use chrono::{DateTime, Utc};
use ndarray::{s, Array2};

use crate::asset::AssetContext;
use crate::constants::SEQUENCE_LENGTH;
use crate::sensor::simulate::synthesize_for_asset;
use crate::sensor::types::SensorRecord;
use super::layout::FEATURE_COUNT;
use super::matrix::{FeatureMatrix, FeatureRow};

/// Build the feature matrix for one asset.
///
/// Takes at most the most recent [`SEQUENCE_LENGTH`] records. When the
/// caller supplies no telemetry at all, a 24-hour window is synthesized from
/// the asset type and age so the models never see an empty input.
pub fn build_features(
    records: &[SensorRecord],
    ctx: &AssetContext,
    now: DateTime<Utc>,
) -> FeatureMatrix {
    let age_months = ctx.age_months(now);
    let months_since_maintenance = ctx.months_since_maintenance(now);
    let asset_type_encoded = ctx.asset_type.encode();

    let synthesized;
    let recent: &[SensorRecord] = if records.is_empty() {
        log::debug!(
            "no telemetry for asset {} - synthesizing {}h window",
            ctx.asset_id,
            SEQUENCE_LENGTH
        );
        synthesized = synthesize_for_asset(ctx.asset_type, age_months);
        &synthesized
    } else {
        &records[records.len().saturating_sub(SEQUENCE_LENGTH)..]
    };

    let rows = recent
        .iter()
        .map(|record| FeatureRow {
            temperature: record.temperature,
            vibration: record.vibration,
            pressure: record.pressure,
            humidity: record.humidity,
            strain: record.strain,
            asset_age_months: age_months,
            months_since_maintenance,
            asset_type_encoded,
        })
        .collect();

    FeatureMatrix::new(rows)
}

/// All length-24 sliding windows over a (rows x features) array.
///
/// The input is left-padded with zero rows up to [`SEQUENCE_LENGTH`]; one
/// window is emitted ending at every index from the sequence length through
/// the final row. Prediction only consumes the last window, training can use
/// them all.
pub fn sequence_windows(data: &Array2<f32>) -> Vec<Array2<f32>> {
    let padded = left_pad(data);
    let total = padded.nrows();

    (SEQUENCE_LENGTH..=total)
        .map(|end| padded.slice(s![end - SEQUENCE_LENGTH..end, ..]).to_owned())
        .collect()
}

fn left_pad(data: &Array2<f32>) -> Array2<f32> {
    if data.nrows() >= SEQUENCE_LENGTH {
        return data.clone();
    }

    let missing = SEQUENCE_LENGTH - data.nrows();
    let mut padded = Array2::zeros((SEQUENCE_LENGTH, FEATURE_COUNT));
    padded.slice_mut(s![missing.., ..]).assign(data);
    padded
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetType;
    use chrono::Duration;

    fn steady_records(count: usize, now: DateTime<Utc>) -> Vec<SensorRecord> {
        (0..count)
            .map(|i| SensorRecord {
                timestamp: now - Duration::hours((count - i) as i64),
                temperature: 20.0 + i as f32,
                vibration: 12.0,
                pressure: 101.0,
                humidity: 60.0,
                strain: 55.0,
            })
            .collect()
    }

    fn bridge_ctx(now: DateTime<Utc>) -> AssetContext {
        let mut ctx = AssetContext::new("BR-100", AssetType::Bridge);
        ctx.installation_date = Some(now - Duration::days(600));
        ctx
    }

    #[test]
    fn test_rows_have_eight_fields_in_order() {
        let now = Utc::now();
        let matrix = build_features(&steady_records(5, now), &bridge_ctx(now), now);

        assert_eq!(matrix.len(), 5);
        for row in matrix.rows() {
            let values = row.as_array();
            assert_eq!(values.len(), FEATURE_COUNT);
            assert_eq!(values[7], 1.0); // bridge encoding
            assert!((values[5] - 20.0).abs() < 0.1); // 600 days / 30
        }
    }

    #[test]
    fn test_caps_to_most_recent_window() {
        let now = Utc::now();
        let records = steady_records(40, now);
        let matrix = build_features(&records, &bridge_ctx(now), now);

        assert_eq!(matrix.len(), SEQUENCE_LENGTH);
        // Most recent records survive; temperature encodes the index.
        assert_eq!(matrix.rows()[0].temperature, records[16].temperature);
        assert_eq!(
            matrix.last_row().unwrap().temperature,
            records[39].temperature
        );
    }

    #[test]
    fn test_empty_input_synthesizes_full_window() {
        let now = Utc::now();
        let matrix = build_features(&[], &bridge_ctx(now), now);

        assert_eq!(matrix.len(), SEQUENCE_LENGTH);
        for row in matrix.rows() {
            assert!(row.is_finite());
            assert_eq!(row.asset_type_encoded, 1.0);
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let now = Utc::now();
        for (asset_type, expected) in [
            (AssetType::Bridge, 1.0),
            (AssetType::Road, 2.0),
            (AssetType::Building, 3.0),
            (AssetType::Tunnel, 4.0),
            (AssetType::Unknown, 0.0),
        ] {
            let ctx = AssetContext::new("X", asset_type);
            let matrix = build_features(&steady_records(3, now), &ctx, now);
            for row in matrix.rows() {
                assert_eq!(row.asset_type_encoded, expected);
            }
        }
    }

    #[test]
    fn test_short_input_pads_to_one_window() {
        let now = Utc::now();
        let matrix = build_features(&steady_records(10, now), &bridge_ctx(now), now);
        let windows = sequence_windows(&matrix.to_array2());

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].shape(), &[SEQUENCE_LENGTH, FEATURE_COUNT]);
        // First 14 rows are zero padding.
        assert_eq!(windows[0][[0, 0]], 0.0);
        assert_eq!(windows[0][[13, 0]], 0.0);
        assert_ne!(windows[0][[14, 0]], 0.0);
    }

    #[test]
    fn test_exact_window_emits_one() {
        let now = Utc::now();
        let matrix = build_features(&steady_records(24, now), &bridge_ctx(now), now);
        let windows = sequence_windows(&matrix.to_array2());
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_longer_input_slides() {
        let data = Array2::from_elem((30, FEATURE_COUNT), 1.0);
        let windows = sequence_windows(&data);
        assert_eq!(windows.len(), 7); // ends at 24..=30
    }
}
