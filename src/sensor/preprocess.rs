//! Reading validation and batch preprocessing
//!
//! Input defects are repaired, never surfaced: unparseable values fall back
//! to the per-kind default, out-of-range values are clipped, bad timestamps
//! become "now". Nothing in this module can fail.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::asset::parse_iso_date;
use super::types::{RawSensorReading, SensorKind, SensorRecord};

/// Validate one raw reading into a canonical record.
pub fn validate(raw: &RawSensorReading) -> SensorRecord {
    validate_at(raw, Utc::now())
}

/// Validate with an explicit fallback instant for absent/bad timestamps.
pub fn validate_at(raw: &RawSensorReading, now: DateTime<Utc>) -> SensorRecord {
    let timestamp = raw
        .timestamp
        .as_deref()
        .and_then(|s| parse_iso_date(s).ok())
        .unwrap_or(now);

    let mut record = SensorRecord::defaults_at(timestamp);
    for kind in SensorKind::ALL {
        record.set_value(kind, coerce(raw.value(kind), kind));
    }
    record
}

/// Validate a batch and return it sorted by timestamp ascending.
/// The sort is stable: readings with equal timestamps keep their input order.
pub fn preprocess_batch(raws: &[RawSensorReading]) -> Vec<SensorRecord> {
    let now = Utc::now();
    let mut records: Vec<SensorRecord> = raws.iter().map(|r| validate_at(r, now)).collect();
    records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    records
}

/// Coerce a loose JSON value into a clipped sensor reading.
fn coerce(value: Option<&Value>, kind: SensorKind) -> f32 {
    let parsed = value.and_then(|v| match v {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    });

    match parsed {
        Some(v) if v.is_finite() => kind.clip(v),
        _ => kind.default_value(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reading(temperature: Value, vibration: Value) -> RawSensorReading {
        RawSensorReading {
            timestamp: Some("2024-03-01T10:00:00Z".to_string()),
            temperature: Some(temperature),
            vibration: Some(vibration),
            ..Default::default()
        }
    }

    #[test]
    fn test_out_of_range_is_clipped() {
        let record = validate(&reading(json!(150.0), json!(25.0)));
        assert_eq!(record.temperature, 100.0);
        assert_eq!(record.vibration, 25.0);
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        let record = validate(&reading(json!("abc"), json!(null)));
        assert_eq!(record.temperature, 20.0);
        assert_eq!(record.vibration, 10.0);
    }

    #[test]
    fn test_numeric_string_is_accepted() {
        let record = validate(&reading(json!("32.5"), json!("12")));
        assert_eq!(record.temperature, 32.5);
        assert_eq!(record.vibration, 12.0);
    }

    #[test]
    fn test_absent_fields_use_defaults() {
        let record = validate(&RawSensorReading::default());
        assert_eq!(record.temperature, 20.0);
        assert_eq!(record.vibration, 10.0);
        assert_eq!(record.pressure, 101.3);
        assert_eq!(record.humidity, 60.0);
        assert_eq!(record.strain, 50.0);
    }

    #[test]
    fn test_non_finite_string_falls_back() {
        let record = validate(&reading(json!("NaN"), json!("inf")));
        assert_eq!(record.temperature, 20.0);
        assert_eq!(record.vibration, 10.0);
    }

    #[test]
    fn test_batch_sorted_by_timestamp() {
        let mut raws = Vec::new();
        for hour in [14, 9, 22, 3, 17] {
            raws.push(RawSensorReading {
                timestamp: Some(format!("2024-03-01T{hour:02}:00:00Z")),
                temperature: Some(json!(hour as f32)),
                ..Default::default()
            });
        }

        let records = preprocess_batch(&raws);
        assert_eq!(records.len(), 5);
        for pair in records.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        assert_eq!(records[0].temperature, 3.0);
        assert_eq!(records[4].temperature, 22.0);
    }

    #[test]
    fn test_bad_timestamp_does_not_fail() {
        let raw = RawSensorReading {
            timestamp: Some("yesterday-ish".to_string()),
            ..Default::default()
        };
        let now = Utc::now();
        let record = validate_at(&raw, now);
        assert_eq!(record.timestamp, now);
    }
}
