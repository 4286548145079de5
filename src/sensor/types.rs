//! Sensor record types
//!
//! No logic beyond per-kind ranges and defaults - validation lives in
//! `preprocess`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// SENSOR KIND
// ============================================================================

/// The five monitored sensor channels, in canonical field order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Temperature,
    Vibration,
    Pressure,
    Humidity,
    Strain,
}

impl SensorKind {
    /// Canonical ordering - must match the feature layout
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Temperature,
        SensorKind::Vibration,
        SensorKind::Pressure,
        SensorKind::Humidity,
        SensorKind::Strain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Vibration => "vibration",
            SensorKind::Pressure => "pressure",
            SensorKind::Humidity => "humidity",
            SensorKind::Strain => "strain",
        }
    }

    /// Physical range a reading is clipped into
    pub fn valid_range(&self) -> (f32, f32) {
        match self {
            SensorKind::Temperature => (-50.0, 100.0),
            SensorKind::Vibration => (0.0, 1000.0),
            SensorKind::Pressure => (0.0, 200.0),
            SensorKind::Humidity => (0.0, 100.0),
            SensorKind::Strain => (0.0, 500.0),
        }
    }

    /// Substitute for an absent or unparseable reading
    pub fn default_value(&self) -> f32 {
        match self {
            SensorKind::Temperature => 20.0,
            SensorKind::Vibration => 10.0,
            SensorKind::Pressure => 101.3,
            SensorKind::Humidity => 60.0,
            SensorKind::Strain => 50.0,
        }
    }

    /// Clip a value into the valid range
    pub fn clip(&self, value: f32) -> f32 {
        let (min, max) = self.valid_range();
        value.clamp(min, max)
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RAW READING (adapter-facing)
// ============================================================================

/// One raw reading as the adapter deserialized it off the wire.
///
/// Sensor fields stay as loose JSON values here: real feeds deliver numbers,
/// quoted numbers, nulls or garbage, and validation repairs all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSensorReading {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub vibration: Option<Value>,
    #[serde(default)]
    pub pressure: Option<Value>,
    #[serde(default)]
    pub humidity: Option<Value>,
    #[serde(default)]
    pub strain: Option<Value>,
}

impl RawSensorReading {
    pub fn value(&self, kind: SensorKind) -> Option<&Value> {
        match kind {
            SensorKind::Temperature => self.temperature.as_ref(),
            SensorKind::Vibration => self.vibration.as_ref(),
            SensorKind::Pressure => self.pressure.as_ref(),
            SensorKind::Humidity => self.humidity.as_ref(),
            SensorKind::Strain => self.strain.as_ref(),
        }
    }
}

// ============================================================================
// CANONICAL RECORD
// ============================================================================

/// A validated reading: every field numeric, clipped, timestamped.
/// Immutable once produced by `preprocess::validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub timestamp: DateTime<Utc>,
    pub temperature: f32,
    pub vibration: f32,
    pub pressure: f32,
    pub humidity: f32,
    pub strain: f32,
}

impl SensorRecord {
    pub fn value(&self, kind: SensorKind) -> f32 {
        match kind {
            SensorKind::Temperature => self.temperature,
            SensorKind::Vibration => self.vibration,
            SensorKind::Pressure => self.pressure,
            SensorKind::Humidity => self.humidity,
            SensorKind::Strain => self.strain,
        }
    }

    pub(crate) fn set_value(&mut self, kind: SensorKind, value: f32) {
        match kind {
            SensorKind::Temperature => self.temperature = value,
            SensorKind::Vibration => self.vibration = value,
            SensorKind::Pressure => self.pressure = value,
            SensorKind::Humidity => self.humidity = value,
            SensorKind::Strain => self.strain = value,
        }
    }

    /// A record with every channel at its default, at the given instant
    pub fn defaults_at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temperature: SensorKind::Temperature.default_value(),
            vibration: SensorKind::Vibration.default_value(),
            pressure: SensorKind::Pressure.default_value(),
            humidity: SensorKind::Humidity.default_value(),
            strain: SensorKind::Strain.default_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_bounds() {
        assert_eq!(SensorKind::Temperature.clip(150.0), 100.0);
        assert_eq!(SensorKind::Temperature.clip(-80.0), -50.0);
        assert_eq!(SensorKind::Vibration.clip(-5.0), 0.0);
        assert_eq!(SensorKind::Strain.clip(1200.0), 500.0);
        assert_eq!(SensorKind::Humidity.clip(55.0), 55.0);
    }

    #[test]
    fn test_canonical_order() {
        let names: Vec<&str> = SensorKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["temperature", "vibration", "pressure", "humidity", "strain"]
        );
    }
}
