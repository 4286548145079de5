//! Simulated telemetry
//!
//! Test-data generators, not forecasts. `simulate` produces hourly readings
//! with per-asset Gaussian profiles, a diurnal temperature cycle, slow linear
//! degradation and occasional injected anomalies. `synthesize_for_asset`
//! produces the age-seeded stand-in window the feature builder uses when a
//! prediction request carries no sensor data at all.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;

use crate::asset::AssetType;
use crate::constants::SEQUENCE_LENGTH;
use super::types::{SensorKind, SensorRecord};

/// Chance that any single reading carries an injected anomaly
const ANOMALY_CHANCE: f64 = 0.05;

/// Injected anomaly magnitude, in standard deviations
const ANOMALY_MIN_SIGMA: f32 = 2.0;
const ANOMALY_MAX_SIGMA: f32 = 4.0;

/// Day/night temperature swing: amplitude 3, 24 h period, peak offset 6 h
const DIURNAL_AMPLITUDE: f32 = 3.0;
const DIURNAL_PEAK_OFFSET_HOURS: f32 = 6.0;

/// Aging saturates after ten years
const AGING_HORIZON_MONTHS: f32 = 120.0;

// ============================================================================
// PER-ASSET PROFILES
// ============================================================================

/// Gaussian profile for one sensor channel on one asset type
#[derive(Debug, Clone, Copy)]
struct FieldProfile {
    mean: f32,
    std: f32,
    /// Linear degradation per hour
    trend: f32,
}

fn profile(asset_type: AssetType, kind: SensorKind) -> FieldProfile {
    use AssetType::*;
    use SensorKind::*;

    let (mean, std, trend) = match (asset_type, kind) {
        (Bridge | Unknown, Temperature) => (20.0, 5.0, 0.1),
        (Bridge | Unknown, Vibration) => (15.0, 3.0, 0.05),
        (Bridge | Unknown, Pressure) => (101.3, 0.5, 0.0),
        (Bridge | Unknown, Humidity) => (65.0, 10.0, 0.0),
        (Bridge | Unknown, Strain) => (60.0, 8.0, 0.02),

        (Road, Temperature) => (25.0, 8.0, 0.2),
        (Road, Vibration) => (25.0, 5.0, 0.1),
        (Road, Pressure) => (101.3, 0.5, 0.0),
        (Road, Humidity) => (55.0, 12.0, 0.0),
        (Road, Strain) => (40.0, 6.0, 0.03),

        (Building, Temperature) => (22.0, 3.0, 0.05),
        (Building, Vibration) => (8.0, 2.0, 0.02),
        (Building, Pressure) => (101.3, 0.3, 0.0),
        (Building, Humidity) => (50.0, 8.0, 0.0),
        (Building, Strain) => (30.0, 4.0, 0.01),

        (Tunnel, Temperature) => (18.0, 2.0, 0.02),
        (Tunnel, Vibration) => (12.0, 3.0, 0.03),
        (Tunnel, Pressure) => (101.3, 0.4, 0.0),
        (Tunnel, Humidity) => (80.0, 5.0, 0.0),
        (Tunnel, Strain) => (70.0, 10.0, 0.04),
    };

    FieldProfile { mean, std, trend }
}

// ============================================================================
// SIMULATION
// ============================================================================

/// Generate one record per hour for `duration_hours` hours ending now.
pub fn simulate(asset_type: AssetType, duration_hours: u32) -> Vec<SensorRecord> {
    simulate_with_rng(asset_type, duration_hours, &mut rand::thread_rng())
}

/// Simulation with a caller-supplied RNG, for deterministic tests.
pub fn simulate_with_rng<R: Rng>(
    asset_type: AssetType,
    duration_hours: u32,
    rng: &mut R,
) -> Vec<SensorRecord> {
    let now = Utc::now();
    let mut records = Vec::with_capacity(duration_hours as usize);

    for hour in 0..duration_hours {
        let timestamp = now - Duration::hours((duration_hours - hour - 1) as i64);
        let mut record = SensorRecord::defaults_at(timestamp);

        for kind in SensorKind::ALL {
            let p = profile(asset_type, kind);
            let mut value = p.mean + gaussian(rng) * p.std;

            if kind == SensorKind::Temperature {
                value += diurnal_variation(timestamp);
            }

            if rng.gen_bool(ANOMALY_CHANCE) {
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                value += sign * rng.gen_range(ANOMALY_MIN_SIGMA..ANOMALY_MAX_SIGMA) * p.std;
            }

            value += hour as f32 * p.trend;
            record.set_value(kind, kind.clip(value));
        }

        records.push(record);
    }

    records
}

/// Synthesize the 24-hour stand-in window for an asset with no telemetry.
///
/// Older assets trend warmer, noisier and more strained, so the feature
/// builder never hands the models an empty or age-blind window.
pub fn synthesize_for_asset(asset_type: AssetType, age_months: f32) -> Vec<SensorRecord> {
    synthesize_with_rng(asset_type, age_months, &mut rand::thread_rng())
}

pub fn synthesize_with_rng<R: Rng>(
    asset_type: AssetType,
    age_months: f32,
    rng: &mut R,
) -> Vec<SensorRecord> {
    let now = Utc::now();
    let aging = (age_months / AGING_HORIZON_MONTHS).clamp(0.0, 1.0);
    let (base_temp, base_vib, base_strain) = base_levels(asset_type);

    let mut records = Vec::with_capacity(SEQUENCE_LENGTH);
    for hour in 0..SEQUENCE_LENGTH {
        let timestamp = now - Duration::hours((SEQUENCE_LENGTH - hour - 1) as i64);
        let mut record = SensorRecord::defaults_at(timestamp);

        record.set_value(
            SensorKind::Temperature,
            SensorKind::Temperature.clip(base_temp + gaussian(rng) * 3.0 + aging * 5.0),
        );
        record.set_value(
            SensorKind::Vibration,
            SensorKind::Vibration.clip(base_vib + gaussian(rng) * 2.0 + aging * 10.0),
        );
        record.set_value(
            SensorKind::Pressure,
            SensorKind::Pressure.clip(101.3 + gaussian(rng)),
        );
        record.set_value(
            SensorKind::Humidity,
            SensorKind::Humidity.clip(60.0 + gaussian(rng) * 10.0),
        );
        record.set_value(
            SensorKind::Strain,
            SensorKind::Strain.clip(base_strain + gaussian(rng) * 5.0 + aging * 20.0),
        );

        records.push(record);
    }

    records
}

/// Nominal temperature/vibration/strain levels per asset type
fn base_levels(asset_type: AssetType) -> (f32, f32, f32) {
    match asset_type {
        AssetType::Bridge | AssetType::Unknown => (20.0, 15.0, 60.0),
        AssetType::Road => (25.0, 20.0, 40.0),
        AssetType::Building => (22.0, 5.0, 30.0),
        AssetType::Tunnel => (18.0, 12.0, 70.0),
    }
}

fn diurnal_variation(timestamp: DateTime<Utc>) -> f32 {
    let hour = timestamp.hour() as f32;
    DIURNAL_AMPLITUDE
        * (2.0 * std::f32::consts::PI * (hour - DIURNAL_PEAK_OFFSET_HOURS) / 24.0).sin()
}

/// Standard normal sample via the Box-Muller transform.
fn gaussian<R: Rng>(rng: &mut R) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_simulate_count_and_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = simulate_with_rng(AssetType::Tunnel, 24, &mut rng);

        assert_eq!(records.len(), 24);
        for record in &records {
            assert!((0.0..=100.0).contains(&record.humidity));
            assert!((0.0..=500.0).contains(&record.strain));
            assert!((-50.0..=100.0).contains(&record.temperature));
            assert!((0.0..=1000.0).contains(&record.vibration));
            assert!((0.0..=200.0).contains(&record.pressure));
        }
    }

    #[test]
    fn test_simulate_timestamps_ascend_hourly() {
        let mut rng = StdRng::seed_from_u64(11);
        let records = simulate_with_rng(AssetType::Bridge, 6, &mut rng);

        for pair in records.windows(2) {
            let gap = pair[1].timestamp - pair[0].timestamp;
            assert_eq!(gap.num_hours(), 1);
        }
    }

    #[test]
    fn test_synthesize_window_length() {
        let mut rng = StdRng::seed_from_u64(3);
        let records = synthesize_with_rng(AssetType::Building, 48.0, &mut rng);
        assert_eq!(records.len(), SEQUENCE_LENGTH);
    }

    #[test]
    fn test_synthesize_aging_raises_strain() {
        // Averaged over many draws, an old tunnel should strain harder
        // than a brand new one.
        let mut rng = StdRng::seed_from_u64(5);
        let young: f32 = synthesize_with_rng(AssetType::Tunnel, 0.0, &mut rng)
            .iter()
            .map(|r| r.strain)
            .sum::<f32>()
            / SEQUENCE_LENGTH as f32;
        let old: f32 = synthesize_with_rng(AssetType::Tunnel, 240.0, &mut rng)
            .iter()
            .map(|r| r.strain)
            .sum::<f32>()
            / SEQUENCE_LENGTH as f32;

        assert!(old > young + 10.0);
    }

    #[test]
    fn test_gaussian_is_roughly_centered() {
        let mut rng = StdRng::seed_from_u64(42);
        let mean: f32 = (0..5000).map(|_| gaussian(&mut rng)).sum::<f32>() / 5000.0;
        assert!(mean.abs() < 0.1);
    }
}
