//! Fixed-shape feature rows and matrices
//!
//! A row is a struct with named fields rather than a loose vector, so a
//! misplaced value is a compile error instead of a silent model input bug.
//! `as_array` is the one place field order is spelled out, and it must agree
//! with [`super::layout::FEATURE_LAYOUT`].

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;

// ============================================================================
// FEATURE ROW
// ============================================================================

/// One model input row: five sensor values plus asset metadata
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRow {
    pub temperature: f32,
    pub vibration: f32,
    pub pressure: f32,
    pub humidity: f32,
    pub strain: f32,
    pub asset_age_months: f32,
    pub months_since_maintenance: f32,
    pub asset_type_encoded: f32,
}

impl FeatureRow {
    /// Values in layout order
    pub fn as_array(&self) -> [f32; FEATURE_COUNT] {
        [
            self.temperature,
            self.vibration,
            self.pressure,
            self.humidity,
            self.strain,
            self.asset_age_months,
            self.months_since_maintenance,
            self.asset_type_encoded,
        ]
    }

    pub fn from_array(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            temperature: values[0],
            vibration: values[1],
            pressure: values[2],
            humidity: values[3],
            strain: values[4],
            asset_age_months: values[5],
            months_since_maintenance: values[6],
            asset_type_encoded: values[7],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

// ============================================================================
// FEATURE MATRIX
// ============================================================================

/// Chronologically ordered feature rows for one asset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureMatrix {
    rows: Vec<FeatureRow>,
}

impl FeatureMatrix {
    pub fn new(rows: Vec<FeatureRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent row (rows are chronological)
    pub fn last_row(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }

    /// Dense (rows x FEATURE_COUNT) view for the numeric code
    pub fn to_array2(&self) -> Array2<f32> {
        let mut data = Vec::with_capacity(self.rows.len() * FEATURE_COUNT);
        for row in &self.rows {
            data.extend_from_slice(&row.as_array());
        }
        // Shape is correct by construction.
        Array2::from_shape_vec((self.rows.len(), FEATURE_COUNT), data)
            .expect("row data matches matrix shape")
    }
}

// ============================================================================
// TESTS
// ============================================================================
