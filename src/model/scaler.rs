//! Min/max feature scaling
//!
//! Fitted on training rows, applied before the sequence model. Transform
//! clamps to [0,1] so an out-of-distribution reading cannot blow up the
//! network input.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::features::{FeatureMatrix, FEATURE_COUNT};

/// Range floor - a constant feature still scales without dividing by zero
const MIN_RANGE: f32 = 1e-8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    fitted: bool,
    min_vals: [f32; FEATURE_COUNT],
    max_vals: [f32; FEATURE_COUNT],
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self {
            fitted: false,
            min_vals: [0.0; FEATURE_COUNT],
            max_vals: [1.0; FEATURE_COUNT],
        }
    }
}

impl MinMaxScaler {
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Fit per-feature min/max over a (rows x features) training array.
    /// A call with no rows leaves the scaler unfitted.
    pub fn fit(&mut self, data: &Array2<f32>) {
        if data.nrows() == 0 {
            return;
        }

        for feature in 0..FEATURE_COUNT {
            let column = data.column(feature);
            let mut min = f32::INFINITY;
            let mut max = f32::NEG_INFINITY;
            for &v in column.iter() {
                min = min.min(v);
                max = max.max(v);
            }
            self.min_vals[feature] = min;
            self.max_vals[feature] = max;
        }
        self.fitted = true;
    }

    /// Scale one row into [0,1] per feature.
    pub fn transform_row(&self, row: &[f32; FEATURE_COUNT]) -> [f32; FEATURE_COUNT] {
        let mut scaled = [0.0f32; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let range = (self.max_vals[i] - self.min_vals[i]).max(MIN_RANGE);
            scaled[i] = ((row[i] - self.min_vals[i]) / range).clamp(0.0, 1.0);
        }
        scaled
    }

    /// Scale a whole feature matrix into a dense array.
    pub fn transform_matrix(&self, matrix: &FeatureMatrix) -> Array2<f32> {
        let mut data = Vec::with_capacity(matrix.len() * FEATURE_COUNT);
        for row in matrix.rows() {
            data.extend_from_slice(&self.transform_row(&row.as_array()));
        }
        Array2::from_shape_vec((matrix.len(), FEATURE_COUNT), data)
            .expect("row data matches matrix shape")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fitted_scaler() -> MinMaxScaler {
        let mut scaler = MinMaxScaler::default();
        let data = array![
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [10.0, 20.0, 200.0, 100.0, 500.0, 120.0, 60.0, 4.0],
        ];
        scaler.fit(&data);
        scaler
    }

    #[test]
    fn test_unfitted_by_default() {
        assert!(!MinMaxScaler::default().is_fitted());
    }

    #[test]
    fn test_fit_and_transform() {
        let scaler = fitted_scaler();
        assert!(scaler.is_fitted());

        let scaled = scaler.transform_row(&[5.0, 10.0, 100.0, 50.0, 250.0, 60.0, 30.0, 2.0]);
        for v in scaled {
            assert!((v - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_transform_clamps_out_of_distribution() {
        let scaler = fitted_scaler();
        let scaled = scaler.transform_row(&[-100.0, 1e6, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(scaled[0], 0.0);
        assert_eq!(scaled[1], 1.0);
    }

    #[test]
    fn test_constant_feature_does_not_divide_by_zero() {
        let mut scaler = MinMaxScaler::default();
        let data = Array2::from_elem((10, FEATURE_COUNT), 42.0);
        scaler.fit(&data);

        let scaled = scaler.transform_row(&[42.0; FEATURE_COUNT]);
        for v in scaled {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_empty_fit_is_a_noop() {
        let mut scaler = MinMaxScaler::default();
        scaler.fit(&Array2::zeros((0, FEATURE_COUNT)));
        assert!(!scaler.is_fitted());
    }
}
