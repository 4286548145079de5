//! Fallback regressor
//!
//! Ridge regression over a single feature row. This is the second scoring
//! tier: when the sequence model is unavailable or declines, the most recent
//! row alone produces the probability. Closed-form fit via the normal
//! equations - the system is only (FEATURE_COUNT+1)^2.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::features::FEATURE_COUNT;

/// Ridge penalty keeping the normal equations well conditioned
const RIDGE_LAMBDA: f32 = 1e-2;

/// Coefficient count: one per feature plus an intercept
const COEFFICIENTS: usize = FEATURE_COUNT + 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FallbackRegressor {
    /// Intercept first, then one weight per feature in layout order
    weights: Option<[f32; COEFFICIENTS]>,
}

impl FallbackRegressor {
    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    /// Fit on (rows x features) inputs against targets in [0,1].
    ///
    /// Returns false when the system cannot be solved (degenerate inputs);
    /// the regressor is left unfitted in that case.
    pub fn fit(&mut self, inputs: &Array2<f32>, targets: &Array1<f32>) -> bool {
        let n = inputs.nrows();
        if n == 0 || targets.len() != n {
            return false;
        }

        // Augment with an intercept column, build XtX + lambda*I and Xty.
        let mut gram = [[0.0f64; COEFFICIENTS]; COEFFICIENTS];
        let mut moment = [0.0f64; COEFFICIENTS];

        for row in 0..n {
            let mut x = [1.0f64; COEFFICIENTS];
            for feature in 0..FEATURE_COUNT {
                x[feature + 1] = inputs[[row, feature]] as f64;
            }
            let y = targets[row] as f64;

            for i in 0..COEFFICIENTS {
                moment[i] += x[i] * y;
                for j in 0..COEFFICIENTS {
                    gram[i][j] += x[i] * x[j];
                }
            }
        }
        for i in 0..COEFFICIENTS {
            gram[i][i] += RIDGE_LAMBDA as f64;
        }

        match solve(gram, moment) {
            Some(solution) => {
                let mut weights = [0.0f32; COEFFICIENTS];
                for (w, s) in weights.iter_mut().zip(solution.iter()) {
                    *w = *s as f32;
                }
                if weights.iter().any(|w| !w.is_finite()) {
                    return false;
                }
                self.weights = Some(weights);
                true
            }
            None => false,
        }
    }

    /// Predict a failure probability from one row; `None` until fitted.
    /// The output is clamped to [0,1].
    pub fn predict(&self, row: &[f32; FEATURE_COUNT]) -> Option<f32> {
        let weights = self.weights.as_ref()?;
        let mut value = weights[0];
        for (feature, &w) in weights[1..].iter().enumerate() {
            value += w * row[feature];
        }
        Some(value.clamp(0.0, 1.0))
    }
}

/// Gaussian elimination with partial pivoting; `None` when singular.
fn solve(
    mut a: [[f64; COEFFICIENTS]; COEFFICIENTS],
    mut b: [f64; COEFFICIENTS],
) -> Option<[f64; COEFFICIENTS]> {
    for col in 0..COEFFICIENTS {
        // Pivot on the largest remaining magnitude in this column.
        let mut pivot = col;
        for row in col + 1..COEFFICIENTS {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..COEFFICIENTS {
            let factor = a[row][col] / a[col][col];
            for k in col..COEFFICIENTS {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; COEFFICIENTS];
    for col in (0..COEFFICIENTS).rev() {
        let mut sum = b[col];
        for k in col + 1..COEFFICIENTS {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    Some(x)
}

// ============================================================================
// TESTS
// ============================================================================
