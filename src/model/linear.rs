//! Linear regression estimator with an optional standard-scaler stage

use serde::Deserialize;

use crate::features::{FeatureRow, FEATURE_COUNT};
use super::{InferenceError, Predictor};

/// `(x - mean) / scale` applied per feature before the dot product
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    fn transform(&self, values: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0f64; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            // Constant columns are stored with scale 0
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            out[i] = (values[i] - self.mean[i]) / scale;
        }
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: [f64; FEATURE_COUNT],
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

impl LinearRegressor {
    pub fn validate(&self) -> Result<(), String> {
        let all_finite = std::iter::once(self.intercept)
            .chain(self.coefficients.iter().copied())
            .chain(self.scaler.iter().flat_map(|s| s.mean.iter().chain(s.scale.iter()).copied()))
            .all(f64::is_finite);

        if !all_finite {
            return Err("linear model contains non-finite parameters".to_string());
        }
        Ok(())
    }

    fn score(&self, row: &FeatureRow) -> f64 {
        let scaled;
        let values = match &self.scaler {
            Some(scaler) => {
                scaled = scaler.transform(row.values());
                &scaled
            }
            None => row.values(),
        };

        self.intercept
            + values
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, w)| x * w)
                .sum::<f64>()
    }
}

impl Predictor for LinearRegressor {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError> {
        Ok(rows.iter().map(|row| self.score(row)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: [f64; FEATURE_COUNT]) -> FeatureRow {
        FeatureRow(values)
    }

    #[test]
    fn test_dot_product_plus_intercept() {
        let mut coefficients = [0.0; FEATURE_COUNT];
        coefficients[0] = 2.0;
        coefficients[10] = 0.5;
        let model = LinearRegressor { intercept: 1.0, coefficients, scaler: None };

        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 3.0;
        values[10] = 4.0;

        let out = model.predict(&[row(values)]).unwrap();
        assert_eq!(out, vec![9.0]);
    }

    #[test]
    fn test_scaler_applied_before_coefficients() {
        let model = LinearRegressor {
            intercept: 5.0,
            coefficients: [1.0; FEATURE_COUNT],
            scaler: Some(StandardScaler {
                mean: [1.0; FEATURE_COUNT],
                scale: [2.0; FEATURE_COUNT],
            }),
        };

        // Each feature contributes (3 - 1) / 2 = 1
        let out = model.predict(&[row([3.0; FEATURE_COUNT])]).unwrap();
        assert_eq!(out, vec![5.0 + FEATURE_COUNT as f64]);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let mut scale = [1.0; FEATURE_COUNT];
        scale[0] = 0.0;
        let scaler = StandardScaler { mean: [0.0; FEATURE_COUNT], scale };

        let out = scaler.transform(&[2.0; FEATURE_COUNT]);
        assert_eq!(out[0], 2.0);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut model = LinearRegressor {
            intercept: 0.0,
            coefficients: [0.0; FEATURE_COUNT],
            scaler: None,
        };
        assert!(model.validate().is_ok());

        model.coefficients[3] = f64::NAN;
        assert!(model.validate().is_err());
    }
}
