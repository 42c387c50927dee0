//! Feature Layout - wine physicochemical inputs
//!
//! The model's coefficients are positionally indexed, so the order below
//! is the order every feature row is built in. Request bodies may list
//! keys in any order.

use serde_json::{Map, Value};

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "fixed acidity",        // 0
    "volatile acidity",     // 1
    "citric acid",          // 2
    "residual sugar",       // 3
    "chlorides",            // 4
    "free sulfur dioxide",  // 5
    "total sulfur dioxide", // 6
    "density",              // 7
    "pH",                   // 8
    "sulphates",            // 9
    "alcohol",              // 10
];

/// Total number of features
pub const FEATURE_COUNT: usize = 11;

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

/// Feature names as owned strings (for error bodies and metadata)
pub fn expected_features() -> Vec<String> {
    FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
}

/// Names from the layout that are absent from `body`, in layout order
pub fn missing_features(body: &Map<String, Value>) -> Vec<String> {
    FEATURE_LAYOUT
        .iter()
        .filter(|name| !body.contains_key(**name))
        .map(|name| name.to_string())
        .collect()
}

// ============================================================================
// FEATURE ROW
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FeatureError {
    #[error("could not convert {value} to float for feature '{name}'")]
    NotNumeric { name: String, value: String },

    #[error("feature '{0}' is not a finite number")]
    NotFinite(String),
}

/// A single model input, ordered by [`FEATURE_LAYOUT`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow(pub [f64; FEATURE_COUNT]);

impl FeatureRow {
    /// Read every layout feature out of a request body, in layout order.
    /// Extra keys in the body are ignored. Callers reject absent keys with
    /// [`missing_features`] first; an absent key here coerces like `null`.
    pub fn from_map(body: &Map<String, Value>) -> Result<Self, FeatureError> {
        let mut values = [0.0f64; FEATURE_COUNT];

        for (slot, name) in values.iter_mut().zip(FEATURE_LAYOUT) {
            *slot = match body.get(*name) {
                Some(raw) => coerce(name, raw)?,
                None => coerce(name, &Value::Null)?,
            };
        }

        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// Numbers pass through, numeric strings are parsed and booleans become
/// 1.0 / 0.0. Anything else fails.
fn coerce(name: &str, raw: &Value) -> Result<f64, FeatureError> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
    .ok_or_else(|| FeatureError::NotNumeric {
        name: name.to_string(),
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(FeatureError::NotFinite(name.to_string()));
    }

    Ok(value)
}
