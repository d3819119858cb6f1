//! Size Estimation Module
//!
//! Pluggable estimation of payload byte size for eviction accounting.
//! The default estimator measures the JSON-serialized length; callers with
//! payloads that serialize poorly can supply their own function.

use serde_json::Value;

use crate::cache::DEFAULT_SIZE_ESTIMATE;

// == Size Estimator ==
/// Estimator function: returns the approximate byte size of a payload, or
/// None when the payload cannot be measured.
pub type SizeEstimator = Box<dyn Fn(&Value) -> Option<usize> + Send + Sync>;

/// Returns the default estimator (JSON byte length).
pub fn default_estimator() -> SizeEstimator {
    Box::new(json_byte_length)
}

/// Measures a payload by its serialized JSON length.
pub fn json_byte_length(value: &Value) -> Option<usize> {
    serde_json::to_vec(value).ok().map(|bytes| bytes.len())
}

/// Applies an estimator, falling back to a fixed default estimate when the
/// payload cannot be measured. Estimation failure never fails the operation.
pub fn estimate_or_default(estimator: &SizeEstimator, value: &Value) -> usize {
    estimator(value).unwrap_or(DEFAULT_SIZE_ESTIMATE)
}
