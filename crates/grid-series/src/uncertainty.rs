//! Symmetric uncertainty bounds.

use serde::Serialize;

/// Lower and upper bound of a valid sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

/// Compute `value ± delta`.
///
/// No clamping: bounds may leave the physical range of the quantity.
pub fn bounds(value: f64, delta: f64) -> Bounds {
    Bounds {
        lower: value - delta,
        upper: value + delta,
    }
}
