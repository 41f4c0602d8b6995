//! NODATA detection.

use serde::Serialize;

/// A raw sample classified against the dataset's NODATA sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SampleValue {
    /// A usable value. Never NaN.
    Valid(f64),
    /// The sample matched the sentinel (or was NaN).
    NoData,
}

impl SampleValue {
    /// Classify a raw value against a sentinel.
    pub fn classify(raw: f64, sentinel: f64) -> Self {
        if is_nodata(raw, sentinel) {
            SampleValue::NoData
        } else {
            SampleValue::Valid(raw)
        }
    }

    /// The value, or `None` for NODATA.
    pub fn value(&self) -> Option<f64> {
        match self {
            SampleValue::Valid(v) => Some(*v),
            SampleValue::NoData => None,
        }
    }

    pub fn is_nodata(&self) -> bool {
        matches!(self, SampleValue::NoData)
    }
}

/// Check whether a raw value is the NODATA sentinel.
///
/// A NaN sentinel matches any NaN. Other sentinels match exactly; raster
/// fill values are written exactly, so there is no tolerance.
///
/// A NaN raw value can never take part in arithmetic, so it is treated as
/// NODATA whatever the sentinel is.
pub fn is_nodata(raw: f64, sentinel: f64) -> bool {
    if raw.is_nan() {
        return true;
    }
    if sentinel.is_nan() {
        return false;
    }
    raw == sentinel
}
