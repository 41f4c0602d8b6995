//! Rendering of extracted series as JSON payloads and CSV tables.

use serde::{Deserialize, Serialize};

use crate::extractor::{Sample, TimeSeriesResult};

/// How numbers are written into the CSV table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum NumberFormat {
    /// Integral values print as integers, all others with a fixed number of
    /// fraction digits.
    Fixed { fraction_digits: usize },
    /// Byte-compatible with the legacy CSV layout: the value column prints
    /// integral values as integers, every other number is written with six
    /// significant digits and trailing zeros kept (`90.0000`, `110.000`).
    ///
    /// The value and bound columns therefore disagree for integral samples.
    /// Values of a million or more lose the exponent form of that layout
    /// and print as plain integers.
    Legacy,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::Fixed { fraction_digits: 3 }
    }
}

const LEGACY_SIGNIFICANT_DIGITS: i32 = 6;

impl NumberFormat {
    /// Parse from a config string: `fixed`, `fixed:<digits>` or `legacy`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "legacy" => Some(Self::Legacy),
            "fixed" => Some(Self::default()),
            _ => {
                let digits = s.strip_prefix("fixed:")?;
                let fraction_digits = digits.parse().ok()?;
                Some(Self::Fixed { fraction_digits })
            }
        }
    }

    /// Format a number of the value column.
    pub fn value(&self, v: f64) -> String {
        match self {
            Self::Fixed { fraction_digits } => fixed(v, *fraction_digits),
            Self::Legacy if is_integral(v) => integer(v),
            Self::Legacy => significant(v, LEGACY_SIGNIFICANT_DIGITS),
        }
    }

    /// Format a number of one of the bound columns.
    pub fn bound(&self, v: f64) -> String {
        match self {
            Self::Fixed { fraction_digits } => fixed(v, *fraction_digits),
            Self::Legacy => significant(v, LEGACY_SIGNIFICANT_DIGITS),
        }
    }
}

fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15
}

fn integer(v: f64) -> String {
    (v as i64).to_string()
}

fn fixed(v: f64, fraction_digits: usize) -> String {
    if is_integral(v) {
        integer(v)
    } else {
        format!("{:.*}", fraction_digits, v)
    }
}

/// `%#.<digits>g` without the exponent form.
fn significant(v: f64, digits: i32) -> String {
    if v == 0.0 {
        return format!("{:.*}", (digits - 1) as usize, 0.0);
    }
    if !v.is_finite() {
        return v.to_string();
    }

    let magnitude = v.abs().log10().floor() as i32 + 1;
    let decimals = (digits - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, v);

    // Rounding can carry into a new leading digit (99.99999 -> 100.0000).
    let carried = text
        .parse::<f64>()
        .map(|r| r.abs() >= 10f64.powi(magnitude))
        .unwrap_or(false);
    if carried && decimals > 0 {
        format!("{:.*}", decimals - 1, v)
    } else {
        text
    }
}

/// A series column: a sequence, or a single scalar when collapsing applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesValues {
    Array(Vec<Option<f64>>),
    Scalar(Option<f64>),
}

impl SeriesValues {
    fn build(values: Vec<Option<f64>>, want_array: bool) -> Self {
        if !want_array && values.len() == 1 {
            SeriesValues::Scalar(values[0])
        } else {
            SeriesValues::Array(values)
        }
    }

    /// The column as a sequence regardless of collapsing.
    pub fn to_vec(&self) -> Vec<Option<f64>> {
        match self {
            SeriesValues::Array(values) => values.clone(),
            SeriesValues::Scalar(value) => vec![*value],
        }
    }
}

/// JSON body of a successful time series response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPayload {
    pub dataset_id: String,
    pub variable_name: String,
    /// Display string of the NODATA sentinel.
    pub nodata: String,
    pub contains_nodata: bool,
    pub start: u64,
    pub end: u64,
    pub values: SeriesValues,
    pub lower_bounds: SeriesValues,
    pub upper_bounds: SeriesValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

/// Renders a [`TimeSeriesResult`] into its output representations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultFormatter {
    number_format: NumberFormat,
}

impl ResultFormatter {
    pub fn new(number_format: NumberFormat) -> Self {
        Self { number_format }
    }

    pub fn number_format(&self) -> NumberFormat {
        self.number_format
    }

    /// Build the response payload.
    ///
    /// With `want_array` false and a single sample, the value and bound
    /// columns collapse to scalars. The CSV table is only rendered when
    /// `want_csv` is set.
    pub fn format(&self, result: &TimeSeriesResult, want_array: bool, want_csv: bool) -> SeriesPayload {
        let values = result.samples.iter().map(|s| s.value().value()).collect();
        let lower_bounds = result
            .samples
            .iter()
            .map(|s| s.bounds().map(|b| b.lower))
            .collect();
        let upper_bounds = result
            .samples
            .iter()
            .map(|s| s.bounds().map(|b| b.upper))
            .collect();

        SeriesPayload {
            dataset_id: result.dataset_id.clone(),
            variable_name: result.variable.clone(),
            nodata: result.nodata_label.clone(),
            contains_nodata: result.contains_nodata,
            start: result.range.start,
            end: result.range.end,
            values: SeriesValues::build(values, want_array),
            lower_bounds: SeriesValues::build(lower_bounds, want_array),
            upper_bounds: SeriesValues::build(upper_bounds, want_array),
            csv: want_csv.then(|| self.csv(result)),
        }
    }

    /// Render the CSV table, one newline-terminated line per sample.
    pub fn csv(&self, result: &TimeSeriesResult) -> String {
        let mut out = format!("index, {}, range -, range +\n", result.variable);
        for sample in &result.samples {
            out.push_str(&self.csv_line(sample));
            out.push('\n');
        }
        out
    }

    fn csv_line(&self, sample: &Sample) -> String {
        match (sample.value().value(), sample.bounds()) {
            (Some(value), Some(bounds)) => format!(
                "{},{},{},{}",
                sample.index(),
                self.number_format.value(value),
                self.number_format.bound(bounds.lower),
                self.number_format.bound(bounds.upper)
            ),
            _ => format!("{},,,", sample.index()),
        }
    }
}
