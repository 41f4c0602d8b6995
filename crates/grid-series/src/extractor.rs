//! Point time series extraction.
//!
//! ```text
//! [start ..= end]
//!      │
//!      ├─► read_value(t, cell)   ┐
//!      ├─► read_value(t+1, cell) ├─ up to `max_concurrent_reads` in flight
//!      ├─► ...                   ┘
//!      │
//!      ├─► classify against the NODATA sentinel
//!      ├─► value ± delta for valid samples
//!      │
//!      └─► gather by position, not by completion order
//! ```

use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};

use crate::catalog::VariableSource;
use crate::config::ExtractorConfig;
use crate::error::{Result, SeriesError};
use crate::nodata::{is_nodata, SampleValue};
use crate::reader::RasterReader;
use crate::types::{validate_delta, Dataset, GridCell, IndexRange, UncertaintySpec};
use crate::uncertainty::{bounds, Bounds};

/// One time step of an extracted series.
///
/// The value and its bounds are either both present or both absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    index: u64,
    value: SampleValue,
    bounds: Option<Bounds>,
}

impl Sample {
    /// A valid sample with bounds `value ± delta`.
    pub fn valid(index: u64, value: f64, delta: f64) -> Self {
        Self {
            index,
            value: SampleValue::Valid(value),
            bounds: Some(bounds(value, delta)),
        }
    }

    /// A NODATA sample.
    pub fn nodata(index: u64) -> Self {
        Self {
            index,
            value: SampleValue::NoData,
            bounds: None,
        }
    }

    /// Time step index.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn value(&self) -> SampleValue {
        self.value
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn is_nodata(&self) -> bool {
        self.value.is_nodata()
    }
}

/// Ordered samples of one variable at one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesResult {
    pub dataset_id: String,
    pub variable: String,
    pub range: IndexRange,
    /// `samples[i]` holds time index `range.start + i`.
    pub samples: Vec<Sample>,
    /// Display string of the dataset's NODATA sentinel.
    pub nodata_label: String,
    /// True iff any sample is NODATA.
    pub contains_nodata: bool,
}

/// Where the delta of a valid sample comes from.
enum DeltaSource<'a> {
    Constant(f64),
    Layer(&'a Arc<dyn RasterReader>),
}

/// Extracts per-step samples and their uncertainty bounds.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesExtractor {
    config: ExtractorConfig,
}

impl TimeSeriesExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract `[start, end]` of `variable` at `cell`.
    ///
    /// Reads are issued concurrently and gathered in index order. The first
    /// failing read aborts the extraction and cancels the reads still in
    /// flight; a failure is never reported as NODATA.
    pub async fn extract(
        &self,
        dataset: &Dataset,
        variable: &str,
        source: &VariableSource,
        cell: GridCell,
        start: u64,
        end: u64,
    ) -> Result<TimeSeriesResult> {
        let range = IndexRange::new(start, end)?;

        let delta = match dataset.uncertainty(variable)? {
            UncertaintySpec::Constant { delta } => DeltaSource::Constant(validate_delta(*delta)?),
            UncertaintySpec::Layer => {
                DeltaSource::Layer(source.uncertainty.as_ref().ok_or_else(|| {
                    SeriesError::invalid_uncertainty(format!(
                        "no uncertainty layer for variable '{}'",
                        variable
                    ))
                })?)
            }
        };

        tracing::debug!(
            dataset = %dataset.id,
            variable,
            row = cell.row,
            column = cell.column,
            start,
            end,
            "Extracting {} time steps",
            range.len()
        );

        let sentinel = dataset.nodata;
        let samples: Vec<Sample> = stream::iter(range.iter())
            .map(|index| read_sample(source, &delta, sentinel, cell, index))
            .buffered(self.config.max_concurrent_reads.max(1))
            .try_collect()
            .await?;

        let contains_nodata = samples.iter().any(Sample::is_nodata);

        tracing::debug!(
            dataset = %dataset.id,
            variable,
            samples = samples.len(),
            contains_nodata,
            "Extraction complete"
        );

        Ok(TimeSeriesResult {
            dataset_id: dataset.id.clone(),
            variable: variable.to_string(),
            range,
            samples,
            nodata_label: dataset.nodata_label(),
            contains_nodata,
        })
    }
}

async fn read_sample(
    source: &VariableSource,
    delta: &DeltaSource<'_>,
    sentinel: f64,
    cell: GridCell,
    index: u64,
) -> Result<Sample> {
    let raw = source.values.read_value(index, cell).await?;

    let value = match SampleValue::classify(raw, sentinel) {
        SampleValue::NoData => return Ok(Sample::nodata(index)),
        SampleValue::Valid(value) => value,
    };

    let delta = match delta {
        DeltaSource::Constant(delta) => *delta,
        DeltaSource::Layer(layer) => {
            let delta = layer.read_value(index, cell).await?;
            if is_nodata(delta, sentinel) {
                return Err(SeriesError::invalid_uncertainty(format!(
                    "uncertainty is NODATA at time index {} for a valid value",
                    index
                )));
            }
            validate_delta(delta)?
        }
    };

    Ok(Sample::valid(index, value, delta))
}
