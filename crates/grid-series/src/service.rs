//! High-level point series service.
//!
//! `SeriesService` ties the pipeline together: catalog lookup, coordinate
//! resolution, range defaulting, extraction and formatting. Transport layers
//! only translate their requests into a [`PointSeriesQuery`].
//!
//! ```rust,ignore
//! let service = SeriesService::new(catalog, ExtractorConfig::default());
//!
//! let query = PointSeriesQuery::new("annual_5x5x5_dataset", "float32_variable", -123.0, 45.0)
//!     .with_range(Some(0), Some(4))
//!     .with_csv(true);
//! let payload = service.query(&query).await?;
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::DatasetCatalog;
use crate::config::ExtractorConfig;
use crate::error::{Result, SeriesError};
use crate::extractor::{TimeSeriesExtractor, TimeSeriesResult};
use crate::format::{ResultFormatter, SeriesPayload};
use crate::resolver::resolve;

/// A point series request in dataset terms.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeriesQuery {
    pub dataset: String,
    pub variable: String,
    pub longitude: f64,
    pub latitude: f64,
    /// First time index; defaults to 0.
    pub start: Option<u64>,
    /// Last time index; defaults to the last step of the variable.
    pub end: Option<u64>,
    pub want_array: bool,
    pub want_csv: bool,
}

impl PointSeriesQuery {
    pub fn new(
        dataset: impl Into<String>,
        variable: impl Into<String>,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            variable: variable.into(),
            longitude,
            latitude,
            start: None,
            end: None,
            want_array: false,
            want_csv: false,
        }
    }

    pub fn with_range(mut self, start: Option<u64>, end: Option<u64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_array(mut self, want_array: bool) -> Self {
        self.want_array = want_array;
        self
    }

    pub fn with_csv(mut self, want_csv: bool) -> Self {
        self.want_csv = want_csv;
        self
    }
}

/// Entry point for point series queries.
pub struct SeriesService {
    catalog: Arc<dyn DatasetCatalog>,
    extractor: TimeSeriesExtractor,
    formatter: ResultFormatter,
}

impl SeriesService {
    pub fn new(catalog: Arc<dyn DatasetCatalog>, config: ExtractorConfig) -> Self {
        let formatter = ResultFormatter::new(config.number_format);
        Self {
            catalog,
            extractor: TimeSeriesExtractor::new(config),
            formatter,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn DatasetCatalog> {
        &self.catalog
    }

    /// Extract the series without formatting it.
    pub async fn extract(&self, query: &PointSeriesQuery) -> Result<TimeSeriesResult> {
        let dataset = self.catalog.dataset(&query.dataset).ok_or_else(|| {
            SeriesError::not_found(format!("dataset '{}' not found", query.dataset))
        })?;

        let source = self
            .catalog
            .variable(&query.dataset, &query.variable)
            .ok_or_else(|| {
                SeriesError::not_found(format!(
                    "variable '{}' not found in dataset '{}'",
                    query.variable, query.dataset
                ))
            })?;

        let cell = resolve(&dataset, query.longitude, query.latitude)?;

        let start = query.start.unwrap_or(0);
        let end = match query.end {
            Some(end) => end,
            None => source.values.time_steps().checked_sub(1).ok_or_else(|| {
                SeriesError::read_failure(format!(
                    "variable '{}' has no time steps",
                    query.variable
                ))
            })?,
        };

        self.extractor
            .extract(&dataset, &query.variable, &source, cell, start, end)
            .await
    }

    /// Extract and format the series.
    pub async fn query(&self, query: &PointSeriesQuery) -> Result<SeriesPayload> {
        let started = Instant::now();
        let result = self.extract(query).await?;
        let payload = self
            .formatter
            .format(&result, query.want_array, query.want_csv);

        tracing::info!(
            dataset = %query.dataset,
            variable = %query.variable,
            start = result.range.start,
            end = result.range.end,
            contains_nodata = result.contains_nodata,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Point series served"
        );

        Ok(payload)
    }
}
