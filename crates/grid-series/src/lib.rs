//! Point time series extraction from gridded raster stacks.
//!
//! Given a dataset, a variable and a geographic point, this crate resolves the
//! grid cell that contains the point and reads the cell's value at every time
//! step of an index range, together with uncertainty bounds.
//!
//! # Architecture
//!
//! ```text
//! PointSeriesQuery
//!      │
//!      ▼
//! SeriesService::query
//!      │
//!      ├─► DatasetCatalog lookup (dataset, variable readers)
//!      │
//!      ├─► resolve(lon, lat) ──► GridCell (affine inverse, half-open bounds)
//!      │
//!      ├─► TimeSeriesExtractor::extract
//!      │         │
//!      │         ├─► RasterReader::read_value per step (bounded concurrency)
//!      │         ├─► NODATA classification
//!      │         └─► value ± delta
//!      │
//!      └─► ResultFormatter ──► SeriesPayload (JSON columns, optional CSV)
//! ```
//!
//! Raster stacks are Zarr V3 arrays shaped `[time, rows, columns]`, read one
//! element at a time through [`ZarrRasterReader`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod extractor;
pub mod format;
pub mod nodata;
pub mod reader;
pub mod resolver;
pub mod service;
pub mod testdata;
pub mod types;
pub mod uncertainty;

// Re-export commonly used types at crate root
pub use catalog::{DatasetCatalog, StaticCatalog, VariableSource};
pub use config::ExtractorConfig;
pub use error::{Result, SeriesError};
pub use extractor::{Sample, TimeSeriesExtractor, TimeSeriesResult};
pub use format::{NumberFormat, ResultFormatter, SeriesPayload, SeriesValues};
pub use nodata::{is_nodata, SampleValue};
pub use reader::{MemoryRasterReader, RasterReader, ZarrRasterReader};
pub use resolver::resolve;
pub use service::{PointSeriesQuery, SeriesService};
pub use types::{Dataset, GeoTransform, GridCell, GridExtent, IndexRange, UncertaintySpec};
pub use uncertainty::{bounds, Bounds};
