//! Application state for the time series API.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::Arc;

use grid_series::{ExtractorConfig, SeriesService};
use timeseries_protocol::{DEFAULT_BASE_PATH, SERVICE_NAME};

use crate::config::CatalogConfig;

/// Shared application state.
pub struct AppState {
    /// Point series extraction over the dataset catalog.
    pub service: SeriesService,

    /// Prefix of the API routes.
    pub base_path: String,

    /// Name reported by the status endpoint.
    pub service_name: String,

    /// Prometheus recorder handle; `None` when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: SeriesService) -> Self {
        Self {
            service,
            base_path: DEFAULT_BASE_PATH.to_string(),
            service_name: SERVICE_NAME.to_string(),
            prometheus: None,
        }
    }

    /// Load dataset definitions from `config_dir` and open their raster
    /// stacks under `data_dir`.
    pub fn from_dirs(
        config_dir: impl AsRef<Path>,
        data_dir: impl AsRef<Path>,
        extractor: ExtractorConfig,
    ) -> Result<Self> {
        extractor
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid extractor config: {}", e))?;

        let config = CatalogConfig::load_from_dir(config_dir)?;
        let catalog = config.build_catalog(data_dir)?;

        Ok(Self::new(SeriesService::new(Arc::new(catalog), extractor)))
    }

    /// Set the route prefix, normalized to a leading and no trailing slash.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_matches('/');
        self.base_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        };
        self
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
