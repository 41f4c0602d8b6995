//! Dataset catalog abstraction.
//!
//! The catalog is the read-only registry the extraction pipeline borrows
//! dataset metadata and raster readers from. It is loaded once and shared by
//! all requests without locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SeriesError};
use crate::reader::RasterReader;
use crate::types::{Dataset, UncertaintySpec};

/// Raster readers of one variable.
#[derive(Clone)]
pub struct VariableSource {
    /// Per-step values of the variable.
    pub values: Arc<dyn RasterReader>,
    /// Per-step deltas, required when the variable uses
    /// [`UncertaintySpec::Layer`].
    pub uncertainty: Option<Arc<dyn RasterReader>>,
}

impl VariableSource {
    pub fn new(values: Arc<dyn RasterReader>) -> Self {
        Self {
            values,
            uncertainty: None,
        }
    }

    /// Attach a companion uncertainty layer.
    pub fn with_uncertainty_layer(mut self, layer: Arc<dyn RasterReader>) -> Self {
        self.uncertainty = Some(layer);
        self
    }
}

impl std::fmt::Debug for VariableSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableSource")
            .field("time_steps", &self.values.time_steps())
            .field("extent", &self.values.extent())
            .field("uncertainty_layer", &self.uncertainty.is_some())
            .finish()
    }
}

/// Read-only lookup of datasets and their variables.
pub trait DatasetCatalog: Send + Sync {
    /// Find a dataset by id.
    fn dataset(&self, id: &str) -> Option<Arc<Dataset>>;

    /// Find the readers of a variable.
    fn variable(&self, dataset_id: &str, variable: &str) -> Option<VariableSource>;

    /// Ids of all datasets, sorted.
    fn dataset_ids(&self) -> Vec<String>;
}

/// Catalog held entirely in memory.
#[derive(Default)]
pub struct StaticCatalog {
    datasets: HashMap<String, Arc<Dataset>>,
    sources: HashMap<(String, String), VariableSource>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset together with the readers of its variables.
    ///
    /// Every variable declared in the dataset must have a source whose extent
    /// matches the dataset grid, and layer-based uncertainty must come with a
    /// layer reader of the same shape.
    pub fn insert(
        &mut self,
        dataset: Dataset,
        sources: HashMap<String, VariableSource>,
    ) -> Result<()> {
        for (name, spec) in &dataset.variables {
            let source = sources.get(name).ok_or_else(|| {
                SeriesError::not_found(format!(
                    "no raster source for variable '{}' of dataset '{}'",
                    name, dataset.id
                ))
            })?;

            if source.values.extent() != dataset.extent {
                return Err(SeriesError::invalid_geotransform(format!(
                    "variable '{}' has extent {} but dataset '{}' declares {}",
                    name,
                    source.values.extent(),
                    dataset.id,
                    dataset.extent
                )));
            }

            match (spec, &source.uncertainty) {
                (UncertaintySpec::Layer, None) => {
                    return Err(SeriesError::invalid_uncertainty(format!(
                        "variable '{}' of dataset '{}' needs an uncertainty layer",
                        name, dataset.id
                    )));
                }
                (UncertaintySpec::Layer, Some(layer)) => {
                    if layer.extent() != source.values.extent()
                        || layer.time_steps() != source.values.time_steps()
                    {
                        return Err(SeriesError::invalid_uncertainty(format!(
                            "uncertainty layer of '{}' does not match its values",
                            name
                        )));
                    }
                }
                (UncertaintySpec::Constant { .. }, _) => {}
            }
        }

        let id = dataset.id.clone();
        for (name, source) in sources {
            self.sources.insert((id.clone(), name), source);
        }
        self.datasets.insert(id, Arc::new(dataset));
        Ok(())
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl DatasetCatalog for StaticCatalog {
    fn dataset(&self, id: &str) -> Option<Arc<Dataset>> {
        self.datasets.get(id).cloned()
    }

    fn variable(&self, dataset_id: &str, variable: &str) -> Option<VariableSource> {
        self.sources
            .get(&(dataset_id.to_string(), variable.to_string()))
            .cloned()
    }

    fn dataset_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.datasets.keys().cloned().collect();
        ids.sort();
        ids
    }
}
