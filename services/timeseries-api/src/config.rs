//! Dataset catalog configuration loading and types.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use grid_series::{
    Dataset, GeoTransform, GridExtent, StaticCatalog, UncertaintySpec, VariableSource,
    ZarrRasterReader,
};
use zarrs_filesystem::FilesystemStore;

/// Dataset definitions loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub datasets: Vec<DatasetDefinition>,
}

impl CatalogConfig {
    /// Load configuration from a directory of YAML files, one dataset per file.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref();

        // If directory doesn't exist, return an empty catalog
        if !path.exists() {
            tracing::warn!(
                "Dataset config directory {} does not exist, serving no datasets",
                path.display()
            );
            return Ok(Self::default());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)
            .with_context(|| format!("Failed to read directory: {}", path.display()))?
        {
            let file_path = entry?.path();
            if let Some(ext) = file_path.extension() {
                if ext == "yaml" || ext == "yml" {
                    files.push(file_path);
                }
            }
        }
        files.sort();

        let mut datasets: Vec<DatasetDefinition> = Vec::with_capacity(files.len());
        for file_path in files {
            let content = std::fs::read_to_string(&file_path)
                .with_context(|| format!("Failed to read: {:?}", file_path))?;
            let definition: DatasetDefinition = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse: {:?}", file_path))?;

            if datasets.iter().any(|d| d.id == definition.id) {
                bail!("Duplicate dataset id '{}' in {:?}", definition.id, file_path);
            }

            tracing::info!(
                dataset = %definition.id,
                variables = definition.variables.len(),
                "Loaded dataset definition from {:?}",
                file_path
            );
            datasets.push(definition);
        }

        Ok(Self { datasets })
    }

    /// Open the raster stacks of every dataset under `data_dir`.
    pub fn build_catalog(&self, data_dir: impl AsRef<Path>) -> Result<StaticCatalog> {
        let data_dir = data_dir.as_ref();
        let mut catalog = StaticCatalog::new();

        for definition in &self.datasets {
            let dataset = definition.to_dataset()?;

            let mut sources = HashMap::new();
            for variable in &definition.variables {
                let values = open_stack(&data_dir.join(&variable.path))?;
                let mut source = VariableSource::new(values);
                if let Some(layer) = &variable.uncertainty.layer {
                    source = source.with_uncertainty_layer(open_stack(&data_dir.join(layer))?);
                }
                sources.insert(variable.name.clone(), source);
            }

            catalog
                .insert(dataset, sources)
                .with_context(|| format!("Invalid dataset '{}'", definition.id))?;
        }

        tracing::info!(datasets = catalog.len(), "Dataset catalog ready");
        Ok(catalog)
    }

    /// Find a dataset definition by ID.
    pub fn find_dataset(&self, id: &str) -> Option<&DatasetDefinition> {
        self.datasets.iter().find(|d| d.id == id)
    }
}

fn open_stack(path: &Path) -> Result<Arc<ZarrRasterReader<FilesystemStore>>> {
    let store = FilesystemStore::new(path)
        .with_context(|| format!("Failed to open Zarr store: {}", path.display()))?;
    let reader = ZarrRasterReader::open(store, "/")
        .with_context(|| format!("Failed to open raster stack: {}", path.display()))?;
    Ok(Arc::new(reader))
}

/// Definition of one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// Unique dataset identifier.
    pub id: String,

    /// GDAL geotransform coefficients.
    pub geotransform: [f64; 6],

    pub rows: usize,

    pub columns: usize,

    /// NODATA sentinel.
    #[serde(default)]
    pub nodata: NodataValue,

    /// Variables of this dataset.
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
}

impl DatasetDefinition {
    /// Build the dataset metadata.
    pub fn to_dataset(&self) -> Result<Dataset> {
        let mut dataset = Dataset::new(
            self.id.clone(),
            GeoTransform::from_gdal(self.geotransform),
            GridExtent::new(self.rows, self.columns),
        )
        .with_nodata(self.nodata.to_f64()?);

        for variable in &self.variables {
            let spec = variable
                .uncertainty
                .to_spec()
                .with_context(|| format!("Variable '{}' of '{}'", variable.name, self.id))?;
            dataset = dataset.with_variable(variable.name.clone(), spec);
        }

        Ok(dataset)
    }
}

/// NODATA sentinel as written in YAML: a number, or `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodataValue {
    Number(f64),
    Text(String),
}

impl Default for NodataValue {
    fn default() -> Self {
        Self::Text("NaN".to_string())
    }
}

impl NodataValue {
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Text(s) => match s.trim().to_lowercase().as_str() {
                "nan" | ".nan" => Ok(f64::NAN),
                other => other
                    .parse()
                    .with_context(|| format!("Invalid nodata value: {}", s)),
            },
        }
    }
}

/// Definition of one variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,

    /// Path of the values array, relative to the data directory.
    pub path: String,

    #[serde(default)]
    pub uncertainty: UncertaintyDefinition,
}

/// Where the delta of a variable comes from. Neither set means exact values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UncertaintyDefinition {
    /// Constant delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,

    /// Path of the companion uncertainty array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl UncertaintyDefinition {
    pub fn to_spec(&self) -> Result<UncertaintySpec> {
        match (self.delta, &self.layer) {
            (Some(_), Some(_)) => bail!("uncertainty sets both delta and layer"),
            (Some(delta), None) => Ok(UncertaintySpec::constant(delta)?),
            (None, Some(_)) => Ok(UncertaintySpec::Layer),
            (None, None) => Ok(UncertaintySpec::exact()),
        }
    }
}
