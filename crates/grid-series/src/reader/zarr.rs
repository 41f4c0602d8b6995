//! Zarr V3 raster stack reader.

use std::sync::Arc;

use async_trait::async_trait;
use zarrs::array::{Array, DataType};
use zarrs::array_subset::ArraySubset;
use zarrs::storage::ReadableStorageTraits;

use crate::error::{Result, SeriesError};
use crate::types::{GridCell, GridExtent};

use super::RasterReader;

/// Reads single cells from a Zarr array shaped `[time, rows, columns]`.
///
/// Each read fetches only the chunk holding the requested cell. Reads run on
/// the blocking thread pool so that concurrent steps overlap their I/O.
pub struct ZarrRasterReader<S: ReadableStorageTraits> {
    /// The Zarr array.
    array: Arc<Array<S>>,
    /// Storage path (for log messages).
    path: String,
    time_steps: u64,
    extent: GridExtent,
}

impl<S: ReadableStorageTraits + Send + Sync + 'static> ZarrRasterReader<S> {
    /// Open a Zarr array from storage.
    ///
    /// # Arguments
    /// * `storage` - The storage backend
    /// * `path` - Path to the Zarr array inside the store
    pub fn open(storage: S, path: &str) -> Result<Self> {
        let array = Array::open(Arc::new(storage), path)
            .map_err(|e| SeriesError::read_failure(format!("failed to open {}: {}", path, e)))?;

        let shape = array.shape().to_vec();
        if shape.len() != 3 {
            return Err(SeriesError::read_failure(format!(
                "{} must have 3 dimensions [time, rows, columns], found {:?}",
                path, shape
            )));
        }

        match array.data_type() {
            DataType::Float32 | DataType::Float64 => {}
            other => {
                return Err(SeriesError::read_failure(format!(
                    "{} has unsupported data type {:?}",
                    path, other
                )))
            }
        }

        tracing::debug!(path = %path, shape = ?shape, "Opened raster stack");

        Ok(Self {
            array: Arc::new(array),
            path: path.to_string(),
            time_steps: shape[0],
            extent: GridExtent::new(shape[1] as usize, shape[2] as usize),
        })
    }

    /// Read one element (synchronous).
    fn read_sync(array: &Array<S>, time_index: u64, cell: GridCell) -> Result<f64> {
        let subset = ArraySubset::new_with_start_shape(
            vec![time_index, cell.row as u64, cell.column as u64],
            vec![1, 1, 1],
        )
        .map_err(|e| SeriesError::read_failure(e.to_string()))?;

        let value = match array.data_type() {
            DataType::Float64 => {
                let data: Vec<f64> = array
                    .retrieve_array_subset_elements(&subset)
                    .map_err(|e| SeriesError::read_failure(e.to_string()))?;
                data.first().copied()
            }
            _ => {
                let data: Vec<f32> = array
                    .retrieve_array_subset_elements(&subset)
                    .map_err(|e| SeriesError::read_failure(e.to_string()))?;
                data.first().map(|&v| v as f64)
            }
        };

        value.ok_or_else(|| SeriesError::read_failure("empty read"))
    }
}

#[async_trait]
impl<S: ReadableStorageTraits + Send + Sync + 'static> RasterReader for ZarrRasterReader<S> {
    async fn read_value(&self, time_index: u64, cell: GridCell) -> Result<f64> {
        if time_index >= self.time_steps {
            return Err(SeriesError::TimeIndexOutOfRange {
                index: time_index,
                available: self.time_steps,
            });
        }
        if !self.extent.contains(cell) {
            return Err(SeriesError::read_failure(format!(
                "cell {:?} is outside {} ({})",
                cell, self.path, self.extent
            )));
        }

        let array = Arc::clone(&self.array);
        tokio::task::spawn_blocking(move || Self::read_sync(&array, time_index, cell))
            .await
            .map_err(|e| SeriesError::read_failure(format!("read task failed: {}", e)))?
            .map_err(|e| {
                tracing::warn!(
                    path = %self.path,
                    time_index,
                    row = cell.row,
                    column = cell.column,
                    error = %e,
                    "Raster read failed"
                );
                e
            })
    }

    fn time_steps(&self) -> u64 {
        self.time_steps
    }

    fn extent(&self) -> GridExtent {
        self.extent
    }
}
