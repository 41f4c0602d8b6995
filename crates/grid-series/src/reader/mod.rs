//! Raster reader trait and implementations.

mod memory;
mod zarr;

pub use memory::MemoryRasterReader;
pub use zarr::ZarrRasterReader;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GridCell, GridExtent};

/// Read access to a stack of per-time-step raster layers.
///
/// Implementations own their file handles and caches; the extractor treats
/// a reader as a stateless read function and may call it concurrently.
#[async_trait]
pub trait RasterReader: Send + Sync {
    /// Read the raw value of one cell at one time step.
    ///
    /// # Errors
    /// * `TimeIndexOutOfRange` if `time_index` is past the temporal axis
    /// * `ReadFailure` if the underlying storage fails
    async fn read_value(&self, time_index: u64, cell: GridCell) -> Result<f64>;

    /// Number of time steps in the stack.
    fn time_steps(&self) -> u64;

    /// Spatial extent of every layer.
    fn extent(&self) -> GridExtent;
}
