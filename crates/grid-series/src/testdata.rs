//! Test data generation utilities.
//!
//! Writes small raster stacks as Zarr V3 arrays shaped `[time, rows, columns]`
//! with one chunk per time step, matching the layout [`ZarrRasterReader`]
//! expects.
//!
//! [`ZarrRasterReader`]: crate::reader::ZarrRasterReader

use std::path::Path;
use std::sync::Arc;

use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

/// Write a `[time, rows, columns]` float32 stack into `path`.
///
/// `data` is laid out `[time][row][column]`.
pub fn write_stack_zarr(
    path: &Path,
    data: &[f32],
    time_steps: usize,
    rows: usize,
    columns: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let expected = time_steps * rows * columns;
    if data.len() != expected {
        return Err(format!("expected {} values, got {}", expected, data.len()).into());
    }

    std::fs::create_dir_all(path)?;
    let store = Arc::new(FilesystemStore::new(path)?);

    let shape = vec![time_steps as u64, rows as u64, columns as u64];
    let array = ArrayBuilder::new(
        shape.clone(),
        DataType::Float32,
        vec![1, rows as u64, columns as u64].try_into()?,
        FillValue::from(f32::NAN),
    )
    .build(store.clone(), "/")?;

    array.store_metadata()?;

    let subset = ArraySubset::new_with_start_shape(vec![0, 0, 0], shape)?;
    array.store_array_subset_elements(&subset, data)?;

    Ok(())
}

/// Write a `[time, 1, 1]` stack holding a single cell's series.
pub fn write_series_zarr(path: &Path, series: &[f32]) -> Result<(), Box<dyn std::error::Error>> {
    write_stack_zarr(path, series, series.len(), 1, 1)
}
