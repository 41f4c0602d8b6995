//! Coordinate to grid cell resolution.

use crate::error::{Result, SeriesError};
use crate::types::{Dataset, GridCell};

/// Resolve a `(longitude, latitude)` pair to the grid cell containing it.
///
/// The north-west edges of a cell belong to that cell; points on the
/// south or east edge of the whole grid fall outside it.
pub fn resolve(dataset: &Dataset, longitude: f64, latitude: f64) -> Result<GridCell> {
    if !longitude.is_finite() {
        return Err(SeriesError::invalid_parameter(format!(
            "longitude must be a finite number, got {}",
            longitude
        )));
    }
    if !latitude.is_finite() {
        return Err(SeriesError::invalid_parameter(format!(
            "latitude must be a finite number, got {}",
            latitude
        )));
    }

    let extent = dataset.extent;
    if extent.is_empty() {
        return Err(SeriesError::invalid_geotransform(format!(
            "dataset '{}' has an empty grid ({})",
            dataset.id, extent
        )));
    }

    let (column, row) = dataset.geotransform.invert(longitude, latitude)?;

    let inside = (0.0..extent.columns as f64).contains(&column)
        && (0.0..extent.rows as f64).contains(&row);
    if !inside {
        return Err(SeriesError::OutOfBounds {
            lon: longitude,
            lat: latitude,
            extent: extent.to_string(),
        });
    }

    let cell = GridCell::new(row.floor() as usize, column.floor() as usize);

    tracing::trace!(
        dataset = %dataset.id,
        longitude,
        latitude,
        row = cell.row,
        column = cell.column,
        "Resolved coordinate to grid cell"
    );

    Ok(cell)
}
