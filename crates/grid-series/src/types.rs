//! Core types for point series extraction.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeriesError};

/// GDAL-style affine geotransform.
///
/// Maps a fractional `(column, row)` position to `(x, y)`:
///
/// ```text
/// x = origin_x + column * pixel_width + row * row_rotation
/// y = origin_y + column * column_rotation + row * pixel_height
/// ```
///
/// For north-up grids the rotation terms are zero and `pixel_height` is
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub column_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a north-up transform from its origin and (positive) pixel size.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            column_rotation: 0.0,
            pixel_height: -pixel_height,
        }
    }

    /// Create from the six GDAL coefficients.
    pub fn from_gdal(coefficients: [f64; 6]) -> Self {
        Self::from(coefficients)
    }

    /// Return the six GDAL coefficients.
    pub fn to_gdal(&self) -> [f64; 6] {
        (*self).into()
    }

    /// Determinant of the linear part of the transform.
    pub fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.column_rotation
    }

    /// Map a fractional `(column, row)` grid position to `(x, y)`.
    pub fn apply(&self, column: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + column * self.pixel_width + row * self.row_rotation,
            self.origin_y + column * self.column_rotation + row * self.pixel_height,
        )
    }

    /// Map `(x, y)` to a fractional `(column, row)` grid position.
    pub fn invert(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if !self.to_gdal().iter().all(|c| c.is_finite()) {
            return Err(SeriesError::invalid_geotransform(format!(
                "non-finite coefficient in {:?}",
                self.to_gdal()
            )));
        }

        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(SeriesError::invalid_geotransform(format!(
                "transform {:?} is singular",
                self.to_gdal()
            )));
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        let column = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (self.pixel_width * dy - self.column_rotation * dx) / det;
        Ok((column, row))
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(c: [f64; 6]) -> Self {
        Self {
            origin_x: c[0],
            pixel_width: c[1],
            row_rotation: c[2],
            origin_y: c[3],
            column_rotation: c[4],
            pixel_height: c[5],
        }
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(t: GeoTransform) -> Self {
        [
            t.origin_x,
            t.pixel_width,
            t.row_rotation,
            t.origin_y,
            t.column_rotation,
            t.pixel_height,
        ]
    }
}

/// Number of rows and columns in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtent {
    pub rows: usize,
    pub columns: usize,
}

impl GridExtent {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Check if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Check if a cell lies inside the grid.
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.row < self.rows && cell.column < self.columns
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }
}

impl fmt::Display for GridExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.rows, self.columns)
    }
}

/// A grid cell addressed by row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Symmetric absolute uncertainty of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintySpec {
    /// The same delta for every sample.
    Constant { delta: f64 },
    /// The delta of each sample is read from a companion layer at the same
    /// cell and time step.
    Layer,
}

impl UncertaintySpec {
    /// Create a constant spec, rejecting negative or non-finite deltas.
    pub fn constant(delta: f64) -> Result<Self> {
        validate_delta(delta)?;
        Ok(Self::Constant { delta })
    }

    /// A spec whose bounds equal the value.
    pub fn exact() -> Self {
        Self::Constant { delta: 0.0 }
    }
}

/// Check the `delta >= 0` invariant.
pub fn validate_delta(delta: f64) -> Result<f64> {
    if !delta.is_finite() || delta < 0.0 {
        return Err(SeriesError::invalid_uncertainty(format!(
            "delta must be finite and non-negative, got {}",
            delta
        )));
    }
    Ok(delta)
}

/// Immutable metadata of a gridded dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Dataset identifier.
    pub id: String,
    /// Affine mapping between coordinates and grid positions.
    pub geotransform: GeoTransform,
    /// Grid extent.
    pub extent: GridExtent,
    /// NODATA sentinel, canonically NaN.
    pub nodata: f64,
    /// Uncertainty specification per variable.
    pub variables: HashMap<String, UncertaintySpec>,
}

impl Dataset {
    /// Create a dataset with no variables and a NaN sentinel.
    pub fn new(id: impl Into<String>, geotransform: GeoTransform, extent: GridExtent) -> Self {
        Self {
            id: id.into(),
            geotransform,
            extent,
            nodata: f64::NAN,
            variables: HashMap::new(),
        }
    }

    /// Set the NODATA sentinel.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = nodata;
        self
    }

    /// Add a variable.
    pub fn with_variable(mut self, name: impl Into<String>, spec: UncertaintySpec) -> Self {
        self.variables.insert(name.into(), spec);
        self
    }

    /// Look up the uncertainty spec of a variable.
    pub fn uncertainty(&self, variable: &str) -> Result<&UncertaintySpec> {
        self.variables.get(variable).ok_or_else(|| {
            SeriesError::not_found(format!(
                "variable '{}' in dataset '{}'",
                variable, self.id
            ))
        })
    }

    /// Display string of the NODATA sentinel (e.g. `"NaN"`, `"-9999"`).
    pub fn nodata_label(&self) -> String {
        self.nodata.to_string()
    }
}

/// Inclusive range of time step indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: u64,
    pub end: u64,
}

impl IndexRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start > end {
            return Err(SeriesError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of steps in the range, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        usize::try_from(self.end - self.start)
            .map_or(usize::MAX, |span| span.saturating_add(1))
    }

    /// Always false; a valid range holds at least one step.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the indices in order.
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        self.start..=self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geotransform_round_trips_gdal_order() {
        let coefficients = [-123.0, 1.0, 0.0, 45.0, 0.0, -2.0];
        let transform = GeoTransform::from_gdal(coefficients);
        assert_eq!(transform.origin_x, -123.0);
        assert_eq!(transform.pixel_height, -2.0);
        assert_eq!(transform.to_gdal(), coefficients);
    }

    #[test]
    fn test_geotransform_corners() {
        let transform = GeoTransform::north_up(-123.0, 45.0, 1.0, 2.0);
        assert_eq!(transform.apply(0.0, 0.0), (-123.0, 45.0));
        assert_eq!(transform.apply(5.0, 0.0), (-118.0, 45.0));
        assert_eq!(transform.apply(5.0, 4.0), (-118.0, 37.0));
        assert_eq!(transform.apply(2.5, 2.0), (-120.5, 41.0));
    }

    #[test]
    fn test_geotransform_invert() {
        let transform = GeoTransform::north_up(-123.0, 45.0, 1.0, 2.0);
        let (column, row) = transform.invert(-120.5, 41.0).unwrap();
        assert!((column - 2.5).abs() < 1e-12);
        assert!((row - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_geotransform() {
        let transform = GeoTransform::from_gdal([0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(
            transform.invert(0.5, 0.5),
            Err(SeriesError::InvalidGeotransform(_))
        ));
    }

    #[test]
    fn test_geotransform_yaml_as_array() {
        let transform: GeoTransform =
            serde_yaml::from_str("[-123.0, 1.0, 0.0, 45.0, 0.0, -1.0]").unwrap();
        assert_eq!(transform, GeoTransform::north_up(-123.0, 45.0, 1.0, 1.0));
    }

    #[test]
    fn test_uncertainty_constant_rejects_negative() {
        assert!(UncertaintySpec::constant(-0.1).is_err());
        assert!(UncertaintySpec::constant(f64::NAN).is_err());
        assert_eq!(
            UncertaintySpec::constant(0.0).unwrap(),
            UncertaintySpec::exact()
        );
    }

    #[test]
    fn test_nodata_label() {
        let dataset = Dataset::new(
            "d",
            GeoTransform::north_up(0.0, 0.0, 1.0, 1.0),
            GridExtent::new(1, 1),
        );
        assert_eq!(dataset.nodata_label(), "NaN");
        assert_eq!(dataset.with_nodata(-9999.0).nodata_label(), "-9999");
    }

    #[test]
    fn test_unknown_variable() {
        let dataset = Dataset::new(
            "d",
            GeoTransform::north_up(0.0, 0.0, 1.0, 1.0),
            GridExtent::new(1, 1),
        )
        .with_variable("v", UncertaintySpec::exact());
        assert!(dataset.uncertainty("v").is_ok());
        assert!(matches!(
            dataset.uncertainty("w"),
            Err(SeriesError::NotFound(_))
        ));
    }

    #[test]
    fn test_index_range() {
        let range = IndexRange::new(2, 6).unwrap();
        assert_eq!(range.len(), 5);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
        assert_eq!(IndexRange::new(3, 3).unwrap().len(), 1);
        assert_eq!(
            IndexRange::new(4, 1),
            Err(SeriesError::InvalidRange { start: 4, end: 1 })
        );
    }

    #[test]
    fn test_full_u64_range_len_saturates() {
        let range = IndexRange::new(0, u64::MAX).unwrap();
        assert_eq!(range.len(), usize::MAX);
        assert!(!range.is_empty());
        assert_eq!(IndexRange::new(1, u64::MAX).unwrap().len(), usize::MAX);
    }
}
