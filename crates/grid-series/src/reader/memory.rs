//! In-memory raster stack.

use async_trait::async_trait;

use crate::error::{Result, SeriesError};
use crate::types::{GridCell, GridExtent};

use super::RasterReader;

/// Raster stack held in memory, laid out `[time][row][column]`.
#[derive(Debug, Clone)]
pub struct MemoryRasterReader {
    data: Vec<f64>,
    time_steps: u64,
    extent: GridExtent,
}

impl MemoryRasterReader {
    /// Create a stack from values in `[time][row][column]` order.
    pub fn new(data: Vec<f64>, time_steps: u64, extent: GridExtent) -> Result<Self> {
        let expected = time_steps as usize * extent.len();
        if data.len() != expected {
            return Err(SeriesError::read_failure(format!(
                "stack of {} steps x {} needs {} values, got {}",
                time_steps,
                extent,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            time_steps,
            extent,
        })
    }

    /// Create a stack from `f32` values, widening each one.
    pub fn from_f32(data: &[f32], time_steps: u64, extent: GridExtent) -> Result<Self> {
        Self::new(
            data.iter().map(|&v| v as f64).collect(),
            time_steps,
            extent,
        )
    }
}

#[async_trait]
impl RasterReader for MemoryRasterReader {
    async fn read_value(&self, time_index: u64, cell: GridCell) -> Result<f64> {
        if time_index >= self.time_steps {
            return Err(SeriesError::TimeIndexOutOfRange {
                index: time_index,
                available: self.time_steps,
            });
        }
        if !self.extent.contains(cell) {
            return Err(SeriesError::read_failure(format!(
                "cell {:?} is outside the layer extent {}",
                cell, self.extent
            )));
        }

        let offset = time_index as usize * self.extent.len()
            + cell.row * self.extent.columns
            + cell.column;
        Ok(self.data[offset])
    }

    fn time_steps(&self) -> u64 {
        self.time_steps
    }

    fn extent(&self) -> GridExtent {
        self.extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader() -> MemoryRasterReader {
        // value = t * 100 + row * 10 + column
        let extent = GridExtent::new(2, 3);
        let data = (0..4u64)
            .flat_map(|t| {
                (0..2).flat_map(move |r| (0..3).map(move |c| (t * 100 + r * 10 + c) as f64))
            })
            .collect();
        MemoryRasterReader::new(data, 4, extent).unwrap()
    }

    #[tokio::test]
    async fn test_read_value_layout() {
        let reader = reader();
        assert_eq!(reader.read_value(0, GridCell::new(0, 0)).await.unwrap(), 0.0);
        assert_eq!(reader.read_value(2, GridCell::new(1, 2)).await.unwrap(), 212.0);
        assert_eq!(reader.read_value(3, GridCell::new(0, 1)).await.unwrap(), 301.0);
    }

    #[tokio::test]
    async fn test_time_index_out_of_range() {
        let err = reader()
            .read_value(4, GridCell::new(0, 0))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SeriesError::TimeIndexOutOfRange {
                index: 4,
                available: 4
            }
        );
    }

    #[tokio::test]
    async fn test_cell_outside_extent() {
        let err = reader()
            .read_value(0, GridCell::new(2, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, SeriesError::ReadFailure(_)));
    }

    #[test]
    fn test_length_mismatch() {
        let result = MemoryRasterReader::new(vec![0.0; 5], 1, GridExtent::new(2, 3));
        assert!(result.is_err());
    }
}
