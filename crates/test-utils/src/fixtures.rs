//! Common test fixtures for time series tests.

/// The annual 5x5x5 dataset: 5 yearly steps over a 5x5 grid of 1 degree
/// pixels with its north-west corner at (-123, 45).
///
/// Values follow `(t + 1) * 100 + row * 10 + col * 1.1` and the companion
/// uncertainty layer `(t + 1) * 10 + row + col * 0.1`. Cell (2, 4) is NODATA
/// in both at step 2.
pub mod annual {
    use crate::generators::{create_stack_with, punch_holes};

    pub const DATASET_ID: &str = "annual_5x5x5_dataset";

    pub const VARIABLE: &str = "float32_variable";

    /// GDAL geotransform coefficients.
    pub const GEOTRANSFORM: [f64; 6] = [-123.0, 1.0, 0.0, 45.0, 0.0, -1.0];

    pub const ROWS: usize = 5;

    pub const COLUMNS: usize = 5;

    pub const TIME_STEPS: usize = 5;

    /// Position of the only NODATA sample as (t, row, col).
    pub const NODATA_SAMPLE: (usize, usize, usize) = (2, 2, 4);

    /// Relative path of the values array inside a data directory.
    pub const VALUES_PATH: &str = "annual_5x5x5_dataset/float32_variable.zarr";

    /// Relative path of the uncertainty array inside a data directory.
    pub const UNCERTAINTY_PATH: &str = "annual_5x5x5_dataset/float32_variable_uncertainty.zarr";

    /// Dataset definition as written in a catalog YAML file.
    pub const DATASET_YAML: &str = r#"id: annual_5x5x5_dataset
geotransform: [-123.0, 1.0, 0.0, 45.0, 0.0, -1.0]
rows: 5
columns: 5
nodata: NaN
variables:
  - name: float32_variable
    path: annual_5x5x5_dataset/float32_variable.zarr
    uncertainty:
      layer: annual_5x5x5_dataset/float32_variable_uncertainty.zarr
"#;

    /// Variable values, laid out `[time][row][column]`.
    pub fn values() -> Vec<f32> {
        let mut data = create_stack_with(TIME_STEPS, ROWS, COLUMNS, |t, row, col| {
            (t + 1) as f64 * 100.0 + row as f64 * 10.0 + col as f64 * 1.1
        });
        punch_holes(&mut data, ROWS, COLUMNS, &[NODATA_SAMPLE], f32::NAN);
        data
    }

    /// Per-sample deltas, laid out `[time][row][column]`.
    pub fn uncertainty() -> Vec<f32> {
        let mut data = create_stack_with(TIME_STEPS, ROWS, COLUMNS, |t, row, col| {
            (t + 1) as f64 * 10.0 + row as f64 + col as f64 * 0.1
        });
        punch_holes(&mut data, ROWS, COLUMNS, &[NODATA_SAMPLE], f32::NAN);
        data
    }

    /// A query point with the cell it falls in and the expected series.
    #[derive(Debug, Clone, Copy)]
    pub struct Scenario {
        pub longitude: f64,
        pub latitude: f64,
        pub row: usize,
        pub column: usize,
        pub values: [Option<f64>; 5],
        pub lower_bounds: [Option<f64>; 5],
        pub upper_bounds: [Option<f64>; 5],
        /// CSV table as rendered with the legacy number format.
        pub legacy_csv: &'static str,
    }

    /// Grid origin, cell (0, 0).
    pub const ORIGIN: Scenario = Scenario {
        longitude: -123.0,
        latitude: 45.0,
        row: 0,
        column: 0,
        values: [Some(100.0), Some(200.0), Some(300.0), Some(400.0), Some(500.0)],
        lower_bounds: [Some(90.0), Some(180.0), Some(270.0), Some(360.0), Some(450.0)],
        upper_bounds: [Some(110.0), Some(220.0), Some(330.0), Some(440.0), Some(550.0)],
        legacy_csv: "index, float32_variable, range -, range +\n\
                     0,100,90.0000,110.000\n\
                     1,200,180.000,220.000\n\
                     2,300,270.000,330.000\n\
                     3,400,360.000,440.000\n\
                     4,500,450.000,550.000\n",
    };

    /// Interior cell (2, 2).
    pub const INTERIOR: Scenario = Scenario {
        longitude: -121.0,
        latitude: 43.0,
        row: 2,
        column: 2,
        values: [Some(122.2), Some(222.2), Some(322.2), Some(422.2), Some(522.2)],
        lower_bounds: [Some(110.0), Some(200.0), Some(290.0), Some(380.0), Some(470.0)],
        upper_bounds: [Some(134.4), Some(244.4), Some(354.4), Some(464.4), Some(574.4)],
        legacy_csv: "index, float32_variable, range -, range +\n\
                     0,122.200,110.000,134.400\n\
                     1,222.200,200.000,244.400\n\
                     2,322.200,290.000,354.400\n\
                     3,422.200,380.000,464.400\n\
                     4,522.200,470.000,574.400\n",
    };

    /// Cell (2, 4), NODATA at step 2.
    pub const WITH_NODATA: Scenario = Scenario {
        longitude: -119.0,
        latitude: 43.0,
        row: 2,
        column: 4,
        values: [Some(124.4), Some(224.4), None, Some(424.4), Some(524.4)],
        lower_bounds: [Some(112.0), Some(202.0), None, Some(382.0), Some(472.0)],
        upper_bounds: [Some(136.8), Some(246.8), None, Some(466.8), Some(576.8)],
        legacy_csv: "index, float32_variable, range -, range +\n\
                     0,124.400,112.000,136.800\n\
                     1,224.400,202.000,246.800\n\
                     2,,,\n\
                     3,424.400,382.000,466.800\n\
                     4,524.400,472.000,576.800\n",
    };

    pub const SCENARIOS: [Scenario; 3] = [ORIGIN, INTERIOR, WITH_NODATA];
}

/// Geotransforms used by coordinate tests.
pub mod transforms {
    /// 4 rows x 5 columns, 1 degree wide and 2 degrees tall, origin (-123, 45).
    pub const TALL_PIXELS: [f64; 6] = [-123.0, 1.0, 0.0, 45.0, 0.0, -2.0];

    /// Rotated grid.
    pub const ROTATED: [f64; 6] = [10.0, 1.0, 0.5, 20.0, 0.5, -1.0];

    /// Singular transform (zero pixel height).
    pub const SINGULAR: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
}
