//! End-to-end extraction over the annual 5x5x5 fixture stored as Zarr.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use grid_series::testdata::write_stack_zarr;
use grid_series::{
    Dataset, ExtractorConfig, GeoTransform, GridExtent, NumberFormat, PointSeriesQuery,
    SeriesError, SeriesService, SeriesValues, StaticCatalog, UncertaintySpec, VariableSource,
    ZarrRasterReader,
};
use test_utils::{annual, assert_series_approx_eq};
use zarrs_filesystem::FilesystemStore;

fn write_fixture(root: &Path) {
    let (t, r, c) = (annual::TIME_STEPS, annual::ROWS, annual::COLUMNS);
    write_stack_zarr(&root.join(annual::VALUES_PATH), &annual::values(), t, r, c)
        .expect("Failed to write values");
    write_stack_zarr(
        &root.join(annual::UNCERTAINTY_PATH),
        &annual::uncertainty(),
        t,
        r,
        c,
    )
    .expect("Failed to write uncertainty");
}

fn open(path: &Path) -> Arc<ZarrRasterReader<FilesystemStore>> {
    let store = FilesystemStore::new(path).expect("Failed to open store");
    Arc::new(ZarrRasterReader::open(store, "/").expect("Failed to open stack"))
}

fn service(root: &Path, number_format: NumberFormat) -> SeriesService {
    let dataset = Dataset::new(
        annual::DATASET_ID,
        GeoTransform::from_gdal(annual::GEOTRANSFORM),
        GridExtent::new(annual::ROWS, annual::COLUMNS),
    )
    .with_variable(annual::VARIABLE, UncertaintySpec::Layer);

    let source = VariableSource::new(open(&root.join(annual::VALUES_PATH)))
        .with_uncertainty_layer(open(&root.join(annual::UNCERTAINTY_PATH)));

    let mut catalog = StaticCatalog::new();
    catalog
        .insert(
            dataset,
            HashMap::from([(annual::VARIABLE.to_string(), source)]),
        )
        .expect("Failed to register dataset");

    let config = ExtractorConfig {
        number_format,
        ..Default::default()
    };
    SeriesService::new(Arc::new(catalog), config)
}

fn full_range(scenario: &annual::Scenario) -> PointSeriesQuery {
    PointSeriesQuery::new(
        annual::DATASET_ID,
        annual::VARIABLE,
        scenario.longitude,
        scenario.latitude,
    )
    .with_range(Some(0), Some(4))
    .with_array(true)
    .with_csv(true)
}

#[tokio::test]
async fn test_scenarios_values_and_bounds() {
    let temp_dir = test_utils::temp_dir();
    write_fixture(temp_dir.path());
    let service = service(temp_dir.path(), NumberFormat::default());

    for scenario in annual::SCENARIOS {
        let payload = service.query(&full_range(&scenario)).await.unwrap();

        assert_eq!(payload.dataset_id, annual::DATASET_ID);
        assert_eq!(payload.variable_name, annual::VARIABLE);
        assert_eq!(payload.nodata, "NaN");
        assert_eq!((payload.start, payload.end), (0, 4));
        assert_eq!(
            payload.contains_nodata,
            scenario.values.iter().any(Option::is_none)
        );

        assert_series_approx_eq!(payload.values.to_vec(), scenario.values.to_vec(), 1e-3);
        assert_series_approx_eq!(
            payload.lower_bounds.to_vec(),
            scenario.lower_bounds.to_vec(),
            1e-3
        );
        assert_series_approx_eq!(
            payload.upper_bounds.to_vec(),
            scenario.upper_bounds.to_vec(),
            1e-3
        );
    }
}

#[tokio::test]
async fn test_legacy_csv_is_byte_exact() {
    let temp_dir = test_utils::temp_dir();
    write_fixture(temp_dir.path());
    let service = service(temp_dir.path(), NumberFormat::Legacy);

    for scenario in annual::SCENARIOS {
        let payload = service.query(&full_range(&scenario)).await.unwrap();
        assert_eq!(payload.csv.as_deref(), Some(scenario.legacy_csv));
    }
}

#[tokio::test]
async fn test_fixed_csv_nodata_row() {
    let temp_dir = test_utils::temp_dir();
    write_fixture(temp_dir.path());
    let service = service(temp_dir.path(), NumberFormat::default());

    let payload = service
        .query(&full_range(&annual::WITH_NODATA))
        .await
        .unwrap();
    let csv = payload.csv.unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "index, float32_variable, range -, range +");
    assert_eq!(lines[1], "0,124.400,112.000,136.800");
    assert_eq!(lines[3], "2,,,");
    assert!(csv.ends_with('\n'));
}

#[tokio::test]
async fn test_repeated_queries_are_identical() {
    let temp_dir = test_utils::temp_dir();
    write_fixture(temp_dir.path());
    let service = service(temp_dir.path(), NumberFormat::Legacy);

    let query = full_range(&annual::INTERIOR);
    let first = service.query(&query).await.unwrap();
    let second = service.query(&query).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_sub_range_and_single_step() {
    let temp_dir = test_utils::temp_dir();
    write_fixture(temp_dir.path());
    let service = service(temp_dir.path(), NumberFormat::default());
    let scenario = annual::ORIGIN;

    let query = full_range(&scenario).with_range(Some(1), Some(3));
    let payload = service.query(&query).await.unwrap();
    assert_eq!(
        payload.values.to_vec(),
        vec![Some(200.0), Some(300.0), Some(400.0)]
    );

    let query = full_range(&scenario)
        .with_range(Some(3), Some(3))
        .with_array(false);
    let payload = service.query(&query).await.unwrap();
    assert_eq!(payload.values, SeriesValues::Scalar(Some(400.0)));
    assert_eq!(payload.lower_bounds, SeriesValues::Scalar(Some(360.0)));
    assert_eq!(payload.upper_bounds, SeriesValues::Scalar(Some(440.0)));
}

#[tokio::test]
async fn test_defaults_cover_whole_axis() {
    let temp_dir = test_utils::temp_dir();
    write_fixture(temp_dir.path());
    let service = service(temp_dir.path(), NumberFormat::default());

    let query = PointSeriesQuery::new(annual::DATASET_ID, annual::VARIABLE, -123.0, 45.0);
    let payload = service.query(&query).await.unwrap();
    assert_eq!((payload.start, payload.end), (0, 4));
    assert!(payload.csv.is_none());
}

#[tokio::test]
async fn test_error_cases() {
    let temp_dir = test_utils::temp_dir();
    write_fixture(temp_dir.path());
    let service = service(temp_dir.path(), NumberFormat::default());

    // East edge of the grid is exclusive.
    let query = PointSeriesQuery::new(annual::DATASET_ID, annual::VARIABLE, -118.0, 43.0);
    assert!(matches!(
        service.query(&query).await,
        Err(SeriesError::OutOfBounds { .. })
    ));

    let query = full_range(&annual::ORIGIN).with_range(Some(0), Some(5));
    assert_eq!(
        service.query(&query).await.unwrap_err(),
        SeriesError::TimeIndexOutOfRange {
            index: 5,
            available: 5
        }
    );

    let query = full_range(&annual::ORIGIN).with_range(Some(3), Some(1));
    assert_eq!(
        service.query(&query).await.unwrap_err(),
        SeriesError::InvalidRange { start: 3, end: 1 }
    );

    let query = PointSeriesQuery::new("missing_dataset", annual::VARIABLE, -123.0, 45.0);
    assert!(matches!(
        service.query(&query).await,
        Err(SeriesError::NotFound(_))
    ));
}
