//! Point series requests.
//!
//! A request arrives either as a query string on
//! `GET /timeseries/{dataset}/{variable}` or as a JSON body on
//! `POST /timeseries`. Both resolve into one [`TimeseriesRequest`] holding
//! zero-based time indices.

use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;

/// Unit the `start`/`end` values are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeResolution {
    /// Zero-based time step index.
    #[default]
    Index,
    /// One-based raster band number.
    Band,
    /// Calendar year of an annual stack.
    Year,
}

impl TimeResolution {
    pub fn parse(s: &str) -> Result<Self, ProtocolError> {
        match s.trim().to_lowercase().as_str() {
            "index" => Ok(Self::Index),
            "band" => Ok(Self::Band),
            "year" => Ok(Self::Year),
            _ => Err(ProtocolError::UnknownTimeResolution(s.to_string())),
        }
    }

    /// Value that maps to time index 0 when no `timeZero` is given.
    pub fn default_time_zero(&self) -> i64 {
        match self {
            Self::Index => 0,
            Self::Band | Self::Year => 1,
        }
    }
}

/// A validated point series request.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesRequest {
    pub dataset_id: String,
    pub variable_name: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Zero-based first index; `None` means the first step.
    pub start: Option<u64>,
    /// Zero-based last index; `None` means the last step.
    pub end: Option<u64>,
    pub csv: bool,
    pub array: bool,
}

/// Convert a requested time value into a zero-based index.
fn to_index(property: &str, value: i64, time_zero: i64) -> Result<u64, ProtocolError> {
    let index = value.checked_sub(time_zero).ok_or_else(|| {
        ProtocolError::InvalidParameter(format!("{} = {} overflows", property, value))
    })?;
    u64::try_from(index).map_err(|_| {
        ProtocolError::InvalidParameter(format!(
            "{} = {} is before time zero {}",
            property, value, time_zero
        ))
    })
}

fn parse_f64(property: &str, value: &str) -> Result<f64, ProtocolError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProtocolError::invalid(property, value))
}

fn parse_i64(property: &str, value: &str) -> Result<i64, ProtocolError> {
    value
        .trim()
        .parse()
        .map_err(|_| ProtocolError::invalid(property, value))
}

fn parse_bool(property: &str, value: &str) -> Result<bool, ProtocolError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ProtocolError::invalid(property, value)),
    }
}

/// Resolve `start`/`end` against the time resolution.
fn resolve_range(
    start: Option<i64>,
    end: Option<i64>,
    resolution: TimeResolution,
    time_zero: Option<i64>,
) -> Result<(Option<u64>, Option<u64>), ProtocolError> {
    let time_zero = time_zero.unwrap_or_else(|| resolution.default_time_zero());
    let start = start.map(|v| to_index("start", v, time_zero)).transpose()?;
    let end = end.map(|v| to_index("end", v, time_zero)).transpose()?;
    Ok((start, end))
}

/// Query string of `GET /timeseries/{dataset}/{variable}`.
///
/// Every field is kept as text so that a malformed value is reported with the
/// name of the offending parameter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesParams {
    pub longitude: Option<String>,
    pub latitude: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub csv: Option<String>,
    pub array: Option<String>,
    pub time_resolution: Option<String>,
    pub time_zero: Option<String>,
}

impl TimeseriesParams {
    /// Validate the query string of a request for `dataset`/`variable`.
    pub fn into_request(
        self,
        dataset_id: &str,
        variable_name: &str,
    ) -> Result<TimeseriesRequest, ProtocolError> {
        let longitude = self
            .longitude
            .as_deref()
            .ok_or_else(|| ProtocolError::missing("longitude"))
            .and_then(|v| parse_f64("longitude", v))?;
        let latitude = self
            .latitude
            .as_deref()
            .ok_or_else(|| ProtocolError::missing("latitude"))
            .and_then(|v| parse_f64("latitude", v))?;

        let resolution = self
            .time_resolution
            .as_deref()
            .map(TimeResolution::parse)
            .transpose()?
            .unwrap_or_default();
        let time_zero = self
            .time_zero
            .as_deref()
            .map(|v| parse_i64("timeZero", v))
            .transpose()?;
        let start = self
            .start
            .as_deref()
            .map(|v| parse_i64("start", v))
            .transpose()?;
        let end = self
            .end
            .as_deref()
            .map(|v| parse_i64("end", v))
            .transpose()?;
        let (start, end) = resolve_range(start, end, resolution, time_zero)?;

        Ok(TimeseriesRequest {
            dataset_id: dataset_id.to_string(),
            variable_name: variable_name.to_string(),
            longitude,
            latitude,
            start,
            end,
            csv: self
                .csv
                .as_deref()
                .map(|v| parse_bool("csv", v))
                .transpose()?
                .unwrap_or(false),
            array: self
                .array
                .as_deref()
                .map(|v| parse_bool("array", v))
                .transpose()?
                .unwrap_or(false),
        })
    }
}

/// GeoJSON geometry of a POST request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl Geometry {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            type_: "Point".to_string(),
            coordinates: serde_json::json!([longitude, latitude]),
        }
    }

    /// The `(longitude, latitude)` of a Point geometry.
    pub fn as_point(&self) -> Result<(f64, f64), ProtocolError> {
        if self.type_ != "Point" {
            return Err(ProtocolError::UnsupportedGeometry(self.type_.clone()));
        }

        let coords = self
            .coordinates
            .as_array()
            .filter(|c| c.len() >= 2)
            .ok_or_else(|| {
                ProtocolError::InvalidParameter(format!(
                    "boundaryGeometry.coordinates = {}",
                    self.coordinates
                ))
            })?;

        let axis = |i: usize, name: &str| {
            coords[i]
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ProtocolError::invalid(name, &coords[i].to_string()))
        };
        Ok((axis(0, "longitude")?, axis(1, "latitude")?))
    }
}

/// JSON body of `POST /timeseries`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesBody {
    pub dataset_id: Option<String>,
    pub variable_name: Option<String>,
    pub boundary_geometry: Option<Geometry>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub time_resolution: Option<String>,
    pub time_zero: Option<i64>,
    #[serde(default)]
    pub csv: bool,
    #[serde(default)]
    pub array: bool,
}

impl TimeseriesBody {
    /// Validate the body.
    ///
    /// `boundaryGeometry` takes precedence over `longitude`/`latitude`.
    pub fn into_request(self) -> Result<TimeseriesRequest, ProtocolError> {
        let dataset_id = self
            .dataset_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProtocolError::missing("datasetId"))?;
        let variable_name = self
            .variable_name
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProtocolError::missing("variableName"))?;

        let (longitude, latitude) = match &self.boundary_geometry {
            Some(geometry) => geometry.as_point()?,
            None => {
                let longitude = self
                    .longitude
                    .ok_or_else(|| ProtocolError::missing("longitude"))?;
                let latitude = self
                    .latitude
                    .ok_or_else(|| ProtocolError::missing("latitude"))?;
                (longitude, latitude)
            }
        };

        let resolution = self
            .time_resolution
            .as_deref()
            .map(TimeResolution::parse)
            .transpose()?
            .unwrap_or_default();
        let (start, end) = resolve_range(self.start, self.end, resolution, self.time_zero)?;

        Ok(TimeseriesRequest {
            dataset_id,
            variable_name,
            longitude,
            latitude,
            start,
            end,
            csv: self.csv,
            array: self.array,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> TimeseriesParams {
        let object = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).unwrap()
    }

    #[test]
    fn test_query_minimal() {
        let req = params(&[("longitude", "-123"), ("latitude", "45")])
            .into_request("d", "v")
            .unwrap();
        assert_eq!(req.dataset_id, "d");
        assert_eq!(req.variable_name, "v");
        assert_eq!((req.longitude, req.latitude), (-123.0, 45.0));
        assert_eq!((req.start, req.end), (None, None));
        assert!(!req.csv);
        assert!(!req.array);
    }

    #[test]
    fn test_query_full() {
        let req = params(&[
            ("longitude", "-121.5"),
            ("latitude", "43.25"),
            ("start", "1"),
            ("end", "3"),
            ("csv", "true"),
            ("array", "TRUE"),
        ])
        .into_request("d", "v")
        .unwrap();
        assert_eq!((req.start, req.end), (Some(1), Some(3)));
        assert!(req.csv);
        assert!(req.array);
    }

    #[test]
    fn test_query_missing_coordinate_is_named() {
        let err = params(&[("latitude", "45")])
            .into_request("d", "v")
            .unwrap_err();
        assert_eq!(err, ProtocolError::missing("longitude"));

        let err = params(&[("longitude", "1")])
            .into_request("d", "v")
            .unwrap_err();
        assert_eq!(err, ProtocolError::missing("latitude"));
    }

    #[test]
    fn test_query_malformed_values() {
        for (key, value) in [
            ("longitude", "abc"),
            ("latitude", "NaN"),
            ("start", "1.5"),
            ("end", "x"),
            ("csv", "maybe"),
        ] {
            let mut pairs = vec![("longitude", "0"), ("latitude", "0")];
            pairs.retain(|(k, _)| *k != key);
            pairs.push((key, value));
            let err = params(&pairs).into_request("d", "v").unwrap_err();
            assert!(
                err.to_string().contains(key),
                "{} should be named in '{}'",
                key,
                err
            );
        }
    }

    #[test]
    fn test_query_negative_start() {
        let err = params(&[("longitude", "0"), ("latitude", "0"), ("start", "-1")])
            .into_request("d", "v")
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidParameter(_)));
    }

    #[test]
    fn test_band_resolution_is_one_based() {
        let req = params(&[
            ("longitude", "0"),
            ("latitude", "0"),
            ("start", "1"),
            ("end", "5"),
            ("timeResolution", "band"),
        ])
        .into_request("d", "v")
        .unwrap();
        assert_eq!((req.start, req.end), (Some(0), Some(4)));

        let err = params(&[
            ("longitude", "0"),
            ("latitude", "0"),
            ("start", "0"),
            ("timeResolution", "band"),
        ])
        .into_request("d", "v")
        .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidParameter(_)));
    }

    #[test]
    fn test_year_resolution_with_time_zero() {
        let req = params(&[
            ("longitude", "0"),
            ("latitude", "0"),
            ("start", "2001"),
            ("end", "2004"),
            ("timeResolution", "year"),
            ("timeZero", "2000"),
        ])
        .into_request("d", "v")
        .unwrap();
        assert_eq!((req.start, req.end), (Some(1), Some(4)));
    }

    #[test]
    fn test_unknown_time_resolution() {
        let err = params(&[("longitude", "0"), ("latitude", "0"), ("timeResolution", "month")])
            .into_request("d", "v")
            .unwrap_err();
        assert_eq!(err, ProtocolError::UnknownTimeResolution("month".to_string()));
    }

    #[test]
    fn test_body_with_point_geometry() {
        let body: TimeseriesBody = serde_json::from_str(
            r#"{
                "datasetId": "annual_5x5x5_dataset",
                "variableName": "float32_variable",
                "boundaryGeometry": {"type": "Point", "coordinates": [-121.0, 43.0]},
                "start": 0,
                "end": 4,
                "csv": true
            }"#,
        )
        .unwrap();
        let req = body.into_request().unwrap();
        assert_eq!((req.longitude, req.latitude), (-121.0, 43.0));
        assert_eq!((req.start, req.end), (Some(0), Some(4)));
        assert!(req.csv);
        assert!(!req.array);
    }

    #[test]
    fn test_body_with_plain_coordinates() {
        let body = TimeseriesBody {
            dataset_id: Some("d".to_string()),
            variable_name: Some("v".to_string()),
            longitude: Some(1.0),
            latitude: Some(2.0),
            ..Default::default()
        };
        let req = body.into_request().unwrap();
        assert_eq!((req.longitude, req.latitude), (1.0, 2.0));
    }

    #[test]
    fn test_body_missing_properties_are_named() {
        let err = TimeseriesBody::default().into_request().unwrap_err();
        assert_eq!(err, ProtocolError::missing("datasetId"));

        let body = TimeseriesBody {
            dataset_id: Some("d".to_string()),
            ..Default::default()
        };
        assert_eq!(
            body.into_request().unwrap_err(),
            ProtocolError::missing("variableName")
        );

        let body = TimeseriesBody {
            dataset_id: Some("d".to_string()),
            variable_name: Some("v".to_string()),
            longitude: Some(1.0),
            ..Default::default()
        };
        assert_eq!(
            body.into_request().unwrap_err(),
            ProtocolError::missing("latitude")
        );
    }

    #[test]
    fn test_body_rejects_polygon() {
        let body = TimeseriesBody {
            dataset_id: Some("d".to_string()),
            variable_name: Some("v".to_string()),
            boundary_geometry: Some(Geometry {
                type_: "Polygon".to_string(),
                coordinates: serde_json::json!([[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]]),
            }),
            ..Default::default()
        };
        assert_eq!(
            body.into_request().unwrap_err(),
            ProtocolError::UnsupportedGeometry("Polygon".to_string())
        );
    }

    #[test]
    fn test_point_with_bad_coordinates() {
        let geometry = Geometry {
            type_: "Point".to_string(),
            coordinates: serde_json::json!([1.0]),
        };
        assert!(matches!(
            geometry.as_point(),
            Err(ProtocolError::InvalidParameter(_))
        ));

        let geometry = Geometry {
            type_: "Point".to_string(),
            coordinates: serde_json::json!(["a", 2.0]),
        };
        assert!(geometry.as_point().unwrap_err().to_string().contains("longitude"));

        assert_eq!(Geometry::point(3.0, 4.0).as_point().unwrap(), (3.0, 4.0));
    }
}
