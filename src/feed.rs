//! Loading the earthquake feed.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use geojson::{Feature, GeoJson, Value};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::config_params::FeedConfig;
use crate::error::{Error, FeatureError, Result};

pub const UNKNOWN_PLACE: &str = "Unknown location";

/// One earthquake, validated from a feed feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Quake {
    pub id: Option<String>,
    pub place: String,
    pub time: DateTime<Utc>,
    pub magnitude: f64,
    pub longitude: f64,
    pub latitude: f64,
    /// Kilometers below the surface.
    pub depth: f64,
}

impl Quake {
    pub fn from_feature(feature: &Feature) -> std::result::Result<Self, FeatureError> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or(FeatureError::MissingGeometry)?;
        let coords = match geometry.value {
            Value::Point(ref coords) => coords,
            ref other => return Err(FeatureError::NotAPoint(geometry_name(other))),
        };
        if coords.len() < 3 {
            return Err(FeatureError::MissingCoordinate(coords.len()));
        }

        let magnitude = property(feature, "mag")
            .and_then(JsonValue::as_f64)
            .ok_or(FeatureError::MissingProperty("mag"))?;
        let millis = property(feature, "time")
            .and_then(|t| t.as_i64().or_else(|| t.as_f64().map(|f| f as i64)))
            .ok_or(FeatureError::MissingProperty("time"))?;
        let time = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or(FeatureError::InvalidTime(millis))?;
        let place = property(feature, "place")
            .and_then(JsonValue::as_str)
            .unwrap_or(UNKNOWN_PLACE)
            .to_string();
        let id = feature.id.as_ref().map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        });

        Ok(Quake {
            id,
            place,
            time,
            magnitude,
            longitude: coords[0],
            latitude: coords[1],
            depth: coords[2],
        })
    }
}

fn property<'a>(feature: &'a Feature, name: &str) -> Option<&'a JsonValue> {
    feature.properties.as_ref().and_then(|props| props.get(name))
}

fn geometry_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// The quakes of one feed response, in feed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub quakes: Vec<Quake>,
    /// Features left out because they lacked something a marker needs.
    pub rejected: usize,
}

impl Catalog {
    pub fn from_features(features: &[Feature]) -> Self {
        let mut catalog = Catalog::default();
        for (index, feature) in features.iter().enumerate() {
            match Quake::from_feature(feature) {
                Ok(quake) => catalog.quakes.push(quake),
                Err(err) => {
                    debug!(index, %err, "skipping feature");
                    catalog.rejected += 1;
                }
            }
        }
        if catalog.rejected > 0 {
            warn!(
                rejected = catalog.rejected,
                total = features.len(),
                "some features could not be placed on the map"
            );
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.quakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quakes.is_empty()
    }
}

/// Decode a GeoJSON document holding a FeatureCollection.
pub fn parse_feed(raw: &str) -> Result<Catalog> {
    let collection = match raw.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => return Err(Error::NotACollection("Feature")),
        GeoJson::Geometry(_) => return Err(Error::NotACollection("Geometry")),
    };
    Ok(Catalog::from_features(&collection.features))
}

pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("quakemap/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(FeedClient {
            client: builder.build()?,
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<Catalog> {
        info!(url, "fetching earthquake feed");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "feed downloaded");
        parse_feed(&body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl FeedSource {
    /// A configured file takes precedence over the URL.
    pub fn from_config(config: &FeedConfig) -> Self {
        match config.path {
            Some(ref path) => FeedSource::File(path.clone()),
            None => FeedSource::Url(config.url.clone()),
        }
    }

    pub async fn load(&self, timeout: Option<Duration>) -> Result<Catalog> {
        let catalog = match self {
            FeedSource::Url(url) => FeedClient::new(timeout)?.fetch(url).await?,
            FeedSource::File(path) => {
                info!(path = %path.display(), "reading earthquake feed");
                let raw = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
                parse_feed(&raw)?
            }
        };
        info!(quakes = catalog.len(), "feed loaded");
        Ok(catalog)
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(value: serde_json::Value) -> Feature {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_a_usgs_feature() {
        let quake = Quake::from_feature(&feature(json!({
            "type": "Feature",
            "id": "us7000abcd",
            "properties": {"mag": 4.6, "place": "12 km SSW of Somewhere", "time": 1_700_000_000_000i64},
            "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, 8.2]}
        })))
        .unwrap();
        assert_eq!(quake.id.as_deref(), Some("us7000abcd"));
        assert_eq!(quake.place, "12 km SSW of Somewhere");
        assert_eq!(quake.magnitude, 4.6);
        assert_eq!(quake.longitude, -117.5);
        assert_eq!(quake.latitude, 35.7);
        assert_eq!(quake.depth, 8.2);
        assert_eq!(quake.time.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn missing_place_falls_back() {
        let quake = Quake::from_feature(&feature(json!({
            "type": "Feature",
            "properties": {"mag": 1.0, "place": null, "time": 0},
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0, 0.0]}
        })))
        .unwrap();
        assert_eq!(quake.place, UNKNOWN_PLACE);
        assert_eq!(quake.id, None);
    }

    #[test]
    fn rejects_incomplete_features() {
        let no_mag = feature(json!({
            "type": "Feature",
            "properties": {"mag": null, "place": "x", "time": 0},
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0, 3.0]}
        }));
        assert_eq!(
            Quake::from_feature(&no_mag),
            Err(FeatureError::MissingProperty("mag"))
        );

        let flat = feature(json!({
            "type": "Feature",
            "properties": {"mag": 2.0, "time": 0},
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
        }));
        assert_eq!(
            Quake::from_feature(&flat),
            Err(FeatureError::MissingCoordinate(2))
        );

        let no_geometry = feature(json!({
            "type": "Feature",
            "properties": {"mag": 2.0, "time": 0},
            "geometry": null
        }));
        assert_eq!(
            Quake::from_feature(&no_geometry),
            Err(FeatureError::MissingGeometry)
        );

        let line = feature(json!({
            "type": "Feature",
            "properties": {"mag": 2.0, "time": 0},
            "geometry": {"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}
        }));
        assert_eq!(
            Quake::from_feature(&line),
            Err(FeatureError::NotAPoint("LineString"))
        );

        let no_time = feature(json!({
            "type": "Feature",
            "properties": {"mag": 2.0},
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0, 3.0]}
        }));
        assert_eq!(
            Quake::from_feature(&no_time),
            Err(FeatureError::MissingProperty("time"))
        );
    }

    #[test]
    fn parse_keeps_order_and_counts_rejects() {
        let raw = json!({
            "type": "FeatureCollection",
            "metadata": {"title": "USGS All Earthquakes, Past Month"},
            "features": [
                {"type": "Feature", "properties": {"mag": 1.0, "place": "first", "time": 0},
                 "geometry": {"type": "Point", "coordinates": [0.0, 0.0, 5.0]}},
                {"type": "Feature", "properties": {"place": "no magnitude", "time": 0},
                 "geometry": {"type": "Point", "coordinates": [0.0, 0.0, 5.0]}},
                {"type": "Feature", "properties": {"mag": 3.0, "place": "second", "time": 0},
                 "geometry": {"type": "Point", "coordinates": [0.0, 0.0, 5.0]}}
            ]
        })
        .to_string();
        let catalog = parse_feed(&raw).unwrap();
        assert_eq!(catalog.rejected, 1);
        assert_eq!(
            catalog.quakes.iter().map(|q| q.place.as_str()).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn parse_rejects_non_collections() {
        let raw = json!({"type": "Point", "coordinates": [0.0, 0.0]}).to_string();
        assert!(matches!(parse_feed(&raw), Err(Error::NotACollection("Geometry"))));
        assert!(matches!(parse_feed("not json"), Err(Error::GeoJson(_))));
    }

    #[test]
    fn source_prefers_configured_file() {
        let mut config = FeedConfig::default();
        assert_eq!(
            FeedSource::from_config(&config),
            FeedSource::Url(crate::config_params::USGS_ALL_MONTH.to_string())
        );
        config.path = Some(PathBuf::from("local.geojson"));
        assert_eq!(
            FeedSource::from_config(&config),
            FeedSource::File(PathBuf::from("local.geojson"))
        );
    }
}
