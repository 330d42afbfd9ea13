use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("feed at {url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("feed is not valid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("expected a FeatureCollection, got a {0}")]
    NotACollection(&'static str),

    #[error("unable to register template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("unable to render map: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("unable to encode map data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no map has been loaded yet")]
    NotLoaded,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a single feed feature is left off the map.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("expected a Point geometry, got a {0}")]
    NotAPoint(&'static str),

    #[error("point has {0} coordinates, expected longitude, latitude and depth")]
    MissingCoordinate(usize),

    #[error("property \"{0}\" is missing or not a number")]
    MissingProperty(&'static str),

    #[error("timestamp {0} is out of range")]
    InvalidTime(i64),
}
