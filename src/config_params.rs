use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::projection::MAX_LATITUDE;
use crate::render::OutputFormat;

pub const USGS_ALL_MONTH: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson";

pub const MAX_ZOOM: u8 = 18;

/// Projected bounds of the drawn area (top > bottom).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MapExtent {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl MapExtent {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub feed: FeedConfig,
    pub map: MapConfig,
    pub title: Option<TextConfig>,
    pub source: Option<TextConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub url: String,
    pub path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            url: USGS_ALL_MONTH.to_string(),
            path: None,
            timeout_secs: Some(30),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub container: String,
    /// `[latitude, longitude]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
    pub format: Option<OutputFormat>,
    pub base_layer: String,
    pub background: Option<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            container: String::from("map"),
            center: [37.0, -96.0],
            zoom: 4,
            width: 960,
            height: 600,
            output: PathBuf::from("earthquakes.html"),
            format: None,
            base_layer: String::from("Street Map"),
            background: None,
        }
    }
}

impl MapConfig {
    /// Explicit format, or the one implied by the output file extension.
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .unwrap_or_else(|| OutputFormat::from_path(&self.output))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextConfig {
    pub content: String,
    pub font_size: Option<String>,
    pub position: Option<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Placement {
    At([i32; 2]),
    Align(HorizontalAlign),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        raw.parse()
    }

    pub fn validate(&self) -> Result<()> {
        let map = &self.map;
        if map.zoom > MAX_ZOOM {
            return Err(Error::Config(format!(
                "zoom {} is above the maximum of {}",
                map.zoom, MAX_ZOOM
            )));
        }
        let [lat, lon] = map.center;
        if !(lat.abs() <= MAX_LATITUDE) {
            return Err(Error::Config(format!(
                "center latitude {} is outside +/-{:.4}",
                lat, MAX_LATITUDE
            )));
        }
        if !(lon.abs() <= 180.0) {
            return Err(Error::Config(format!(
                "center longitude {} is outside +/-180",
                lon
            )));
        }
        if map.width == 0 || map.height == 0 {
            return Err(Error::Config(String::from("map width and height must be non-zero")));
        }
        // the id is spliced into CSS selectors and element ids
        let id_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
        if map.container.is_empty() || !map.container.chars().all(id_char) {
            return Err(Error::Config(format!(
                "map container id \"{}\" must be letters, digits, '_' or '-'",
                map.container
            )));
        }
        if self.feed.timeout_secs == Some(0) {
            return Err(Error::Config(String::from("feed timeout must be at least one second")));
        }
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
