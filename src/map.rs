use serde::Serialize;

use crate::classification::{legend_entries, LegendEntry};
use crate::config_params::{Config, MapConfig, TextConfig};
use crate::error::{Error, Result};
use crate::layer::MarkerLayer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A selectable background tile source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub subdomains: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

pub const STREET_MAP: BaseLayer = BaseLayer {
    name: "Street Map",
    url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    subdomains: "abc",
    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
    max_zoom: 19,
};

pub const TOPOGRAPHIC_MAP: BaseLayer = BaseLayer {
    name: "Topographic Map",
    url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
    subdomains: "abc",
    attribution: "Map data: &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, <a href=\"http://viewfinderpanoramas.org\">SRTM</a> | Map style: &copy; <a href=\"https://opentopomap.org\">OpenTopoMap</a> (<a href=\"https://creativecommons.org/licenses/by-sa/3.0/\">CC-BY-SA</a>)",
    max_zoom: 17,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    pub collapsed: bool,
    pub position: Corner,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: &'static str,
    pub position: Corner,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn depth() -> Self {
        Legend {
            title: "Depth",
            position: Corner::BottomLeft,
            entries: legend_entries(),
        }
    }
}

/// The composed map: everything a renderer needs to mount it.
#[derive(Debug, Clone)]
pub struct MapView {
    pub container: String,
    pub center: LatLng,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub background: Option<String>,
    pub base_layers: Vec<BaseLayer>,
    pub active_base: usize,
    pub overlay: MarkerLayer,
    pub control: LayerControl,
    pub legend: Legend,
    pub title: Option<TextConfig>,
    pub source: Option<TextConfig>,
}

impl MapView {
    pub fn compose(config: &Config, overlay: MarkerLayer) -> Result<Self> {
        let map: &MapConfig = &config.map;
        let base_layers = vec![STREET_MAP, TOPOGRAPHIC_MAP];
        let active_base = base_layers
            .iter()
            .position(|layer| layer.name.eq_ignore_ascii_case(&map.base_layer))
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown base layer \"{}\", expected one of: {}",
                    map.base_layer,
                    base_layers
                        .iter()
                        .map(|l| l.name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
        tracing::debug!(
            markers = overlay.markers.len(),
            base = base_layers[active_base].name,
            "composing map view"
        );
        Ok(MapView {
            container: map.container.clone(),
            center: LatLng {
                lat: map.center[0],
                lng: map.center[1],
            },
            zoom: map.zoom,
            width: map.width,
            height: map.height,
            background: map.background.clone(),
            base_layers,
            active_base,
            overlay,
            control: LayerControl {
                collapsed: false,
                position: Corner::TopRight,
            },
            legend: Legend::depth(),
            title: config.title.clone(),
            source: config.source.clone(),
        })
    }

    pub fn active_base_layer(&self) -> &BaseLayer {
        &self.base_layers[self.active_base]
    }
}
