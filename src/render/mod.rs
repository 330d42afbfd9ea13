//! Mounting a composed map into an output document.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::map::MapView;

pub mod html;
pub mod svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Interactive Leaflet page
    Html,
    /// Static vector map
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Html,
        }
    }
}

pub fn render(view: &MapView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => html::render(view),
        OutputFormat::Svg => Ok(svg::render(view)),
    }
}
