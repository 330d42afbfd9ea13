//! Fetch the USGS earthquake feed and draw it on a map.
//!
//! Each event becomes a circle marker sized by magnitude and filled by depth,
//! drawn over a choice of two tile base layers next to a depth legend. The
//! map is mounted either as an interactive Leaflet page or as a static SVG.

pub mod app;
pub mod classification;
pub mod config_params;
pub mod error;
pub mod feed;
pub mod layer;
pub mod map;
pub mod projection;
pub mod render;

pub use app::QuakeMap;
pub use config_params::Config;
pub use error::{Error, FeatureError, Result};
pub use feed::{Catalog, FeedSource, Quake};
pub use render::OutputFormat;
