use handlebars::html_escape;
use serde::Serialize;

use crate::classification::depth_color;
use crate::feed::Quake;

pub const OVERLAY_NAME: &str = "Earthquakes";
pub const RADIUS_SCALE: f64 = 3.0;

/// Stroke and opacity shared by every marker, named after Leaflet's path
/// options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            color: "#000",
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub heading: String,
    pub fields: Vec<(&'static str, String)>,
}

impl Popup {
    pub fn for_quake(quake: &Quake) -> Self {
        Popup {
            heading: format!("Location: {}", quake.place),
            fields: vec![
                ("Date", quake.time.format("%a %b %d %Y %H:%M:%S UTC").to_string()),
                ("Magnitude", quake.magnitude.to_string()),
                ("Latitude", quake.latitude.to_string()),
                ("Longitude", quake.longitude.to_string()),
                ("Depth", quake.depth.to_string()),
            ],
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = format!("<h3>{}</h3><hr>", html_escape(&self.heading));
        for (label, value) in &self.fields {
            html.push_str(&format!("<p>{}: {}</p>", label, html_escape(value)));
        }
        html
    }

    pub fn to_text(&self) -> String {
        let mut lines = vec![self.heading.clone()];
        lines.extend(
            self.fields
                .iter()
                .map(|(label, value)| format!("{}: {}", label, value)),
        );
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    /// `magnitude * 3`, left unclamped.
    pub radius: f64,
    pub fill_color: &'static str,
    pub popup: Popup,
}

impl Marker {
    pub fn from_quake(quake: &Quake) -> Self {
        Marker {
            latitude: quake.latitude,
            longitude: quake.longitude,
            radius: quake.magnitude * RADIUS_SCALE,
            fill_color: depth_color(quake.depth),
            popup: Popup::for_quake(quake),
        }
    }
}

/// The toggle-able overlay holding every marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayer {
    pub name: &'static str,
    pub style: MarkerStyle,
    pub markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn earthquakes(markers: Vec<Marker>) -> Self {
        MarkerLayer {
            name: OVERLAY_NAME,
            style: MarkerStyle::default(),
            markers,
        }
    }
}

/// One marker per quake, in the given order.
pub fn build_markers(quakes: &[Quake]) -> MarkerLayer {
    MarkerLayer::earthquakes(quakes.iter().map(Marker::from_quake).collect())
}
