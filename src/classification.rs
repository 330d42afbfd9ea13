//! Depth classification of earthquakes.
//!
//! The same ordered table drives the marker fill colors and the map legend.

use serde::Serialize;

/// One depth bucket: every depth strictly below `upper` (and not caught by an
/// earlier bucket) gets `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthClass {
    pub upper: f64,
    pub color: &'static str,
    pub label: &'static str,
}

pub const DEPTH_CLASSES: [DepthClass; 6] = [
    DepthClass { upper: 10.0, color: "#800080", label: "<10" },
    DepthClass { upper: 30.0, color: "#0000FF", label: "10-30" },
    DepthClass { upper: 50.0, color: "#008000", label: "30-50" },
    DepthClass { upper: 70.0, color: "#FFFF00", label: "50-70" },
    DepthClass { upper: 90.0, color: "#FFA500", label: "70-90" },
    DepthClass { upper: f64::INFINITY, color: "#FF0000", label: "90+" },
];

/// Finite bucket boundaries, in kilometers.
pub const DEPTH_BREAKS: [f64; 5] = [10.0, 30.0, 50.0, 70.0, 90.0];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: &'static str,
    pub label: &'static str,
}

/// Index of the bucket `depth` falls in. Values failing every comparison
/// (NaN) end up in the last bucket.
pub fn depth_class_index(depth: f64) -> usize {
    DEPTH_CLASSES
        .iter()
        .position(|class| depth < class.upper)
        .unwrap_or(DEPTH_CLASSES.len() - 1)
}

pub fn depth_class(depth: f64) -> &'static DepthClass {
    &DEPTH_CLASSES[depth_class_index(depth)]
}

pub fn depth_color(depth: f64) -> &'static str {
    depth_class(depth).color
}

pub fn legend_entries() -> Vec<LegendEntry> {
    DEPTH_CLASSES
        .iter()
        .map(|class| LegendEntry {
            color: class.color,
            label: class.label,
        })
        .collect()
}
