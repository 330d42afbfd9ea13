//! Spherical Web Mercator (EPSG:3857) and the slippy-map tile grid.

use std::f64::consts::PI;

use crate::config_params::MapExtent;
use crate::map::LatLng;

pub const EARTH_RADIUS: f64 = 6_378_137.0;
pub const ORIGIN_SHIFT: f64 = PI * EARTH_RADIUS;
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;
pub const TILE_SIZE: u32 = 256;

/// Project a geographic position to meters. Latitudes beyond the Mercator
/// limit are clamped.
pub fn to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Meters per pixel at `zoom`.
pub fn resolution(zoom: u8) -> f64 {
    2.0 * ORIGIN_SHIFT / (f64::from(TILE_SIZE) * 2f64.powi(i32::from(zoom)))
}

pub fn extent_around(center: LatLng, zoom: u8, width: u32, height: u32) -> MapExtent {
    let (cx, cy) = to_web_mercator(center.lng, center.lat);
    let res = resolution(zoom);
    let half_w = f64::from(width) * res / 2.0;
    let half_h = f64::from(height) * res / 2.0;
    MapExtent {
        left: cx - half_w,
        right: cx + half_w,
        bottom: cy - half_h,
        top: cy + half_h,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub z: u8,
    /// Column wrapped into the tile grid, used to build the URL.
    pub x: u32,
    pub y: u32,
    /// Column before wrapping, used to place the tile.
    pub column: i64,
}

impl Tile {
    /// Projected `(left, top)` corner of the tile.
    pub fn origin(&self) -> (f64, f64) {
        let size = tile_span(self.z);
        (
            -ORIGIN_SHIFT + self.column as f64 * size,
            ORIGIN_SHIFT - f64::from(self.y) * size,
        )
    }

    /// Fill a `{s}/{z}/{x}/{y}` URL template. The subdomain is picked the
    /// way Leaflet does so both renderers hit the same hosts.
    pub fn url(&self, template: &str, subdomains: &str) -> String {
        let chars: Vec<char> = subdomains.chars().collect();
        let mut url = template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string());
        if !chars.is_empty() {
            let index = (u64::from(self.x) + u64::from(self.y)) % chars.len() as u64;
            url = url.replace("{s}", &chars[index as usize].to_string());
        }
        url
    }
}

/// Width of one tile in meters at `zoom`.
pub fn tile_span(zoom: u8) -> f64 {
    2.0 * ORIGIN_SHIFT / 2f64.powi(i32::from(zoom))
}

/// Every tile intersecting `extent`, row by row.
pub fn covering_tiles(extent: &MapExtent, zoom: u8) -> Vec<Tile> {
    let span = tile_span(zoom);
    let count = 1i64 << zoom;
    let first_col = ((extent.left + ORIGIN_SHIFT) / span).floor() as i64;
    let last_col = ((extent.right + ORIGIN_SHIFT) / span).ceil() as i64 - 1;
    let first_row = ((ORIGIN_SHIFT - extent.top) / span).floor() as i64;
    let last_row = ((ORIGIN_SHIFT - extent.bottom) / span).ceil() as i64 - 1;

    let mut tiles = Vec::new();
    for row in first_row.max(0)..=last_row.min(count - 1) {
        for column in first_col..=last_col {
            tiles.push(Tile {
                z: zoom,
                x: column.rem_euclid(count) as u32,
                y: row as u32,
                column,
            });
        }
    }
    tiles
}
