use handlebars::html_escape;
use svg::node::element::{Circle, Group, Image, Rectangle as Rect, Text, Title};
use svg::node::Text as NodeText;
use svg::Document;

use crate::config_params::{HorizontalAlign, MapExtent, Placement, TextConfig};
use crate::layer::{Marker, MarkerLayer, MarkerStyle};
use crate::map::{BaseLayer, MapView};
use crate::projection::{covering_tiles, extent_around, tile_span, to_web_mercator};

const LEGEND_ROW: f64 = 20.0;
const CONTROL_WIDTH: f64 = 170.0;

/// Maps projected coordinates into the viewport.
pub struct Converter<'a> {
    viewport_width: u32,
    viewport_height: u32,
    map_extent: &'a MapExtent,
    resolution: f64,
}

impl<'a> Converter<'a> {
    pub fn new(viewport_width: u32, viewport_height: u32, map_extent: &'a MapExtent) -> Self {
        let xres = map_extent.width() / f64::from(viewport_width);
        let yres = map_extent.height() / f64::from(viewport_height);
        Converter {
            viewport_width,
            viewport_height,
            map_extent,
            resolution: xres.max(yres),
        }
    }

    pub fn to_viewport(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.map_extent.left) / self.resolution,
            (self.map_extent.top - y) / self.resolution,
        )
    }

    pub fn draw_base_layer(&self, layer: &BaseLayer, zoom: u8) -> Group {
        let size = tile_span(zoom) / self.resolution;
        let mut group = Group::new().set("data-name", layer.name);
        for tile in covering_tiles(self.map_extent, zoom) {
            let (left, top) = tile.origin();
            let (x, y) = self.to_viewport(left, top);
            group = group.add(
                Image::new()
                    .set("href", tile.url(layer.url, layer.subdomains))
                    .set("x", x)
                    .set("y", y)
                    .set("width", size)
                    .set("height", size),
            );
        }
        group
    }

    pub fn draw_markers(&self, layer: &MarkerLayer) -> Group {
        let mut group = Group::new().set("data-name", layer.name);
        for marker in &layer.markers {
            group = group.add(self.draw_marker(marker, &layer.style));
        }
        group
    }

    fn draw_marker(&self, marker: &Marker, style: &MarkerStyle) -> Circle {
        let (x, y) = to_web_mercator(marker.longitude, marker.latitude);
        let (cx, cy) = self.to_viewport(x, y);
        // a negative radius is invalid SVG, draw nothing instead
        Circle::new()
            .set("cx", cx)
            .set("cy", cy)
            .set("r", marker.radius.max(0.0))
            .set("fill", marker.fill_color)
            .set("fill-opacity", style.fill_opacity)
            .set("stroke", style.color)
            .set("stroke-width", style.weight)
            .set("stroke-opacity", style.opacity)
            .add(Title::new().add(text_node(&marker.popup.to_text())))
    }
}

/// Text nodes are written verbatim, so feed and config text is escaped here.
fn text_node(content: &str) -> NodeText {
    NodeText::new(html_escape(content))
}

fn label(x: f64, y: f64, content: &str) -> Text {
    Text::new()
        .set("x", x)
        .set("y", y)
        .set("font-size", "12")
        .set("font-family", "sans-serif")
        .add(text_node(content))
}

fn draw_layer_control(view: &MapView) -> Group {
    let rows = view.base_layers.len() + 1;
    let x = f64::from(view.width) - CONTROL_WIDTH - 10.0;
    let mut group = Group::new().set("id", "layer-control").add(
        Rect::new()
            .set("x", x)
            .set("y", 10.0)
            .set("width", CONTROL_WIDTH)
            .set("height", LEGEND_ROW * rows as f64 + 16.0)
            .set("fill", "white")
            .set("fill-opacity", 0.9)
            .set("stroke", "#999"),
    );
    let mut y = 28.0;
    for (i, layer) in view.base_layers.iter().enumerate() {
        let mark = if i == view.active_base { '\u{25c9}' } else { '\u{25cb}' };
        group = group.add(label(x + 10.0, y, &format!("{} {}", mark, layer.name)));
        y += LEGEND_ROW;
    }
    group.add(label(
        x + 10.0,
        y + 4.0,
        &format!("\u{2611} {}", view.overlay.name),
    ))
}

fn draw_legend(view: &MapView) -> Group {
    let entries = &view.legend.entries;
    let height = LEGEND_ROW * (entries.len() as f64 + 1.0) + 16.0;
    let top = f64::from(view.height) - height - 24.0;
    let mut group = Group::new()
        .set("id", "legend")
        .add(
            Rect::new()
                .set("x", 10.0)
                .set("y", top)
                .set("width", 90.0)
                .set("height", height)
                .set("fill", "white")
                .set("fill-opacity", 0.9)
                .set("stroke", "#999"),
        )
        .add(label(20.0, top + 20.0, view.legend.title).set("font-weight", "bold"));
    for (i, entry) in entries.iter().enumerate() {
        let row = top + 28.0 + LEGEND_ROW * i as f64;
        group = group
            .add(
                Rect::new()
                    .set("x", 20.0)
                    .set("y", row)
                    .set("width", 18.0)
                    .set("height", 18.0)
                    .set("fill", entry.color)
                    .set("fill-opacity", 0.8),
            )
            .add(label(46.0, row + 14.0, entry.label));
    }
    group
}

/// Base layer attributions carry HTML; keep only their text.
fn plain_attribution(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&copy;", "\u{a9}")
}

fn draw_title(view: &MapView, title: &TextConfig) -> Text {
    let (x, y) = match title.position {
        Some(Placement::At([x, y])) => (x, y),
        _ => ((view.width / 2) as i32, 30),
    };
    Text::new()
        .set("id", "title")
        .set("font-size", title.font_size.as_deref().unwrap_or("22"))
        .set("text-anchor", "middle")
        .set("x", x)
        .set("y", y)
        .add(text_node(&title.content))
}

fn draw_source(view: &MapView, source: &TextConfig) -> Text {
    let (width, height) = (view.width, view.height);
    // Fetch the x, y and text-anchor values:
    let position: (i32, i32, &'static str) = match source.position {
        Some(Placement::At([x, y])) => (x, y, "middle"),
        Some(Placement::Align(align)) => {
            let v = match align {
                HorizontalAlign::Right => (width - width / 25, height - height / 25, "end"),
                HorizontalAlign::Center => (width / 2, height - height / 25, "middle"),
                HorizontalAlign::Left => (width / 25, height - height / 25, "start"),
            };
            (v.0 as i32, v.1 as i32, v.2)
        }
        None => (
            (width - width / 15) as i32,
            (height - height / 15) as i32,
            "end",
        ),
    };
    Text::new()
        .set("id", "source")
        .set("font-size", source.font_size.as_deref().unwrap_or("14"))
        .set("x", position.0)
        .set("y", position.1)
        .set("text-anchor", position.2)
        .add(text_node(&source.content))
}

pub fn render(view: &MapView) -> String {
    let extent = extent_around(view.center, view.zoom, view.width, view.height);
    let converter = Converter::new(view.width, view.height, &extent);
    let base = view.active_base_layer();

    let mut document = Document::new()
        .set("x", "0")
        .set("y", "0")
        .set("width", format!("{}", converter.viewport_width))
        .set("height", format!("{}", converter.viewport_height))
        .set(
            "viewBox",
            format!("0 0 {} {}", converter.viewport_width, converter.viewport_height),
        );

    // Add an underlying rect if a background color is configured:
    if let Some(ref bg_color) = view.background {
        document = document.add(
            Rect::new()
                .set("fill", bg_color.as_str())
                .set("width", "100%")
                .set("height", "100%"),
        );
    }

    document = document
        .add(converter.draw_base_layer(base, view.zoom).set("id", "base-layer"))
        .add(converter.draw_markers(&view.overlay).set("id", "earthquakes"))
        .add(draw_layer_control(view))
        .add(draw_legend(view))
        .add(
            label(
                f64::from(view.width) - 4.0,
                f64::from(view.height) - 4.0,
                &plain_attribution(base.attribution),
            )
            .set("id", "attribution")
            .set("font-size", "9")
            .set("text-anchor", "end"),
        );

    if let Some(ref source) = view.source {
        document = document.add(draw_source(view, source));
    }
    if let Some(ref title) = view.title {
        document = document.add(draw_title(view, title));
    }

    tracing::debug!(
        markers = view.overlay.markers.len(),
        base = base.name,
        "rendered svg map"
    );
    document.to_string()
}
