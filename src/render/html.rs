use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::map::MapView;

const TEMPLATE_NAME: &str = "map";
const DEFAULT_TITLE: &str = "Earthquakes";

pub fn get_template() -> &'static str {
    include_str!("map.html.hbs")
}

#[derive(Serialize)]
struct MarkerData<'a> {
    lat: f64,
    lng: f64,
    radius: f64,
    fill: &'a str,
    popup: String,
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

pub fn render(view: &MapView) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string(TEMPLATE_NAME, get_template())
        .map_err(Box::new)?;

    let markers: Vec<MarkerData> = view
        .overlay
        .markers
        .iter()
        .map(|marker| MarkerData {
            lat: marker.latitude,
            lng: marker.longitude,
            radius: marker.radius,
            fill: marker.fill_color,
            popup: marker.popup.to_html(),
        })
        .collect();
    let source = match view.source {
        Some(ref source) => Some(script_json(&source.content)?),
        None => None,
    };

    let page = handlebars.render(
        TEMPLATE_NAME,
        &json!({
            "title": view.title.as_ref().map_or(DEFAULT_TITLE, |t| t.content.as_str()),
            "container": view.container,
            "container_id": script_json(&view.container)?,
            "legend_id": script_json(&format!("{}-legend", view.container))?,
            "center": view.center,
            "zoom": view.zoom,
            "base_layers": script_json(&view.base_layers)?,
            "active_base": script_json(view.active_base_layer().name)?,
            "overlay_name": script_json(view.overlay.name)?,
            "marker_style": script_json(&view.overlay.style)?,
            "markers": script_json(&markers)?,
            "control": view.control,
            "legend": view.legend,
            "source": source,
        }),
    )?;
    tracing::debug!(bytes = page.len(), markers = markers.len(), "rendered html map");
    Ok(page)
}
