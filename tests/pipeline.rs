//! End to end: feed file in, map document out.

use std::fs;

use quakemap::classification::{depth_color, legend_entries, DEPTH_BREAKS};
use quakemap::feed::parse_feed;
use quakemap::{Config, FeedSource, OutputFormat, QuakeMap};

fn collection(features: &str) -> String {
    format!(r#"{{"type": "FeatureCollection", "features": [{}]}}"#, features)
}

const TESTVILLE: &str = r#"{"type": "Feature",
    "properties": {"place": "10km N of Testville", "time": 0, "mag": 5},
    "geometry": {"type": "Point", "coordinates": [-100, 35, 15]}}"#;

const DEEP: &str = r#"{"type": "Feature",
    "properties": {"place": "Deep one", "time": 0, "mag": 6.1},
    "geometry": {"type": "Point", "coordinates": [142.3, 38.1, 90]}}"#;

#[test]
fn testville_scenario() {
    let mut app = QuakeMap::new(Config::default()).unwrap();
    let view = app
        .load_catalog(parse_feed(&collection(TESTVILLE)).unwrap())
        .unwrap();
    assert_eq!(view.overlay.markers.len(), 1);
    let marker = &view.overlay.markers[0];
    assert_eq!(marker.radius, 15.0);
    assert_eq!(marker.fill_color, "#0000FF");

    let popup = marker.popup.to_html();
    assert!(popup.contains("Testville"));
    assert!(popup.contains("1970"));
    assert!(popup.contains("Magnitude: 5"));
    assert!(popup.contains("Latitude: 35"));
    assert!(popup.contains("Longitude: -100"));
}

#[test]
fn empty_feed_still_renders_the_map() {
    let mut app = QuakeMap::new(Config::default()).unwrap();
    let view = app.load_catalog(parse_feed(&collection("")).unwrap()).unwrap();
    assert!(view.overlay.markers.is_empty());
    assert_eq!(view.base_layers.len(), 2);

    let page = app.mount().unwrap();
    assert!(page.contains("Street Map"));
    assert!(page.contains("Topographic Map"));
    assert!(page.contains("overlayMaps[\"Earthquakes\"]"));
    for entry in legend_entries() {
        assert!(page.contains(entry.color));
    }
}

#[test]
fn depth_ninety_scenario() {
    let catalog = parse_feed(&collection(DEEP)).unwrap();
    let mut app = QuakeMap::new(Config::default()).unwrap();
    let view = app.load_catalog(catalog).unwrap();
    assert_eq!(view.overlay.markers[0].fill_color, "#FF0000");
}

#[test]
fn legend_and_buckets_agree() {
    let legend = legend_entries();
    assert_eq!(legend.len(), DEPTH_BREAKS.len() + 1);
    assert_eq!(legend[0].color, depth_color(DEPTH_BREAKS[0] - 1.0));
    for (i, bound) in DEPTH_BREAKS.iter().enumerate() {
        assert_eq!(legend[i + 1].color, depth_color(*bound));
    }
}

#[tokio::test]
async fn file_to_svg() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("quakes.geojson");
    let output = dir.path().join("quakes.svg");
    fs::write(&input, collection(&format!("{},{}", TESTVILLE, DEEP))).unwrap();

    let mut config = Config::default();
    config.map.output = output.clone();
    let mut app = QuakeMap::new(config).unwrap();
    assert_eq!(app.output_format(), OutputFormat::Svg);

    app.load(&FeedSource::File(input)).await.unwrap();
    let written = app.mount_to_file().unwrap();
    assert_eq!(written, output);

    let doc = fs::read_to_string(&output).unwrap();
    assert!(doc.contains("<svg"));
    assert_eq!(doc.matches("<circle").count(), 2);
    assert!(doc.contains("id=\"legend\""));
}

#[tokio::test]
async fn file_to_html() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("quakes.geojson");
    let output = dir.path().join("index.html");
    fs::write(&input, collection(TESTVILLE)).unwrap();

    let config: Config = format!(
        "[feed]\npath = {:?}\n\n[map]\noutput = {:?}\ncontainer = \"quakes\"\n",
        input.display().to_string(),
        output.display().to_string()
    )
    .parse()
    .unwrap();
    let source = FeedSource::from_config(&config.feed);
    let mut app = QuakeMap::new(config).unwrap();
    app.load(&source).await.unwrap();
    app.mount_to_file().unwrap();

    let page = fs::read_to_string(&output).unwrap();
    assert!(page.contains("<div id=\"quakes\"></div>"));
    assert!(page.contains("Testville"));
}

#[tokio::test]
async fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = QuakeMap::new(Config::default()).unwrap();
    let err = app
        .load(&FeedSource::File(dir.path().join("absent.geojson")))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("absent.geojson"));
    assert!(app.view().is_none());
}
