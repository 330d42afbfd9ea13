use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::config_params::Config;
use crate::error::{Error, Result};
use crate::feed::{Catalog, FeedSource};
use crate::layer::build_markers;
use crate::map::MapView;
use crate::render::{self, OutputFormat};

/// Owns the configuration and the one map built from it.
pub struct QuakeMap {
    config: Config,
    view: Option<MapView>,
}

impl QuakeMap {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(QuakeMap { config, view: None })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    /// Fetch the feed and compose the map from it.
    pub async fn load(&mut self, source: &FeedSource) -> Result<&MapView> {
        let timeout = self.config.feed.timeout_secs.map(Duration::from_secs);
        let catalog = source.load(timeout).await?;
        self.load_catalog(catalog)
    }

    pub fn load_catalog(&mut self, catalog: Catalog) -> Result<&MapView> {
        let overlay = build_markers(&catalog.quakes);
        let view = MapView::compose(&self.config, overlay)?;
        Ok(self.view.insert(view))
    }

    pub fn output_format(&self) -> OutputFormat {
        self.config.map.output_format()
    }

    /// Render the loaded map in the configured format.
    pub fn mount(&self) -> Result<String> {
        let view = self.view.as_ref().ok_or(Error::NotLoaded)?;
        render::render(view, self.output_format())
    }

    /// Render the loaded map and write it to the configured output path.
    pub fn mount_to_file(&self) -> Result<PathBuf> {
        let document = self.mount()?;
        let path = self.config.map.output.clone();
        fs::write(&path, document).map_err(|err| Error::io(&path, err))?;
        info!(path = %path.display(), format = ?self.output_format(), "map written");
        Ok(path)
    }

    pub fn teardown(&mut self) -> Option<MapView> {
        self.view.take()
    }
}
