use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use quakemap::{Config, FeedSource, OutputFormat, QuakeMap};

#[derive(Parser)]
#[command(name = "quakemap", version, about = "Draw the USGS earthquake feed on a map")]
struct Cli {
    /// Configuration file to use (.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Feed URL, overriding the configured one
    #[arg(short, long)]
    url: Option<String>,
    /// Read the feed from a local GeoJSON file instead of the network
    #[arg(short, long, value_name = "FILE", conflicts_with = "url")]
    input: Option<PathBuf>,
    /// Output file; its extension picks the format unless --format is given
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(url) = self.url {
            config.feed.url = url;
            config.feed.path = None;
        }
        if let Some(input) = self.input {
            config.feed.path = Some(input);
        }
        if let Some(output) = self.output {
            config.map.output = output;
        }
        if self.format.is_some() {
            config.map.format = self.format;
        }
        if self.timeout.is_some() {
            config.feed.timeout_secs = self.timeout;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let config = cli.into_config()?;
    let source = FeedSource::from_config(&config.feed);
    let mut app = QuakeMap::new(config)?;

    let view = app
        .load(&source)
        .await
        .with_context(|| format!("loading earthquake feed from {}", source))?;
    info!(markers = view.overlay.markers.len(), "map composed");
    let path = app.mount_to_file()?;
    println!("{}", path.display());
    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
