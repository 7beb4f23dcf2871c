//! Command-line front end for the HEIF map provider.
//!
//! Loads a provider definition, runs one map query and writes the image.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use heif_map::{HeifMapProvider, MapQuery, ProviderConfig};
use map_common::BoundingBox;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "heif-map")]
#[command(about = "Render a georeferenced map image from a HEIF source")]
struct Args {
    /// Provider YAML file (falls back to HEIF_MAP_* environment variables)
    #[arg(short, long, env = "HEIF_MAP_CONFIG")]
    config: Option<PathBuf>,

    /// Bounding box as minx,miny,maxx,maxy
    #[arg(long, allow_hyphen_values = true)]
    bbox: String,

    /// Output width in pixels
    #[arg(long, default_value_t = 500, allow_hyphen_values = true)]
    width: i64,

    /// Output height in pixels
    #[arg(long, default_value_t = 300, allow_hyphen_values = true)]
    height: i64,

    /// CRS of the bounding box
    #[arg(long, default_value = "CRS84")]
    crs: String,

    /// Output format (png or jpeg)
    #[arg(short, long, default_value = "png")]
    format: String,

    /// Requested time (accepted, not used)
    #[arg(long)]
    datetime: Option<String>,

    /// Produce opaque output instead of transparent nodata
    #[arg(long)]
    opaque: bool,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn to_query(&self) -> Result<MapQuery> {
        let bbox = BoundingBox::from_bbox_string(&self.bbox)
            .with_context(|| format!("Invalid --bbox '{}'", self.bbox))?;

        Ok(MapQuery {
            bbox: bbox.as_array().to_vec(),
            width: self.width,
            height: self.height,
            crs: self.crs.clone(),
            datetime: self.datetime.clone(),
            format: self.format.clone(),
            transparent: !self.opaque,
            ..MapQuery::default()
        })
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => ProviderConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ProviderConfig::from_env().context("Failed to load configuration from environment")?,
    };

    let provider = HeifMapProvider::new(config)?;
    info!(provider = %provider, "Loaded provider");

    let query = args.to_query()?;
    let start = Instant::now();
    let image = provider.query(&query)?;
    info!(
        bytes = image.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Rendered map"
    );

    std::fs::write(&args.output, &image)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), "Wrote map image");

    Ok(())
}
