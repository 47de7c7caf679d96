//! One-shot nearest place lookup from the command line.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use revgeo::config::Config;
use revgeo::{GeoName, ReverseGeocoder};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Find the known place closest to a coordinate")]
struct Args {
    /// Latitude of the query point
    #[arg(allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the query point
    #[arg(allow_negative_numbers = true)]
    lon: f64,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GeoNames dump (.txt, .gz or .zip), overrides the config file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Only index major places
    #[arg(long)]
    major_only: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log progress while loading
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct LookupResult<'a> {
    #[serde(flatten)]
    place: &'a GeoName,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_name: Option<&'static str>,
    distance: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::INFO } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::resolve(args.config.as_deref(), args.file.clone())?;
    if args.major_only {
        config.dataset.options.major_only = true;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} lines ({per_sec})")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    let geocoder = ReverseGeocoder::open_with(&config.dataset.path, &config.dataset.options, |_| pb.inc(1))
        .with_context(|| format!("Failed to load {}", config.dataset.path.display()))?;
    pb.finish_and_clear();
    info!("Indexed {} places", geocoder.len());

    let neighbor = geocoder.nearest(args.lat, args.lon)?;
    let region_name = ReverseGeocoder::region_name(neighbor.record);

    if args.json {
        let result = LookupResult {
            place: neighbor.record,
            region_name,
            distance: neighbor.distance(),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let place = neighbor.record;
        let region = region_name.unwrap_or(place.admin1_code.as_str());
        println!(
            "Nearest to {}, {} is {} ({}, {}) at {:.4}, {:.4}",
            args.lat,
            args.lon,
            place.name,
            region,
            place.country_code,
            place.latitude(),
            place.longitude()
        );
    }

    Ok(())
}
