//! Query server for reverse geocoding.
//!
//! Loads a GeoNames dataset into memory at startup and answers nearest place
//! lookups over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use revgeo::config::Config;
use revgeo::{GeoName, GeocodeError, ReverseGeocoder};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Reverse geocoding query server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GeoNames dump (.txt, .gz or .zip), overrides the config file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Only index major places
    #[arg(long)]
    major_only: bool,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    listen: Option<String>,
}

/// Application state shared across handlers
struct AppState {
    geocoder: ReverseGeocoder,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let mut config = Config::resolve(args.config.as_deref(), args.file)?;
    if args.major_only {
        config.dataset.options.major_only = true;
    }
    let listen = args.listen.unwrap_or(config.server.listen);

    info!("revgeo Query Server");
    info!("Loading dataset from {}", config.dataset.path.display());

    let dataset = config.dataset.clone();
    let geocoder = tokio::task::spawn_blocking(move || {
        ReverseGeocoder::open(&dataset.path, &dataset.options)
    })
    .await?
    .context("Failed to load dataset")?;

    info!("Indexed {} places", geocoder.len());

    let state = Arc::new(AppState { geocoder });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/reverse", get(reverse_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        places: state.geocoder.len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    places: usize,
}

/// Reverse geocoding
async fn reverse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseQueryParams>,
) -> Result<Json<ReverseResponse>, (StatusCode, String)> {
    let neighbor = state
        .geocoder
        .nearest(params.point_lat, params.point_lon)
        .map_err(|e| {
            let status = match e {
                GeocodeError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::error!("Reverse geocoding failed: {}", e);
            (status, e.to_string())
        })?;

    Ok(Json(ReverseResponse {
        region_name: ReverseGeocoder::region_name(neighbor.record),
        distance: neighbor.distance(),
        place: neighbor.record.clone(),
    }))
}

#[derive(Deserialize)]
struct ReverseQueryParams {
    /// Point latitude
    #[serde(rename = "point.lat")]
    point_lat: f64,
    /// Point longitude
    #[serde(rename = "point.lon")]
    point_lon: f64,
}

#[derive(Serialize)]
struct ReverseResponse {
    #[serde(flatten)]
    place: GeoName,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_name: Option<&'static str>,
    /// Planar distance in degrees
    distance: f64,
}
