//! Render command - run a map session over the datasets and export the overlay.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::info;

use housingmap::config::{ConfigFile, MapViewport};
use housingmap::engine::{ContainerHandle, HeadlessEngine, MapHandle, ViewHandle};
use housingmap::export::overlay_to_geojson;
use housingmap::layer::LayerBuilder;
use housingmap::logging::init_logging;
use housingmap::marker::{MarkerError, MarkerFactory};
use housingmap::records::{RecordSelection, RecordStore};
use housingmap::session::{MapSession, SessionOptions};

use super::common::{resolve_data_path, resolve_selection, resolve_viewport, ViewportOverrides};
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Housing dataset (JSON array)
    #[arg(long)]
    pub housing: Option<PathBuf>,

    /// Energy dataset (JSON array)
    #[arg(long)]
    pub energy: Option<PathBuf>,

    /// Zoom level
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Center longitude
    #[arg(long, allow_hyphen_values = true)]
    pub center_lon: Option<f64>,

    /// Center latitude
    #[arg(long, allow_hyphen_values = true)]
    pub center_lat: Option<f64>,

    /// Basemap style (see `housingmap config basemaps`)
    #[arg(long)]
    pub basemap: Option<String>,

    /// Draw only the housing record with this 1-based id
    #[arg(long)]
    pub record: Option<String>,

    /// Write the overlay as GeoJSON to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Container element id the view binds to
    #[arg(long, default_value = "mapViewNode")]
    pub container: String,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Fully resolved inputs of one render.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub viewport: MapViewport,
    pub container: String,
    pub housing_path: PathBuf,
    pub energy_path: PathBuf,
    pub selection: RecordSelection,
    pub link_base: String,
    /// GeoJSON destination, if any.
    pub output: Option<PathBuf>,
}

/// What a finished render produced.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub map: MapHandle,
    pub view: ViewHandle,
    pub markers: usize,
    pub skipped: Vec<MarkerError>,
    /// Whether the "map loaded" event fired.
    pub loaded: bool,
}

/// Run the render command.
pub fn run(args: RenderArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let _logging = init_logging(&config.logging.directory, args.verbose)?;
    info!(version = housingmap::VERSION, "housingmap render");

    let viewport = resolve_viewport(
        &ViewportOverrides {
            zoom: args.zoom,
            center_lon: args.center_lon,
            center_lat: args.center_lat,
            basemap: args.basemap.clone(),
        },
        &config,
    );
    let job = RenderJob {
        viewport,
        container: args.container,
        housing_path: resolve_data_path(args.housing, &config.data.housing, "housing")?,
        energy_path: resolve_data_path(args.energy, &config.data.energy, "energy")?,
        selection: resolve_selection(args.record.as_deref())?,
        link_base: config.popup.link_base.clone(),
        output: args.output,
    };

    let summary = execute(&job, |token| {
        ctrlc::set_handler(move || token.cancel())
            .map_err(|e| CliError::Runtime(format!("Failed to install Ctrl-C handler: {}", e)))
    })?;

    print_summary(&summary);
    if let Some(path) = &job.output {
        println!("Overlay written to {}", path.display());
    }
    Ok(())
}

/// Runs one map session over the job's datasets and writes the export.
///
/// `on_start` receives the session's cancellation token before
/// initialization begins.
pub fn execute<F>(job: &RenderJob, on_start: F) -> Result<RenderSummary, CliError>
where
    F: FnOnce(CancellationToken) -> Result<(), CliError>,
{
    let store = Arc::new(RecordStore::from_json_files(&job.housing_path, &job.energy_path)?);
    let options = SessionOptions::default()
        .with_selection(job.selection)
        .with_layer_builder(LayerBuilder::new(MarkerFactory::new(job.link_base.clone())));
    let session = MapSession::with_options(Arc::new(HeadlessEngine::new()), store, options);
    let mut loaded = session.take_loaded_listener();

    on_start(session.cancellation_token())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let ready = runtime.block_on(
        session.initialize(&job.viewport, ContainerHandle::new(job.container.clone())),
    )?;
    let loaded = loaded
        .as_mut()
        .map(|rx| matches!(rx.try_recv(), Ok(true)))
        .unwrap_or(false);

    if let Some(path) = &job.output {
        write_geojson(&ready.overlay, path)?;
    }

    let summary = RenderSummary {
        map: ready.map,
        view: ready.view,
        markers: ready.markers,
        skipped: ready.skipped,
        loaded,
    };

    session.teardown();
    Ok(summary)
}

fn write_geojson(overlay: &housingmap::layer::GraphicsOverlay, path: &Path) -> Result<(), CliError> {
    let doc = overlay_to_geojson(overlay);
    let text = serde_json::to_string_pretty(&doc)
        .map_err(|e| CliError::Runtime(format!("Failed to encode GeoJSON: {}", e)))?;
    std::fs::write(path, text)?;
    Ok(())
}

fn print_summary(summary: &RenderSummary) {
    let status = if summary.loaded {
        style("loaded").green()
    } else {
        style("not loaded").red()
    };
    println!("Map {} ({}, {})", status, summary.map, summary.view);
    println!("Markers: {}", summary.markers);

    if !summary.skipped.is_empty() {
        println!("{} {} record(s):", style("Skipped").yellow(), summary.skipped.len());
        for skipped in &summary.skipped {
            println!("  {}", skipped);
        }
    }
}
