//! Place command handler
//!
//! Ranks mesh points over the region by wind resource and strike risk.

use crate::cli::{Context, OutputArgs, PeriodArgs};
use crate::config::{Config, EngineConfig};
use crate::density::{risk_grid, RiskField};
use crate::error::{Error, Result};
use crate::events::Strike;
use crate::raster::{load_raster, Raster};
use crate::region::{RegionMask, RegionPolygon};
use crate::report::{PlacementReport, Report, ReportBody};
use crate::scoring::{ResourceRange, Scorer};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Place command arguments
#[derive(Args)]
pub struct PlaceArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Wind resource raster (GeoTIFF or .asc), defaults to inputs.wind_raster
    #[arg(long)]
    pub raster: Option<PathBuf>,

    /// Region polygon (GeoJSON), defaults to inputs.region_geojson
    #[arg(long)]
    pub region: Option<PathBuf>,

    /// Number of sites to report
    #[arg(long, short = 'k')]
    pub top: Option<usize>,

    /// Mesh points per axis
    #[arg(long)]
    pub resolution: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

fn configured_path(arg: Option<PathBuf>, configured: &str) -> Option<PathBuf> {
    arg.or_else(|| (!configured.is_empty()).then(|| PathBuf::from(configured)))
}

/// Run the place command
pub async fn run(args: PlaceArgs, offline: bool) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(top) = args.top {
        config.scoring.top_k = top;
    }
    if let Some(resolution) = args.resolution {
        config.scoring.mesh_resolution = resolution;
    }
    let ctx = Context::new(config, &args.period, offline)?;
    let engine = &ctx.engine;

    let raster_path = configured_path(args.raster, &ctx.config.inputs.wind_raster).ok_or_else(|| {
        Error::Config("No wind raster; pass --raster or set inputs.wind_raster".to_string())
    })?;
    let raster = load_raster(&raster_path)?;
    info!(
        "Loaded {}x{} raster from {}",
        raster.width(),
        raster.height(),
        raster_path.display()
    );

    let mask: Box<dyn RegionMask> =
        match configured_path(args.region, &ctx.config.inputs.region_geojson) {
            Some(path) => Box::new(RegionPolygon::load(&path)?),
            None => Box::new(engine.region_bounds),
        };

    let strikes = ctx.load_strikes().await?;
    let report = placement(&raster, &raster_path, mask.as_ref(), &strikes, engine)?;
    args.output.emit(&report, &ctx.config)
}

/// Rank the mesh by resource and strike risk
///
/// Without strikes the risk grid is flat zero, so the ranking is still
/// produced but the report is flagged `data_unavailable`.
pub fn placement(
    raster: &Raster,
    raster_path: &Path,
    mask: &dyn RegionMask,
    strikes: &[Strike],
    engine: &EngineConfig,
) -> Result<Report> {
    let empty = PlacementReport {
        region: engine.region_bounds,
        mesh_resolution: engine.mesh_resolution,
        strike_count: strikes.len(),
        ..PlacementReport::default()
    };
    let Some((min, max)) = raster.valid_range() else {
        let err = Error::DataUnavailable(format!(
            "Raster {} has no valid cells",
            raster_path.display()
        ));
        return Report::degraded(ReportBody::Placement(empty), err);
    };

    let grid = risk_grid(strikes, engine)?;
    let risk = RiskField {
        grid: &grid,
        mode: engine.outside_bounds,
    };
    let scorer = Scorer::new(raster, &risk, mask, ResourceRange::new(min, max)?);
    let ranking = scorer.rank(&engine.region_bounds, engine.mesh_resolution, engine.top_k);
    info!(
        "Scored {} of {} mesh points",
        ranking.summary.scored, ranking.summary.evaluated
    );

    let body = ReportBody::Placement(PlacementReport::new(
        engine.region_bounds,
        engine.mesh_resolution,
        strikes.len(),
        ranking,
    ));
    if strikes.is_empty() {
        warn!("No strike data; risk is unknown and ranked as zero");
        return Report::degraded(
            body,
            Error::DataUnavailable("No strikes inside the region; risk not assessed".to_string()),
        );
    }
    Ok(Report::new(body))
}
