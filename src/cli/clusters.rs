//! Clusters command handler
//!
//! Finds high-density strike zones over the configured window.

use crate::cli::{Context, OutputArgs, PeriodArgs};
use crate::config::Config;
use crate::coord::Coordinates;
use crate::density::cluster_strikes;
use crate::error::Result;
use crate::report::{ClusterReport, Report, ReportBody};
use clap::Args;
use tracing::info;

/// Clusters command arguments
#[derive(Args)]
pub struct ClustersArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Neighborhood radius in degrees
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Minimum neighborhood size for a core strike
    #[arg(long)]
    pub min_samples: Option<usize>,

    /// Attach sampled strike positions (for heatmaps)
    #[arg(long)]
    pub points: bool,

    /// Maximum number of attached positions
    #[arg(long, requires = "points")]
    pub max_points: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the clusters command
pub async fn run(args: ClustersArgs, offline: bool) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(radius) = args.radius {
        config.clustering.radius_deg = radius;
    }
    if let Some(min_samples) = args.min_samples {
        config.clustering.min_samples = min_samples;
    }
    let ctx = Context::new(config, &args.period, offline)?;

    let strikes = ctx.load_strikes().await?;
    let positions: Vec<Coordinates> = strikes.iter().map(|s| s.position).collect();
    let cap = args
        .points
        .then(|| args.max_points.unwrap_or(ctx.config.limits.max_display_events));

    let report = match cluster_strikes(&strikes, &ctx.engine) {
        Ok(clustering) => {
            info!(
                "{} high-density zones, {} isolated strikes",
                clustering.clusters.len(),
                clustering.noise_count()
            );
            Report::new(ReportBody::Clusters(ClusterReport::new(
                &clustering,
                &positions,
                cap,
            )))
        }
        Err(e) => Report::degraded(
            ReportBody::Clusters(ClusterReport {
                total_strikes: strikes.len(),
                ..ClusterReport::default()
            }),
            e,
        )?,
    };

    args.output.emit(&report, &ctx.config)
}
