//! Propose command handler
//!
//! Searches for expansion sites near existing turbines and clear of strikes.

use crate::cli::{Context, OutputArgs, PeriodArgs};
use crate::config::Config;
use crate::coord::utm::UtmProjection;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::report::{ProposalReport, Report, ReportBody};
use crate::safety::SafetyFilter;
use crate::siting::propose::propose_sites;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Propose command arguments
#[derive(Args)]
pub struct ProposeArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Saved Overpass JSON with turbines (skips the live query)
    #[arg(long)]
    pub turbines: Option<PathBuf>,

    /// Number of sites to find
    #[arg(long, short = 'n')]
    pub sites: Option<usize>,

    /// Minimum distance to any recorded strike (meters)
    #[arg(long, short = 'd')]
    pub distance: Option<f64>,

    /// Random seed for reproducible proposals
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the propose command
pub async fn run(args: ProposeArgs, offline: bool) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(sites) = args.sites {
        config.siting.target_sites = sites;
    }
    if let Some(distance) = args.distance {
        config.safety.distance_m = distance;
    }
    let ctx = Context::new(config, &args.period, offline)?;
    let engine = &ctx.engine;

    let turbines = ctx.load_turbines(args.turbines.as_deref()).await?;
    let strikes = ctx.load_strikes().await?;

    let positions: Vec<Coordinates> = strikes.iter().map(|s| s.position).collect();
    let filter = SafetyFilter::new(
        &positions,
        engine.safety_distance_m,
        UtmProjection::north(engine.utm_zone)?,
    )?;
    let turbine_positions: Vec<Coordinates> = turbines.iter().map(|t| t.position).collect();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut body = ProposalReport {
        turbine_count: turbines.len(),
        strike_count: strikes.len(),
        safety_distance_m: engine.safety_distance_m,
        seed: args.seed,
        ..ProposalReport::default()
    };
    let report = match propose_sites(&turbine_positions, &filter, &ctx.config.siting, &mut rng) {
        Ok(run) => {
            body.run = run;
            Report::new(ReportBody::Proposal(body))
        }
        Err(Error::InsufficientData { .. }) => Report::degraded(
            ReportBody::Proposal(body),
            Error::DataUnavailable("No existing turbines to expand from".to_string()),
        )?,
        Err(e) => return Err(e),
    };

    args.output.emit(&report, &ctx.config)
}
