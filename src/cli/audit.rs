//! Audit command handler
//!
//! Measures how exposed existing turbines are to recorded strikes.

use crate::cli::{Context, OutputArgs, PeriodArgs};
use crate::config::Config;
use crate::coord::utm::UtmProjection;
use crate::coord::Coordinates;
use crate::density::cluster_strikes;
use crate::error::{Error, Result};
use crate::geocode::get_geocoder;
use crate::report::{Report, ReportBody};
use crate::siting::audit::{annotate_localities, run_audit};
use crate::siting::AuditReport;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

/// Audit command arguments
#[derive(Args)]
pub struct AuditArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Saved Overpass JSON with turbines (skips the live query)
    #[arg(long)]
    pub turbines: Option<PathBuf>,

    /// Number of turbines in the exposure ranking
    #[arg(long, short = 'n')]
    pub top: Option<usize>,

    /// Look up place names for ranked turbines (1 request/s)
    #[arg(long)]
    pub geocode: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the audit command
pub async fn run(args: AuditArgs, offline: bool) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(top) = args.top {
        config.audit.top_turbines = top;
    }
    let ctx = Context::new(config, &args.period, offline)?;
    let engine = &ctx.engine;

    let turbines = ctx.load_turbines(args.turbines.as_deref()).await?;
    if turbines.is_empty() {
        let report = Report::degraded(
            ReportBody::Audit(AuditReport::default()),
            Error::DataUnavailable("No turbines to audit".to_string()),
        )?;
        return args.output.emit(&report, &ctx.config);
    }

    let strikes = ctx.load_strikes().await?;
    let positions: Vec<Coordinates> = strikes.iter().map(|s| s.position).collect();

    let clustering = match cluster_strikes(&strikes, engine) {
        Ok(c) => Some(c),
        Err(e) if e.is_recoverable() => {
            warn!("{}; skipping hazard zones", e);
            None
        }
        Err(e) => return Err(e),
    };

    let mut audit = run_audit(
        &turbines,
        &positions,
        clustering.as_ref(),
        &UtmProjection::north(engine.utm_zone)?,
        &ctx.config.audit,
    )?;

    if args.geocode {
        if offline {
            warn!("Offline; skipping place names");
        } else {
            info!("Looking up {} place names", audit.top_turbines.len());
            let geocoder = get_geocoder(&ctx.config.sources.nominatim_url)?;
            annotate_localities(&mut audit.top_turbines, &geocoder).await;
        }
    }

    let report = if strikes.is_empty() {
        Report::degraded(
            ReportBody::Audit(audit),
            Error::DataUnavailable("No strikes inside the region".to_string()),
        )?
    } else {
        Report::new(ReportBody::Audit(audit))
    };
    args.output.emit(&report, &ctx.config)
}
