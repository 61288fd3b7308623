//! Stats command handler

use crate::cli::{Context, OutputArgs, PeriodArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::stats::{compute, StrikeStats};
use crate::report::{Report, ReportBody};
use clap::Args;

/// Stats command arguments
#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the stats command
pub async fn run(args: StatsArgs, offline: bool) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let ctx = Context::new(Config::load()?, &args.period, offline)?;
    let strikes = ctx.load_strikes().await?;

    let report = if strikes.is_empty() {
        Report::degraded(
            ReportBody::Stats(StrikeStats::default()),
            Error::DataUnavailable("No strikes inside the region".to_string()),
        )?
    } else {
        Report::new(ReportBody::Stats(compute(&strikes)))
    };

    args.output.emit(&report, &ctx.config)
}
