//! Fetch command handler
//!
//! Downloads the historical window and refreshes the strike cache.

use crate::cli::{Context, OutputArgs, PeriodArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::valid_strikes;
use crate::report::{FetchReport, Report, ReportBody};
use clap::Args;

/// Fetch command arguments
#[derive(Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Download even if a cache exists
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the fetch command
pub async fn run(args: FetchArgs, offline: bool) -> Result<()> {
    if args.output.handled_listing() {
        return Ok(());
    }

    let ctx = Context::new(Config::load()?, &args.period, offline)?;
    let (start, end) = ctx.config.sources.date_range()?;
    let store = ctx.event_store()?;

    let result = if args.force {
        store.refresh(start, end).await
    } else {
        let raw = store.load(start, end).await;
        if raw.is_empty() {
            Err(Error::DataUnavailable(
                "No strikes downloaded or cached".to_string(),
            ))
        } else {
            Ok(raw)
        }
    };

    let mut body = FetchReport {
        start: Some(start),
        end: Some(end),
        cache_file: store.cache_path().map(|p| p.display().to_string()),
        ..FetchReport::default()
    };
    let report = match result {
        Ok(raw) => {
            body.downloaded = raw.len();
            body.valid = valid_strikes(&raw, &ctx.engine.region_bounds).len();
            Report::new(ReportBody::Fetch(body))
        }
        Err(e) => Report::degraded(ReportBody::Fetch(body), e)?,
    };

    args.output.emit(&report, &ctx.config)
}
