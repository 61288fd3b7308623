//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions. Shared pieces
//! (logging, strike and turbine loading, report output) live here.

pub mod audit;
pub mod clusters;
pub mod config;
pub mod fetch;
pub mod place;
pub mod propose;
pub mod stats;

use crate::config::{Config, EngineConfig};
use crate::error::{Error, Result};
use crate::events::meteogalicia::LightningFetcher;
use crate::events::store::EventStore;
use crate::events::{valid_strikes, Strike};
use crate::format::{available_formats, get_formatter};
use crate::report::Report;
use crate::turbines::{self, OverpassClient, Turbine};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Lightning risk density and wind farm siting
#[derive(Parser)]
#[command(name = "strike-sentinel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Never contact remote services; use cached data only
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and cache historical strikes
    Fetch(fetch::FetchArgs),

    /// Find high-density strike zones
    Clusters(clusters::ClustersArgs),

    /// Rank wind farm sites by resource and strike risk
    Place(place::PlaceArgs),

    /// Propose expansion sites near existing turbines
    Propose(propose::ProposeArgs),

    /// Audit strike exposure of existing turbines
    Audit(audit::AuditArgs),

    /// Strike statistics
    Stats(stats::StatsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Output options shared by every report command
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

impl OutputArgs {
    /// Print the format list if requested; returns true when nothing else should run
    pub fn handled_listing(&self) -> bool {
        if self.list_formats {
            println!("Available output formats:");
            for format in available_formats() {
                println!("  {:5} - {}", format.name, format.description);
            }
        }
        self.list_formats
    }

    /// Render and write a report
    pub fn emit(&self, report: &Report, config: &Config) -> Result<()> {
        let format = self.format.as_deref().unwrap_or(&config.output.format);
        let formatter = get_formatter(format)
            .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
        let output = formatter.format(report)?;

        if let Some(path) = &self.output {
            std::fs::write(path, &output)?;
            eprintln!("Output written to {}", path.display());
        } else {
            println!("{}", output);
        }
        Ok(())
    }
}

/// Historical window overrides
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// First day (YYYY-MM-DD), defaults to sources.start_date
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD), defaults to sources.end_date
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

impl PeriodArgs {
    /// Fold the overrides into the config so cache naming follows them
    pub fn apply(&self, config: &mut Config) {
        if let Some(start) = self.start {
            config.sources.start_date = start.format("%Y-%m-%d").to_string();
        }
        if let Some(end) = self.end {
            config.sources.end_date = end.format("%Y-%m-%d").to_string();
        }
    }
}

/// Config and validated engine parameters for one command
pub struct Context {
    pub config: Config,
    pub engine: EngineConfig,
    pub offline: bool,
}

impl Context {
    pub fn new(mut config: Config, period: &PeriodArgs, offline: bool) -> Result<Self> {
        period.apply(&mut config);
        let engine = config.engine()?;
        Ok(Self {
            config,
            engine,
            offline,
        })
    }

    /// Strike store over the configured feed and cache
    pub fn event_store(&self) -> Result<EventStore<LightningFetcher>> {
        let sources = &self.config.sources;
        let fetcher = LightningFetcher::new(
            &sources.lightning_url,
            sources.chunk_days,
            sources.request_delay_ms,
            sources.timeout_secs,
        )?;
        Ok(EventStore::with_cache_path(fetcher, sources.cache_path()?).offline(self.offline))
    }

    /// Strikes inside the region for the configured window
    pub async fn load_strikes(&self) -> Result<Vec<Strike>> {
        let (start, end) = self.config.sources.date_range()?;
        let raw = self.event_store()?.load(start, end).await;
        let strikes = valid_strikes(&raw, &self.engine.region_bounds);
        info!(
            "{} of {} strikes inside the region",
            strikes.len(),
            raw.len()
        );
        Ok(strikes)
    }

    /// Turbines from a saved Overpass answer, or from the live API
    pub async fn load_turbines(&self, file: Option<&Path>) -> Result<Vec<Turbine>> {
        if let Some(path) = file {
            let turbines = turbines::load_file(path)?;
            info!("Loaded {} turbines from {}", turbines.len(), path.display());
            return Ok(turbines);
        }
        if self.offline {
            warn!("Offline without --turbines; no turbine data");
            return Ok(Vec::new());
        }
        let client = OverpassClient::new(
            &self.config.sources.overpass_url,
            self.config.sources.timeout_secs.max(30),
        )?;
        Ok(client.fetch(&self.engine.region_bounds).await)
    }
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Fetch(args) => fetch::run(args, cli.offline).await,
        Commands::Clusters(args) => clusters::run(args, cli.offline).await,
        Commands::Place(args) => place::run(args, cli.offline).await,
        Commands::Propose(args) => propose::run(args, cli.offline).await,
        Commands::Audit(args) => audit::run(args, cli.offline).await,
        Commands::Stats(args) => stats::run(args, cli.offline).await,
        Commands::Config(args) => config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from([
            "strike-sentinel",
            "clusters",
            "--offline",
            "-v",
            "--start",
            "2023-06-01",
            "-f",
            "csv",
        ]);
        assert!(cli.offline);
        assert!(cli.verbose);
        match cli.command {
            Commands::Clusters(args) => {
                assert_eq!(args.period.start, NaiveDate::from_ymd_opt(2023, 6, 1));
                assert_eq!(args.output.format.as_deref(), Some("csv"));
            }
            _ => panic!("expected clusters"),
        }
    }

    #[test]
    fn test_period_overrides_config() {
        let mut config = Config::default();
        let period = PeriodArgs {
            start: NaiveDate::from_ymd_opt(2022, 7, 1),
            end: None,
        };
        period.apply(&mut config);
        assert_eq!(config.sources.start_date, "2022-07-01");
        assert_eq!(config.sources.end_date, Config::default().sources.end_date);
    }
}
