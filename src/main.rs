//! strike-sentinel CLI entry point
//!
//! Lightning risk density and wind farm siting

use strike_sentinel::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
