//! Open an MRVM session against a worker process, sample bids, solve for the
//! efficient allocation and write a JSON summary.

use chrono::Local;
use clap::Parser;
use mrvm_bridge::config::load_config;
use mrvm_bridge::logger;
use mrvm_bridge::report::{BidderSample, build_report, write_report_json};
use mrvm_bridge::{ModelAdapter, ProcessModel, RandomBid, SessionConfig};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a session configuration (.pkl or .json)
    #[arg(long, default_value = "demos/session.json")]
    config: String,

    /// Random bids to draw per bidder
    #[arg(long, default_value_t = 5)]
    bids: usize,

    /// Seed for the bid sampler
    #[arg(long)]
    bid_seed: Option<u64>,

    /// Skip winner determination
    #[arg(long, default_value_t = false)]
    skip_allocation: bool,

    #[arg(long, default_value = "results")]
    output_dir: String,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config: SessionConfig = match load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", cli.config, e);
            return Err(e.into());
        }
    };

    let date_str = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let result_dir = Path::new(&cli.output_dir).join(date_str);
    std::fs::create_dir_all(&result_dir)?;

    let log_path = result_dir.join("session.log");
    let _guard = logger::init(Some(log_path.as_path()), &cli.log_level)?;

    info!("Loaded configuration from {}", cli.config);
    info!("Results will be saved to: {}", result_dir.display());

    let session_start = Instant::now();
    let model = ProcessModel::spawn(&config.worker)?;
    let mut session = ModelAdapter::from_config(model, &config)?;

    let sampler = session.sampler_config();
    let mut samples = Vec::new();
    for bidder_id in session.get_bidder_ids() {
        let bids: Vec<RandomBid> = session
            .random_bids(bidder_id, cli.bids, cli.bid_seed, sampler)?
            .collect::<Result<_, _>>()?;
        info!(
            "Bidder {}: {} bids, mean size {:.1}",
            bidder_id,
            bids.len(),
            bids.iter().map(|b| b.size() as f64).sum::<f64>() / bids.len().max(1) as f64
        );
        samples.push(BidderSample { bidder_id, bids });
    }

    let (allocation, solver_error) = if cli.skip_allocation {
        (None, None)
    } else {
        match session.get_efficient_allocation() {
            Ok(a) => (Some(a.clone()), None),
            Err(e) => {
                error!("Winner determination failed: {}", e);
                (None, Some(e))
            }
        }
    };

    let report = build_report(&session, samples, allocation, session_start);
    let summary_path = write_report_json(&report, &result_dir)?;
    info!("Summary written to {}", summary_path.display());

    match solver_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
