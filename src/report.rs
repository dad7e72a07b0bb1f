use crate::adapter::{EfficientAllocation, ModelAdapter, RandomBid};
use crate::model::{BidderHandle, BidderId, License, ValueModel};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct BidderSample {
    pub bidder_id: BidderId,
    pub bids: Vec<RandomBid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub bidders: Vec<BidderHandle>,
    pub goods: Vec<License>,
    pub samples: Vec<BidderSample>,
    pub allocation: Option<EfficientAllocation>,
    pub total_duration_ms: f64,
    pub bidder_count: usize,
    pub good_count: usize,
}

pub fn build_report<M: ValueModel>(
    adapter: &ModelAdapter<M>,
    samples: Vec<BidderSample>,
    allocation: Option<EfficientAllocation>,
    session_start: Instant,
) -> SessionReport {
    let total_duration_ms = session_start.elapsed().as_secs_f64() * 1000.0;

    SessionReport {
        bidders: adapter.bidders().to_vec(),
        goods: adapter.goods().to_vec(),
        samples,
        allocation,
        total_duration_ms,
        bidder_count: adapter.bidders().len(),
        good_count: adapter.good_count(),
    }
}

pub fn write_report_json<P: AsRef<Path>>(
    report: &SessionReport,
    result_dir: P,
) -> std::io::Result<PathBuf> {
    let summary_path = result_dir.as_ref().join("summary.json");
    let mut summary_file = File::create(&summary_path)?;
    serde_json::to_writer_pretty(&mut summary_file, report)?;
    Ok(summary_path)
}
