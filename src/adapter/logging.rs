use super::allocation::EfficientAllocation;
use crate::model::{BidderHandle, BidderKind, License};

#[macro_export]
macro_rules! bridge_info {
    ($($arg:tt)+) => {
        tracing::info!(target: "mrvm", $($arg)+)
    }
}

/// Log who and what a freshly opened session contains
pub fn log_session_overview(bidders: &[BidderHandle], goods: &[License]) {
    let count = |kind: BidderKind| bidders.iter().filter(|b| b.kind == kind).count();
    bridge_info!(
        "Session ready: {} bidders ({} national, {} regional, {} local), {} goods",
        bidders.len(),
        count(BidderKind::National),
        count(BidderKind::Regional),
        count(BidderKind::Local),
        goods.len()
    );

    let ids_str = bidders
        .iter()
        .map(|b| format!("{}:{}", b.id, b.kind))
        .collect::<Vec<_>>()
        .join(", ");
    bridge_info!("  Bidders: [{}]", ids_str);
}

/// Log the efficient allocation, one line per bidder
pub fn log_allocation_table(allocation: &EfficientAllocation) {
    bridge_info!("Efficient allocation:");
    for entry in &allocation.allocations {
        if entry.good_ids.is_empty() {
            bridge_info!("  Bidder {} ({}): None", entry.bidder_id, entry.kind);
        } else {
            let goods_str = entry
                .good_ids
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            bridge_info!(
                "  Bidder {} ({}): [{}] value {:.2}",
                entry.bidder_id,
                entry.kind,
                goods_str,
                entry.value
            );
        }
    }
    bridge_info!("  Social welfare: {:.2}", allocation.social_welfare);
}
