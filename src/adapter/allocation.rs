//! Translation of the solver's allocation into plain per-bidder data

use crate::error::{Error, Result};
use crate::model::{BidderHandle, BidderId, BidderKind, GenericAllocation, GoodId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Tolerance for comparing summed welfare against the solver's reported total.
///
/// The solver may sum trade values in a different order than we do, so exact
/// equality is not required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationCheck {
    pub relative_tolerance: f64,
    pub absolute_tolerance: f64,
}

impl Default for AllocationCheck {
    fn default() -> Self {
        Self {
            relative_tolerance: 1e-6,
            absolute_tolerance: 1e-9,
        }
    }
}

impl AllocationCheck {
    pub fn agrees(&self, summed: f64, reported: f64) -> bool {
        let scale = summed.abs().max(reported.abs());
        let allowed = self.absolute_tolerance.max(self.relative_tolerance * scale);
        (summed - reported).abs() <= allowed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderAllocation {
    pub bidder_id: BidderId,
    pub kind: BidderKind,
    /// Good indices won, in the session's good order
    pub good_ids: BTreeSet<usize>,
    pub value: f64,
}

/// The value-maximizing assignment of goods, covering every bidder of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficientAllocation {
    /// One entry per bidder, in registration order
    pub allocations: Vec<BidderAllocation>,
    /// Sum of `value` over `allocations`
    pub social_welfare: f64,
    /// Total value as reported by the solver
    pub reported_total: f64,
}

impl EfficientAllocation {
    pub(crate) fn from_generic(
        generic: &GenericAllocation,
        bidders: &[BidderHandle],
        good_index: &HashMap<GoodId, usize>,
        check: &AllocationCheck,
    ) -> Result<Self> {
        if let Some(stranger) = generic
            .trades
            .keys()
            .find(|id| !bidders.iter().any(|b| b.id == **id))
        {
            return Err(Error::Solver(format!(
                "allocation names bidder {} which is not part of the session",
                stranger
            )));
        }

        let mut awarded: HashMap<usize, BidderId> = HashMap::new();
        let mut allocations = Vec::with_capacity(bidders.len());

        for bidder in bidders {
            let mut good_ids = BTreeSet::new();
            let mut value = 0.0;

            if let Some(trade) = generic.trades.get(&bidder.id) {
                for good in &trade.goods {
                    let idx = *good_index.get(good).ok_or_else(|| {
                        Error::Solver(format!(
                            "bidder {} was awarded good {} which is not part of the session",
                            bidder.id, good
                        ))
                    })?;
                    if let Some(holder) = awarded.insert(idx, bidder.id) {
                        return Err(Error::Solver(format!(
                            "good {} awarded to both bidder {} and bidder {}",
                            idx, holder, bidder.id
                        )));
                    }
                    good_ids.insert(idx);
                }
                if !trade.value.is_finite() || trade.value < 0.0 {
                    return Err(Error::Solver(format!(
                        "bidder {} has invalid trade value {}",
                        bidder.id, trade.value
                    )));
                }
                value = trade.value;
            }

            allocations.push(BidderAllocation {
                bidder_id: bidder.id,
                kind: bidder.kind,
                good_ids,
                value,
            });
        }

        let social_welfare: f64 = allocations.iter().map(|a| a.value).sum();
        if !check.agrees(social_welfare, generic.total_value) {
            return Err(Error::Solver(format!(
                "summed welfare {} diverges from reported total {}",
                social_welfare, generic.total_value
            )));
        }

        Ok(Self {
            allocations,
            social_welfare,
            reported_total: generic.total_value,
        })
    }

    pub fn get(&self, bidder: BidderId) -> Option<&BidderAllocation> {
        self.allocations.iter().find(|a| a.bidder_id == bidder)
    }

    pub fn winners(&self) -> impl Iterator<Item = &BidderAllocation> {
        self.allocations.iter().filter(|a| !a.good_ids.is_empty())
    }
}
