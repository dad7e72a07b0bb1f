//! Plain data exchanged across the model capability surface

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Number of licenses in the default MRVM world (14 regions x 7 licenses)
pub const MRVM_GOOD_COUNT: usize = 98;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BidderId(pub u64);

impl std::fmt::Display for BidderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Native identifier of a license inside the model's world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GoodId(pub u64);

impl std::fmt::Display for GoodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BidderKind {
    Local,
    Regional,
    National,
}

impl std::fmt::Display for BidderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BidderKind::Local => "local",
            BidderKind::Regional => "regional",
            BidderKind::National => "national",
        };
        write!(f, "{}", name)
    }
}

/// Reference to a bidder owned by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidderHandle {
    pub id: BidderId,
    pub kind: BidderKind,
}

/// Number of bidders of each kind the model should create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidderCounts {
    pub national: u32,
    pub regional: u32,
    pub local: u32,
}

impl Default for BidderCounts {
    fn default() -> Self {
        Self {
            national: 3,
            regional: 4,
            local: 3,
        }
    }
}

impl BidderCounts {
    /// Validate counts coming from a host that speaks signed integers
    pub fn try_new(national: i64, regional: i64, local: i64) -> Result<Self> {
        let check = |kind: BidderKind, n: i64| -> Result<u32> {
            u32::try_from(n).map_err(|_| {
                Error::Configuration(format!(
                    "number of {} bidders must be a non-negative 32-bit integer, got {}",
                    kind, n
                ))
            })
        };
        Ok(Self {
            national: check(BidderKind::National, national)?,
            regional: check(BidderKind::Regional, regional)?,
            local: check(BidderKind::Local, local)?,
        })
    }

    pub fn count(&self, kind: BidderKind) -> u32 {
        match kind {
            BidderKind::Local => self.local,
            BidderKind::Regional => self.regional,
            BidderKind::National => self.national,
        }
    }

    pub fn total(&self) -> usize {
        self.national as usize + self.regional as usize + self.local as usize
    }
}

/// Random source handed to the model. `SelfSeeding` lets the model pick its own seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RngSupplier {
    Seeded(u64),
    #[default]
    SelfSeeding,
}

impl From<Option<u64>> for RngSupplier {
    fn from(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => RngSupplier::Seeded(s),
            None => RngSupplier::SelfSeeding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: GoodId,
    pub region: u32,
    pub band: String,
}

/// The model's spatial and regulatory structure, reduced to the licenses it defines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct World {
    pub licenses: Vec<License>,
}

/// Set of native good ids
pub type Bundle = BTreeSet<GoodId>;

/// A (bundle, value) pair drawn by the model's sampler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XorBid {
    pub bundle: Bundle,
    pub value: f64,
}

pub type XorBidStream<'a> = Box<dyn Iterator<Item = Result<XorBid>> + 'a>;

/// Parameters for the size-based random XOR sampler.
///
/// Each draw picks a cardinality from `Normal(mean_bundle_size, std_dev_bundle_size)`,
/// clamped to `[0, N]`, then a bundle uniformly among those of that cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerRequest {
    pub iterations: usize,
    pub mean_bundle_size: f64,
    pub std_dev_bundle_size: f64,
    pub rng: RngSupplier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SolverConfig {
    /// Ask the solver to print its progress
    pub display_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub goods: Bundle,
    pub value: f64,
}

/// Winner determination result as reported by the model. Only winners appear in `trades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenericAllocation {
    pub trades: BTreeMap<BidderId, Trade>,
    pub total_value: f64,
}

impl GenericAllocation {
    pub fn is_winner(&self, bidder: BidderId) -> bool {
        self.trades.contains_key(&bidder)
    }

    pub fn trade_value(&self, bidder: BidderId) -> f64 {
        self.trades.get(&bidder).map(|t| t.value).unwrap_or(0.0)
    }
}
