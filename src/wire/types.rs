//! Line-delimited JSON messages exchanged with a model worker

use crate::error::Error;
use crate::model::{BidderCounts, BidderId, Bundle, RngSupplier, SamplerRequest, SolverConfig};
use serde::{Deserialize, Serialize};

/// Requests sent from the adapter to the worker, one JSON object per line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Configure {
        counts: BidderCounts,
    },
    CreateWorld {
        rng: RngSupplier,
    },
    /// Populate the world created by the last `CreateWorld`
    CreatePopulation {
        rng: RngSupplier,
    },
    CalculateValue {
        bidder: BidderId,
        bundle: Bundle,
    },
    SampleXorBids {
        bidder: BidderId,
        request: SamplerRequest,
    },
    SolveEfficientAllocation {
        bidders: Vec<BidderId>,
        solver: SolverConfig,
    },
    /// Ask the worker to exit; no response is expected
    Shutdown,
}

impl Request {
    pub fn op(&self) -> &'static str {
        match self {
            Request::Configure { .. } => "configure",
            Request::CreateWorld { .. } => "create_world",
            Request::CreatePopulation { .. } => "create_population",
            Request::CalculateValue { .. } => "calculate_value",
            Request::SampleXorBids { .. } => "sample_xor_bids",
            Request::SolveEfficientAllocation { .. } => "solve_efficient_allocation",
            Request::Shutdown => "shutdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Initialization,
    Argument,
    Solver,
    #[serde(other)]
    Other,
}

/// Worker reply to a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok {
        #[serde(default)]
        result: serde_json::Value,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl From<(ErrorKind, String)> for Error {
    fn from((kind, message): (ErrorKind, String)) -> Self {
        match kind {
            ErrorKind::Configuration => Error::Configuration(message),
            ErrorKind::Initialization => Error::Initialization(message),
            ErrorKind::Argument => Error::Argument(message),
            ErrorKind::Solver => Error::Solver(message),
            ErrorKind::Other => Error::Backend(message),
        }
    }
}
