//! # mrvm-bridge - plain-data access to the Multi-Region Value Model
//!
//! mrvm-bridge exposes a subset of the MRVM spectrum-auction simulator to
//! hosts that cannot call the model directly. It translates seeds, bidder
//! counts and 0/1 bundle vectors into model calls, and translates values,
//! random bids and the efficient allocation back into serializable data.
//!
//! ## Modules
//!
//! - [`adapter`] - The session adapter and its result types
//! - [`model`] - The capability surface a value model must provide
//! - [`wire`] - Line-delimited JSON client for out-of-process models
//! - [`config`] - Session configuration and loaders
//! - [`error`] - Error types and handling
//! - [`logger`] - Tracing subscriber setup
//! - [`report`] - JSON session summaries
//!
//! ## Quick Start
//!
//! ```no_run
//! use mrvm_bridge::*;
//!
//! # fn main() -> Result<()> {
//! let model = ProcessModel::spawn(&WorkerConfig::default())?;
//! let mut session = ModelAdapter::new(model, Some(42), 3, 4, 3)?;
//!
//! let bidder = session.get_bidder_ids()[0];
//! let mut bundle = vec![0u8; session.good_count()];
//! bundle[0] = 1;
//! let value = session.calculate_value(bidder, &bundle)?;
//!
//! let bids = session.get_random_bids(bidder, 10, Some(7))?;
//! let welfare = session.get_efficient_allocation()?.social_welfare;
//! # let _ = (value, bids, welfare);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod logger;
pub mod model;
pub mod report;
pub mod wire;

pub use adapter::*;
pub use config::{SamplerConfig, SessionConfig, WorkerConfig};
pub use error::*;
pub use model::*;
pub use wire::{ProcessModel, WireModel};
