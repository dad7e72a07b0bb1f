//! Out-of-process model boundary
//!
//! The worker reads one JSON [`Request`] per line on stdin and answers each
//! with one JSON [`Response`] line on stdout. `{"status":"ok","result":...}`
//! carries the method's return value; `{"status":"error","kind":...,"message":...}`
//! maps onto the crate's error taxonomy.

pub mod client;
pub mod types;

pub use client::{ProcessModel, WireModel};
pub use types::{ErrorKind, Request, Response};
