//! Capability surface of the external value model

use super::types::*;
use crate::error::Result;

/// Trait for the operations the adapter needs from a value model
///
/// Implement this trait to make a model reachable from the adapter. The
/// adapter only depends on this contract, so the model can live behind an
/// in-process binding or a separate worker process.
///
/// Every method blocks until the model answers.
pub trait ValueModel {
    /// Set how many bidders of each kind the next population will contain
    ///
    /// # Returns
    ///
    /// Ok(()) on success, or `Error::Configuration` if the model rejects the counts
    fn configure(&mut self, counts: BidderCounts) -> Result<()>;

    /// Generate the world the licenses are derived from
    fn create_world(&mut self, rng: RngSupplier) -> Result<World>;

    /// Generate the bidder population for a world
    ///
    /// # Returns
    ///
    /// The bidders in the order the model registered them
    fn create_population(&mut self, world: &World, rng: RngSupplier) -> Result<Vec<BidderHandle>>;

    /// Evaluate the bidder's true value for a bundle
    fn calculate_value(&mut self, bidder: BidderId, bundle: &Bundle) -> Result<f64>;

    /// Draw random XOR bids with the size-based sampler
    ///
    /// The returned stream yields at most `request.iterations` bids.
    fn sample_xor_bids(&mut self, bidder: BidderId, request: &SamplerRequest) -> Result<XorBidStream<'_>>;

    /// Run winner determination over the given bidders
    ///
    /// # Returns
    ///
    /// The value-maximizing allocation, or `Error::Solver` if the solver fails
    fn solve_efficient_allocation(
        &mut self,
        bidders: &[BidderId],
        solver: &SolverConfig,
    ) -> Result<GenericAllocation>;
}

impl<M: ValueModel + ?Sized> ValueModel for Box<M> {
    fn configure(&mut self, counts: BidderCounts) -> Result<()> {
        (**self).configure(counts)
    }

    fn create_world(&mut self, rng: RngSupplier) -> Result<World> {
        (**self).create_world(rng)
    }

    fn create_population(&mut self, world: &World, rng: RngSupplier) -> Result<Vec<BidderHandle>> {
        (**self).create_population(world, rng)
    }

    fn calculate_value(&mut self, bidder: BidderId, bundle: &Bundle) -> Result<f64> {
        (**self).calculate_value(bidder, bundle)
    }

    fn sample_xor_bids(&mut self, bidder: BidderId, request: &SamplerRequest) -> Result<XorBidStream<'_>> {
        (**self).sample_xor_bids(bidder, request)
    }

    fn solve_efficient_allocation(
        &mut self,
        bidders: &[BidderId],
        solver: &SolverConfig,
    ) -> Result<GenericAllocation> {
        (**self).solve_efficient_allocation(bidders, solver)
    }
}
