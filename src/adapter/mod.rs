//! Session adapter over a value model
//!
//! [`ModelAdapter`] owns one model session and answers five queries against
//! it: bidder ids, good ids, bundle values, random bids and the efficient
//! allocation. Inputs and outputs are plain data; everything the model
//! computes stays behind the [`ValueModel`] trait.

pub mod allocation;
pub mod bids;
pub mod indicator;
pub mod logging;

pub use allocation::{AllocationCheck, BidderAllocation, EfficientAllocation};
pub use bids::{RandomBid, RandomBids};
pub use indicator::Indicator;
pub use logging::*;

use crate::bridge_info;
use crate::config::{SamplerConfig, SessionConfig};
use crate::error::{Error, Result};
use crate::model::{
    BidderCounts, BidderHandle, BidderId, BidderKind, Bundle, GoodId, License, RngSupplier,
    SamplerRequest, SolverConfig, ValueModel,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One live model session.
///
/// The bidder and good tables are fixed at construction. Good index `i` in
/// every bundle vector refers to `goods()[i]` for the whole session.
///
/// Operations that reach the model take `&mut self`; hosts that share a
/// session between threads must put it behind a lock.
pub struct ModelAdapter<M: ValueModel> {
    model: M,
    bidders: Vec<BidderHandle>,
    known_bidders: HashSet<BidderId>,
    goods: Vec<License>,
    good_index: HashMap<GoodId, usize>,
    sampler: SamplerConfig,
    solver: SolverConfig,
    allocation_check: AllocationCheck,
    efficient_allocation: Option<EfficientAllocation>,
}

impl<M: ValueModel> ModelAdapter<M> {
    /// Open a session with the given seed and bidder counts
    ///
    /// # Arguments
    ///
    /// * `model` - The model to drive
    /// * `seed` - Seed for world and population generation; `None` lets the model self-seed
    /// * `num_national`, `num_regional`, `num_local` - Bidder counts per kind
    ///
    /// # Returns
    ///
    /// The session, `Error::Configuration` for negative counts or a rejected
    /// configuration, or `Error::Initialization` if generation fails
    pub fn new(
        model: M,
        seed: Option<u64>,
        num_national: i64,
        num_regional: i64,
        num_local: i64,
    ) -> Result<Self> {
        let counts = BidderCounts::try_new(num_national, num_regional, num_local)?;
        Self::open(model, seed.into(), counts)
    }

    /// Open a session from a loaded configuration
    pub fn from_config(model: M, config: &SessionConfig) -> Result<Self> {
        let mut adapter = Self::open(model, config.seed.into(), config.bidders)?;
        adapter.sampler = config.sampler;
        adapter.solver = config.solver;
        adapter.allocation_check = config.allocation_check;
        Ok(adapter)
    }

    fn open(mut model: M, rng: RngSupplier, counts: BidderCounts) -> Result<Self> {
        bridge_info!(
            "Configuring model: {} national, {} regional, {} local bidders ({:?})",
            counts.national,
            counts.regional,
            counts.local,
            rng
        );
        model.configure(counts)?;

        let world = model.create_world(rng)?;
        let population = model.create_population(&world, rng)?;

        let mut goods = world.licenses;
        if goods.is_empty() {
            return Err(Error::Initialization("world contains no licenses".to_string()));
        }
        goods.sort_by_key(|l| l.id);
        let mut good_index = HashMap::with_capacity(goods.len());
        for (idx, license) in goods.iter().enumerate() {
            if good_index.insert(license.id, idx).is_some() {
                return Err(Error::Initialization(format!(
                    "world lists license {} more than once",
                    license.id
                )));
            }
        }

        let mut known_bidders = HashSet::with_capacity(population.len());
        for bidder in &population {
            if !known_bidders.insert(bidder.id) {
                return Err(Error::Initialization(format!(
                    "population contains bidder {} more than once",
                    bidder.id
                )));
            }
        }
        for kind in [BidderKind::National, BidderKind::Regional, BidderKind::Local] {
            let created = population.iter().filter(|b| b.kind == kind).count();
            let expected = counts.count(kind) as usize;
            if created != expected {
                return Err(Error::Initialization(format!(
                    "population has {} {} bidders, expected {}",
                    created, kind, expected
                )));
            }
        }

        log_session_overview(&population, &goods);

        Ok(Self {
            model,
            bidders: population,
            known_bidders,
            goods,
            good_index,
            sampler: SamplerConfig::default(),
            solver: SolverConfig::default(),
            allocation_check: AllocationCheck::default(),
            efficient_allocation: None,
        })
    }

    /// Bidder ids in the order the model registered them
    pub fn get_bidder_ids(&self) -> Vec<BidderId> {
        self.bidders.iter().map(|b| b.id).collect()
    }

    /// The bundle index space `0..N`
    pub fn get_good_ids(&self) -> Vec<usize> {
        (0..self.goods.len()).collect()
    }

    pub fn bidders(&self) -> &[BidderHandle] {
        &self.bidders
    }

    /// Licenses in bundle index order
    pub fn goods(&self) -> &[License] {
        &self.goods
    }

    pub fn good_count(&self) -> usize {
        self.goods.len()
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        self.sampler
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// True value of a bidder for the bundle described by `goods_vector`
    ///
    /// # Arguments
    ///
    /// * `bidder_id` - A bidder returned by `get_bidder_ids`
    /// * `goods_vector` - Exactly `N` entries, each 0 or 1, in good index order
    ///
    /// # Returns
    ///
    /// The non-negative value, or `Error::Argument` for an unknown bidder or
    /// a malformed vector
    pub fn calculate_value<T: Indicator>(
        &mut self,
        bidder_id: BidderId,
        goods_vector: &[T],
    ) -> Result<f64> {
        self.ensure_bidder(bidder_id)?;
        let bundle = self.bundle_from_vector(goods_vector)?;
        let value = self.model.calculate_value(bidder_id, &bundle)?;
        if !value.is_finite() || value < 0.0 {
            return Err(Error::Backend(format!(
                "model returned invalid value {} for bidder {}",
                value, bidder_id
            )));
        }
        debug!(target: "mrvm", "bidder {} values {} goods at {}", bidder_id, bundle.len(), value);
        Ok(value)
    }

    /// Lazily draw `number_of_bids` random bids for a bidder
    ///
    /// Bundle sizes follow `Normal(mean, std_dev)` from `sampler`; within a
    /// size, bundles are uniform. `seed` drives the sampler only and is
    /// independent of the session seed.
    pub fn random_bids(
        &mut self,
        bidder_id: BidderId,
        number_of_bids: usize,
        seed: Option<u64>,
        sampler: SamplerConfig,
    ) -> Result<RandomBids<'_>> {
        self.ensure_bidder(bidder_id)?;
        if !sampler.mean_bundle_size.is_finite()
            || !sampler.std_dev_bundle_size.is_finite()
            || sampler.std_dev_bundle_size < 0.0
        {
            return Err(Error::Argument(format!(
                "invalid bundle size distribution: mean {}, std dev {}",
                sampler.mean_bundle_size, sampler.std_dev_bundle_size
            )));
        }
        if number_of_bids == 0 {
            return Ok(RandomBids::empty(&self.good_index, self.goods.len()));
        }

        let request = SamplerRequest {
            iterations: number_of_bids,
            mean_bundle_size: sampler.mean_bundle_size,
            std_dev_bundle_size: sampler.std_dev_bundle_size,
            rng: seed.into(),
        };
        debug!(target: "mrvm", "sampling {} bids for bidder {}", number_of_bids, bidder_id);
        let stream = self.model.sample_xor_bids(bidder_id, &request)?;
        Ok(RandomBids::new(
            stream,
            &self.good_index,
            self.goods.len(),
            number_of_bids,
        ))
    }

    /// Random bids as rows of `N` flags followed by the bundle value,
    /// using the session's sampler settings
    pub fn get_random_bids(
        &mut self,
        bidder_id: BidderId,
        number_of_bids: usize,
        seed: Option<u64>,
    ) -> Result<Vec<Vec<f64>>> {
        let sampler = self.sampler;
        self.get_random_bids_with(bidder_id, number_of_bids, seed, sampler)
    }

    pub fn get_random_bids_with(
        &mut self,
        bidder_id: BidderId,
        number_of_bids: usize,
        seed: Option<u64>,
        sampler: SamplerConfig,
    ) -> Result<Vec<Vec<f64>>> {
        self.random_bids(bidder_id, number_of_bids, seed, sampler)?
            .map(|bid| bid.map(RandomBid::into_row))
            .collect()
    }

    /// The efficient allocation, computed on first use and cached afterwards
    ///
    /// # Returns
    ///
    /// The cached allocation, or `Error::Solver` if winner determination
    /// fails. A failed attempt caches nothing, so calling again retries.
    pub fn get_efficient_allocation(&mut self) -> Result<&EfficientAllocation> {
        let allocation = match self.efficient_allocation.take() {
            Some(cached) => cached,
            None => self.compute_efficient_allocation()?,
        };
        Ok(&*self.efficient_allocation.insert(allocation))
    }

    pub fn has_cached_allocation(&self) -> bool {
        self.efficient_allocation.is_some()
    }

    fn compute_efficient_allocation(&mut self) -> Result<EfficientAllocation> {
        let ids = self.get_bidder_ids();
        bridge_info!("Running winner determination over {} bidders", ids.len());
        let generic = self.model.solve_efficient_allocation(&ids, &self.solver)?;
        let allocation = EfficientAllocation::from_generic(
            &generic,
            &self.bidders,
            &self.good_index,
            &self.allocation_check,
        )?;
        log_allocation_table(&allocation);
        Ok(allocation)
    }

    fn ensure_bidder(&self, bidder_id: BidderId) -> Result<()> {
        if self.known_bidders.contains(&bidder_id) {
            Ok(())
        } else {
            Err(Error::Argument(format!("unknown bidder {}", bidder_id)))
        }
    }

    fn bundle_from_vector<T: Indicator>(&self, goods_vector: &[T]) -> Result<Bundle> {
        if goods_vector.len() != self.goods.len() {
            return Err(Error::Argument(format!(
                "goods vector has {} entries, expected {}",
                goods_vector.len(),
                self.goods.len()
            )));
        }
        let mut bundle = Bundle::new();
        for (idx, entry) in goods_vector.iter().enumerate() {
            match entry.membership() {
                Some(true) => {
                    bundle.insert(self.goods[idx].id);
                }
                Some(false) => {}
                None => {
                    return Err(Error::Argument(format!(
                        "goods vector entry {} is {:?}, expected 0 or 1",
                        idx, entry
                    )));
                }
            }
        }
        Ok(bundle)
    }
}
