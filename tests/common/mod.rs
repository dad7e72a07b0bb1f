//! In-process stand-in for the MRVM model, used by the integration tests

#![allow(dead_code)]

use mrvm_bridge::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

pub const REGIONS: u32 = 14;
pub const BANDS: [(&str, u32); 3] = [("A", 2), ("B", 3), ("C", 2)];

pub struct Valuation {
    pub base: HashMap<GoodId, f64>,
    pub synergy: f64,
}

/// A small MRVM look-alike: 14 regions x 7 licenses, additive values with a
/// size-dependent synergy factor, greedy "winner determination".
pub struct MockModel {
    pub counts: Option<BidderCounts>,
    pub world: Option<World>,
    pub valuations: HashMap<BidderId, Valuation>,
    pub solver_calls: usize,
    pub solver_failures_left: usize,
    pub reported_total_offset: f64,
    pub max_bidders: usize,
    pub fail_world: bool,
    pub short_sampler: bool,
}

impl Default for MockModel {
    fn default() -> Self {
        Self {
            counts: None,
            world: None,
            valuations: HashMap::new(),
            solver_calls: 0,
            solver_failures_left: 0,
            reported_total_offset: 0.0,
            max_bidders: 100,
            fail_world: false,
            short_sampler: false,
        }
    }
}

fn rng_from(rng: RngSupplier, salt: u64) -> StdRng {
    match rng {
        RngSupplier::Seeded(seed) => StdRng::seed_from_u64(seed ^ salt),
        RngSupplier::SelfSeeding => StdRng::seed_from_u64(rand::rng().random::<u64>()),
    }
}

fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

impl MockModel {
    fn value_of(&self, bidder: BidderId, bundle: &Bundle) -> Result<f64> {
        let valuation = self
            .valuations
            .get(&bidder)
            .ok_or_else(|| Error::Argument(format!("no bidder {}", bidder)))?;
        let additive: f64 = bundle
            .iter()
            .map(|g| valuation.base.get(g).copied().unwrap_or(0.0))
            .sum();
        let good_count = valuation.base.len().max(1) as f64;
        Ok(additive * (1.0 + valuation.synergy * bundle.len() as f64 / good_count))
    }

    fn licenses(&self) -> Vec<GoodId> {
        self.world
            .as_ref()
            .map(|w| w.licenses.iter().map(|l| l.id).collect())
            .unwrap_or_default()
    }
}

impl ValueModel for MockModel {
    fn configure(&mut self, counts: BidderCounts) -> Result<()> {
        if counts.total() > self.max_bidders {
            return Err(Error::Configuration(format!(
                "at most {} bidders supported",
                self.max_bidders
            )));
        }
        self.counts = Some(counts);
        Ok(())
    }

    fn create_world(&mut self, _rng: RngSupplier) -> Result<World> {
        if self.fail_world {
            return Err(Error::Initialization("world generation failed".to_string()));
        }
        // Licenses come out of id order so the adapter has to sort them
        let mut licenses = Vec::new();
        for region in (0..REGIONS).rev() {
            let mut offset = 0;
            for (band, lots) in BANDS {
                for lot in (0..lots).rev() {
                    licenses.push(License {
                        id: GoodId(1000 + (region * 7 + offset + lot) as u64),
                        region,
                        band: band.to_string(),
                    });
                }
                offset += lots;
            }
        }
        licenses.reverse();
        licenses.rotate_left(17);
        let world = World { licenses };
        self.world = Some(world.clone());
        Ok(world)
    }

    fn create_population(&mut self, world: &World, rng: RngSupplier) -> Result<Vec<BidderHandle>> {
        let counts = self
            .counts
            .ok_or_else(|| Error::Initialization("model not configured".to_string()))?;
        let mut rng = rng_from(rng, 0x5eed);
        let mut population = Vec::new();
        let mut next_id = 0u64;

        for kind in [BidderKind::Local, BidderKind::Regional, BidderKind::National] {
            for _ in 0..counts.count(kind) {
                let home = rng.random_range(0..REGIONS);
                let base = world
                    .licenses
                    .iter()
                    .map(|l| {
                        let interested = match kind {
                            BidderKind::Local => l.region == home,
                            BidderKind::Regional => l.region.abs_diff(home) <= 2,
                            BidderKind::National => true,
                        };
                        let value = if interested {
                            rng.random_range(1.0..100.0)
                        } else {
                            0.0
                        };
                        (l.id, value)
                    })
                    .collect();
                let synergy = rng.random_range(0.0..0.5);
                let id = BidderId(next_id);
                next_id += 1;
                self.valuations.insert(id, Valuation { base, synergy });
                population.push(BidderHandle { id, kind });
            }
        }
        Ok(population)
    }

    fn calculate_value(&mut self, bidder: BidderId, bundle: &Bundle) -> Result<f64> {
        self.value_of(bidder, bundle)
    }

    fn sample_xor_bids(&mut self, bidder: BidderId, request: &SamplerRequest) -> Result<XorBidStream<'_>> {
        if !self.valuations.contains_key(&bidder) {
            return Err(Error::Argument(format!("no bidder {}", bidder)));
        }
        let goods = self.licenses();
        let mut rng = rng_from(request.rng, bidder.0);
        let request = *request;
        let iterations = if self.short_sampler {
            request.iterations.saturating_sub(1)
        } else {
            request.iterations
        };
        let this = &*self;

        Ok(Box::new((0..iterations).map(move |_| -> Result<XorBid> {
            let drawn = request.mean_bundle_size + request.std_dev_bundle_size * standard_normal(&mut rng);
            let size = drawn.round().clamp(0.0, goods.len() as f64) as usize;
            let bundle: Bundle = rand::seq::index::sample(&mut rng, goods.len(), size)
                .into_iter()
                .map(|i| goods[i])
                .collect();
            let value = this.value_of(bidder, &bundle)?;
            Ok(XorBid { bundle, value })
        })))
    }

    fn solve_efficient_allocation(
        &mut self,
        bidders: &[BidderId],
        _solver: &SolverConfig,
    ) -> Result<GenericAllocation> {
        self.solver_calls += 1;
        if self.solver_failures_left > 0 {
            self.solver_failures_left -= 1;
            return Err(Error::Solver("MIP did not converge".to_string()));
        }

        let mut bundles: HashMap<BidderId, Bundle> = HashMap::new();
        for good in self.licenses() {
            let best = bidders
                .iter()
                .filter_map(|b| {
                    let v = self.valuations.get(b)?.base.get(&good).copied()?;
                    (v > 0.0).then_some((*b, v))
                })
                .max_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((winner, _)) = best {
                bundles.entry(winner).or_default().insert(good);
            }
        }

        let mut allocation = GenericAllocation::default();
        for (bidder, goods) in bundles {
            let value = self.value_of(bidder, &goods)?;
            allocation.trades.insert(bidder, Trade { goods, value });
        }
        // Sum in the opposite order to the adapter
        allocation.total_value = allocation
            .trades
            .values()
            .rev()
            .map(|t| t.value)
            .sum::<f64>()
            + self.reported_total_offset;
        Ok(allocation)
    }
}

pub fn default_session(seed: Option<u64>) -> ModelAdapter<MockModel> {
    ModelAdapter::new(MockModel::default(), seed, 3, 4, 3).unwrap()
}

pub fn vector_of(indices: &[usize], len: usize) -> Vec<u8> {
    let mut v = vec![0u8; len];
    for i in indices {
        v[*i] = 1;
    }
    v
}
