//! Random bids translated into the session's good order

use crate::error::{Error, Result};
use crate::model::{GoodId, XorBid, XorBidStream};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A sampled bid as an indicator vector over the session's goods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomBid {
    pub goods: Vec<u8>,
    pub value: f64,
}

impl RandomBid {
    /// Flatten into `N` membership flags followed by the value
    pub fn into_row(self) -> Vec<f64> {
        let mut row: Vec<f64> = self.goods.into_iter().map(f64::from).collect();
        row.push(self.value);
        row
    }

    pub fn size(&self) -> usize {
        self.goods.iter().filter(|g| **g == 1).count()
    }
}

/// Lazy sequence of exactly `requested` random bids.
///
/// Each call to the sampler gets its own `RandomBids`; it cannot be resumed
/// once dropped. Any error (the model running dry early, an unknown good or
/// an invalid value) is yielded once and then the iterator ends.
pub struct RandomBids<'a> {
    stream: Option<XorBidStream<'a>>,
    good_index: &'a HashMap<GoodId, usize>,
    good_count: usize,
    requested: usize,
    produced: usize,
}

impl<'a> RandomBids<'a> {
    pub(crate) fn new(
        stream: XorBidStream<'a>,
        good_index: &'a HashMap<GoodId, usize>,
        good_count: usize,
        requested: usize,
    ) -> Self {
        Self {
            stream: Some(stream),
            good_index,
            good_count,
            requested,
            produced: 0,
        }
    }

    pub(crate) fn empty(good_index: &'a HashMap<GoodId, usize>, good_count: usize) -> Self {
        Self {
            stream: None,
            good_index,
            good_count,
            requested: 0,
            produced: 0,
        }
    }

    fn translate(&self, bid: XorBid) -> Result<RandomBid> {
        if !bid.value.is_finite() || bid.value < 0.0 {
            return Err(Error::Backend(format!(
                "sampler produced invalid value {}",
                bid.value
            )));
        }
        let mut goods = vec![0u8; self.good_count];
        for good in &bid.bundle {
            let idx = self.good_index.get(good).ok_or_else(|| {
                Error::Backend(format!("sampler produced unknown good {}", good))
            })?;
            goods[*idx] = 1;
        }
        Ok(RandomBid {
            goods,
            value: bid.value,
        })
    }
}

impl Iterator for RandomBids<'_> {
    type Item = Result<RandomBid>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.produced >= self.requested {
            self.stream = None;
            return None;
        }
        let next = self.stream.as_mut()?.next();
        match next {
            Some(Ok(bid)) => {
                self.produced += 1;
                let translated = self.translate(bid);
                if translated.is_err() {
                    self.stream = None;
                }
                Some(translated)
            }
            Some(Err(e)) => {
                self.stream = None;
                Some(Err(e))
            }
            None => {
                self.stream = None;
                Some(Err(Error::Backend(format!(
                    "sampler yielded {} of {} requested bids",
                    self.produced, self.requested
                ))))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.stream.is_none() {
            return (0, Some(0));
        }
        (0, Some(self.requested - self.produced + 1))
    }
}
