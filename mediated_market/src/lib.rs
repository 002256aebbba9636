//! Sampling-based mediated market clearing
//!
//! A mediator faces N seller/buyer pairs arriving one at a time. It first
//! observes a random sample of the population to estimate thresholds, then
//! buys from sellers valuing the product at or below the running seller
//! average and resells to buyers valuing it at or above the running buyer
//! average. The quality of this one-pass heuristic is measured against the
//! offline optimum (the N highest valuations end up holding a unit).
//!
//! Pipeline:
//! - `generator`: fresh market with uniform valuations
//! - `sampler`: Bernoulli partition into sample and ready markets
//! - `pricing`: initial thresholds and the running-mean update
//! - `mediator`: single-pass clearing with unsold stock tracking
//! - `social_value`: offline optimum, realized value, value with stock returned
//! - `experiment` / `analysis`: trials swept over the sampling probability

use std::slice;

pub mod analysis;
pub mod config;
pub mod error;
pub mod experiment;
pub mod generator;
pub mod mediator;
pub mod output;
pub mod pricing;
pub mod report;
pub mod sampler;
pub mod social_value;
pub mod valuation;

pub use error::{ExperimentError, MarketError};
pub use mediator::{Clearing, Mediator};
pub use pricing::PriceEstimate;
pub use valuation::{ScriptedSource, SeededSource, ValuationSource};

/// Round to 2 decimal places
///
/// Every valuation, threshold and social value passes through this at the
/// point it is computed, so rounding error accumulates step by step.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Round to an arbitrary number of decimal places
///
/// Rounds the exact binary value of `value`, with exact ties going to the even
/// digit. Scaling by a power of ten first would round twice.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// A seller or a buyer
///
/// `holds_product` is the end-of-round ownership flag. Sellers start holding a
/// unit and lose it when the mediator buys it; buyers start empty-handed and
/// gain one when the mediator sells to them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Participant {
    pub valuation: f64,
    pub holds_product: bool,
}

impl Participant {
    pub fn seller(valuation: f64) -> Self {
        Participant {
            valuation,
            holds_product: true,
        }
    }

    pub fn buyer(valuation: f64) -> Self {
        Participant {
            valuation,
            holds_product: false,
        }
    }

    /// Same valuation, new ownership flag
    pub fn with_product(self, holds_product: bool) -> Self {
        Participant {
            valuation: self.valuation,
            holds_product,
        }
    }
}

/// Sellers and buyers paired by arrival order
///
/// Seller i and buyer i arrive together but are otherwise unrelated. The two
/// sequences always have equal length; `Market::new` is the only public way in
/// and it rejects anything else.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Market {
    sellers: Vec<Participant>,
    buyers: Vec<Participant>,
}

impl Market {
    pub fn new(sellers: Vec<Participant>, buyers: Vec<Participant>) -> Result<Self, MarketError> {
        if sellers.len() != buyers.len() {
            return Err(MarketError::LengthMismatch {
                sellers: sellers.len(),
                buyers: buyers.len(),
            });
        }
        if let Some(bad) = sellers
            .iter()
            .chain(buyers.iter())
            .find(|p| !p.valuation.is_finite() || p.valuation < 0.0)
        {
            return Err(MarketError::InvalidValuation(bad.valuation));
        }
        Ok(Market { sellers, buyers })
    }

    pub fn empty() -> Self {
        Market::default()
    }

    /// Internal constructor for callers that build both sides in lockstep
    pub(crate) fn from_pairs(sellers: Vec<Participant>, buyers: Vec<Participant>) -> Self {
        debug_assert_eq!(sellers.len(), buyers.len());
        Market { sellers, buyers }
    }

    /// Number of seller/buyer pairs
    pub fn len(&self) -> usize {
        self.sellers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty()
    }

    pub fn sellers(&self) -> &[Participant] {
        &self.sellers
    }

    pub fn buyers(&self) -> &[Participant] {
        &self.buyers
    }

    /// Iterate `(seller, buyer)` in arrival order
    pub fn pairs(&self) -> impl Iterator<Item = (&Participant, &Participant)> {
        self.sellers.iter().zip(self.buyers.iter())
    }

    /// All 2N participants, sellers first
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.sellers.iter().chain(self.buyers.iter())
    }
}

/// A unit the mediator bought and has not resold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockEntry {
    /// Position of the originating seller in the market that was cleared
    pub seller_index: usize,
    /// The seller's valuation, which is what the mediator paid
    pub price: f64,
}

/// Mediator inventory in purchase order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stock {
    entries: Vec<StockEntry>,
}

impl Stock {
    pub fn new() -> Self {
        Stock::default()
    }

    pub fn push(&mut self, entry: StockEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, StockEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    /// The cheapest unit, ties going to the last one scanned
    pub fn min_product(&self) -> Option<&StockEntry> {
        mediator::min_product_position(&self.entries).map(|i| &self.entries[i])
    }

    /// Remove and return the unit `min_product` would select
    pub fn take_min_product(&mut self) -> Option<StockEntry> {
        mediator::min_product_position(&self.entries).map(|i| self.entries.remove(i))
    }

    /// Sum of purchase prices of everything still held
    pub fn total_value(&self) -> f64 {
        self.entries.iter().map(|e| e.price).sum()
    }
}

impl From<Vec<StockEntry>> for Stock {
    fn from(entries: Vec<StockEntry>) -> Self {
        Stock { entries }
    }
}

impl<'a> IntoIterator for &'a Stock {
    type Item = &'a StockEntry;
    type IntoIter = slice::Iter<'a, StockEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
