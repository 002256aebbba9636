//! One-pass mediated clearing
//!
//! The mediator walks the ready market pair by pair. For pair i it:
//! 1. buys seller i's unit when the seller's valuation is at or below pS;
//! 2. offers its cheapest unit to buyer i when the buyer's valuation is at or
//!    above pB, completing the sale only if that unit's purchase price does not
//!    exceed the buyer's valuation (a unit bought in step 1 is already eligible);
//! 3. folds both valuations into pS and pB using the same pre-increment count.
//!
//! Thresholds carry forward, so pair i+1 is decided only after pair i's update.

use crate::pricing::{average_valuations, update_price, PriceEstimate};
use crate::{Market, Participant, Stock, StockEntry};

/// Running mediator state for a clearing pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mediator {
    prices: PriceEstimate,
    observations: usize,
}

/// Result of a clearing pass
#[derive(Debug, Clone, PartialEq)]
pub struct Clearing {
    /// The input market with final ownership flags; valuations untouched
    pub market: Market,
    /// Units bought and never resold
    pub stock: Stock,
}

impl Mediator {
    /// Start from explicit thresholds that already summarise `observations` valuations
    pub fn new(prices: PriceEstimate, observations: usize) -> Self {
        Mediator {
            prices,
            observations,
        }
    }

    /// Thresholds from a sample market, weighted by the sample's size
    pub fn from_sample(sample: &Market, max_value: f64) -> Self {
        Mediator::new(average_valuations(sample, max_value), sample.len())
    }

    pub fn prices(&self) -> PriceEstimate {
        self.prices
    }

    /// Valuations folded into each threshold so far
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Clear `market` in arrival order, returning a new market and leftover stock
    pub fn clear(&mut self, market: &Market) -> Clearing {
        let mut stock = Stock::new();
        let mut sellers = Vec::with_capacity(market.len());
        let mut buyers = Vec::with_capacity(market.len());

        for (index, (seller, buyer)) in market.pairs().enumerate() {
            let (seller, buyer) = self.step(index, seller, buyer, &mut stock);
            sellers.push(seller);
            buyers.push(buyer);
        }

        tracing::debug!(
            pairs = market.len(),
            unsold = stock.len(),
            seller_price = self.prices.seller,
            buyer_price = self.prices.buyer,
            observations = self.observations,
            "clearing pass complete"
        );

        Clearing {
            market: Market::from_pairs(sellers, buyers),
            stock,
        }
    }

    fn step(
        &mut self,
        index: usize,
        seller: &Participant,
        buyer: &Participant,
        stock: &mut Stock,
    ) -> (Participant, Participant) {
        let bought = seller.valuation <= self.prices.seller;
        if bought {
            stock.push(StockEntry {
                seller_index: index,
                price: seller.valuation,
            });
        }

        let sold = buyer.valuation >= self.prices.buyer && sell_to(buyer.valuation, stock);

        tracing::trace!(
            index,
            seller_price = self.prices.seller,
            buyer_price = self.prices.buyer,
            bought,
            sold,
            "pair decided"
        );

        self.prices = PriceEstimate::new(
            update_price(self.prices.seller, seller.valuation, self.observations),
            update_price(self.prices.buyer, buyer.valuation, self.observations),
        );
        self.observations += 1;

        (seller.with_product(!bought), buyer.with_product(sold))
    }
}

/// Hand the cheapest unit to a buyer who values it at least at its purchase price
fn sell_to(buyer_valuation: f64, stock: &mut Stock) -> bool {
    let affordable = stock
        .min_product()
        .is_some_and(|entry| entry.price <= buyer_valuation);
    if affordable {
        stock.take_min_product();
    }
    affordable
}

/// Position of the cheapest stock entry
///
/// Linear scan that replaces the running minimum whenever a candidate's price
/// is `<=` the current one. Among equal minima the LAST entry wins.
pub fn min_product_position(stock: &[StockEntry]) -> Option<usize> {
    let (first, rest) = stock.split_first()?;
    let mut best = 0;
    let mut best_price = first.price;
    for (offset, entry) in rest.iter().enumerate() {
        if entry.price <= best_price {
            best = offset + 1;
            best_price = entry.price;
        }
    }
    Some(best)
}

/// Clear a ready market from explicit thresholds and a starting observation count
pub fn run_market(market: &Market, observations: usize, prices: PriceEstimate) -> Clearing {
    Mediator::new(prices, observations).clear(market)
}
