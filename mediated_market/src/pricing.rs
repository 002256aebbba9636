use crate::{round2, Market};
use serde::{Deserialize, Serialize};

/// The mediator's two thresholds
///
/// `seller` (pS) is the running average seller valuation: the mediator buys
/// from any seller at or below it. `buyer` (pB) is the running average buyer
/// valuation: the mediator sells to any buyer at or above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub seller: f64,
    pub buyer: f64,
}

impl PriceEstimate {
    pub fn new(seller: f64, buyer: f64) -> Self {
        PriceEstimate { seller, buyer }
    }

    /// Neutral prior used when nothing has been observed
    pub fn neutral(max_value: f64) -> Self {
        let mid = max_value / 2.0;
        PriceEstimate::new(mid, mid)
    }
}

/// Average seller and buyer valuations of a market, rounded to 2 decimals
///
/// An empty market yields `max_value / 2` for both sides.
pub fn average_valuations(market: &Market, max_value: f64) -> PriceEstimate {
    if market.is_empty() {
        let neutral = PriceEstimate::neutral(max_value);
        return PriceEstimate::new(round2(neutral.seller), round2(neutral.buyer));
    }

    let n = market.len() as f64;
    let (seller_sum, buyer_sum) = market
        .pairs()
        .fold((0.0, 0.0), |(s, b), (seller, buyer)| {
            (s + seller.valuation, b + buyer.valuation)
        });

    PriceEstimate::new(round2(seller_sum / n), round2(buyer_sum / n))
}

/// Fold one more observation into a mean built from `count` observations
///
/// The result is rounded on every call; repeated updates carry that rounding
/// forward instead of tracking the exact mean.
pub fn update_price(average: f64, new_value: f64, count: usize) -> f64 {
    let count = count as f64;
    round2((average * count + new_value) / (count + 1.0))
}
