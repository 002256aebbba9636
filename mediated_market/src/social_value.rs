//! Social value: the sum of valuations of whoever ends up holding a unit
//!
//! - `max_social_value`: offline optimum, the N highest of all 2N valuations
//! - `true_social_value`: what the clearing pass actually achieved
//! - `better_social_value`: as above, with unsold stock credited back to its sellers
//!
//! For any clearing, `true <= better <= max`.

use crate::{round2, Market, Stock};

/// Best achievable social value for `market`
///
/// Exactly N of the 2N participants can hold a unit, so the optimum gives the
/// N units to the N highest valuations regardless of role.
pub fn max_social_value(market: &Market) -> f64 {
    let mut valuations: Vec<f64> = market.participants().map(|p| p.valuation).collect();
    valuations.sort_by(|a, b| b.total_cmp(a));
    round2(valuations.iter().take(market.len()).sum())
}

/// Value held by participants flagged as holding a unit
pub fn true_social_value(market: &Market) -> f64 {
    round2(
        market
            .participants()
            .filter(|p| p.holds_product)
            .map(|p| p.valuation)
            .sum(),
    )
}

/// Realized value plus each unsold unit returned to its origin seller
///
/// A stock entry's price is the origin seller's valuation, so crediting the
/// price is the same as handing the unit back.
pub fn better_social_value(market: &Market, stock: &Stock) -> f64 {
    round2(true_social_value(market) + stock.total_value())
}
