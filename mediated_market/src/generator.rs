use crate::valuation::ValuationSource;
use crate::{round2, Market, MarketError, Participant};

/// Build a market of `num_pairs` sellers and buyers
///
/// Every valuation is drawn independently from `[0, max_value]` and rounded to
/// 2 decimals. All buyer valuations are drawn before any seller valuation, so
/// a scripted source lists buyers first.
pub fn create_market<S>(
    source: &mut S,
    num_pairs: usize,
    max_value: f64,
) -> Result<Market, MarketError>
where
    S: ValuationSource + ?Sized,
{
    if !max_value.is_finite() || max_value <= 0.0 {
        return Err(MarketError::InvalidMaxValue(max_value));
    }

    let buyers: Vec<Participant> = (0..num_pairs)
        .map(|_| Participant::buyer(round2(source.uniform(0.0, max_value))))
        .collect();
    let sellers: Vec<Participant> = (0..num_pairs)
        .map(|_| Participant::seller(round2(source.uniform(0.0, max_value))))
        .collect();

    Ok(Market::from_pairs(sellers, buyers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::{ScriptedSource, SeededSource};

    #[test]
    fn test_create_market_sizes_and_flags() {
        let mut source = SeededSource::new(42);
        let market = create_market(&mut source, 50, 1000.0).unwrap();

        assert_eq!(market.sellers().len(), 50);
        assert_eq!(market.buyers().len(), 50);
        assert!(market.sellers().iter().all(|s| s.holds_product));
        assert!(market.buyers().iter().all(|b| !b.holds_product));
    }

    #[test]
    fn test_valuations_in_range_and_rounded() {
        let mut source = SeededSource::new(3);
        let market = create_market(&mut source, 200, 100.0).unwrap();

        for p in market.participants() {
            assert!((0.0..=100.0).contains(&p.valuation));
            assert_eq!(round2(p.valuation), p.valuation);
        }
    }

    #[test]
    fn test_buyers_are_drawn_before_sellers() {
        let mut source = ScriptedSource::new(vec![0.1, 0.2, 0.3, 0.4]);
        let market = create_market(&mut source, 2, 100.0).unwrap();

        let buyers: Vec<f64> = market.buyers().iter().map(|b| b.valuation).collect();
        let sellers: Vec<f64> = market.sellers().iter().map(|s| s.valuation).collect();
        assert_eq!(buyers, vec![10.0, 20.0]);
        assert_eq!(sellers, vec![30.0, 40.0]);
    }

    #[test]
    fn test_zero_pairs_yields_empty_market() {
        let mut source = SeededSource::new(0);
        let market = create_market(&mut source, 0, 1000.0).unwrap();
        assert!(market.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_max_value() {
        let mut source = SeededSource::new(0);
        assert_eq!(
            create_market(&mut source, 5, 0.0),
            Err(MarketError::InvalidMaxValue(0.0))
        );
        assert!(create_market(&mut source, 5, -10.0).is_err());
        assert!(create_market(&mut source, 5, f64::INFINITY).is_err());
    }
}
