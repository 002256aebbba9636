use crate::valuation::ValuationSource;
use crate::{Market, MarketError};

/// Bernoulli(p) draw: true when a unit-interval draw is at or below `p`
pub fn pick<S>(source: &mut S, p: f64) -> Result<bool, MarketError>
where
    S: ValuationSource + ?Sized,
{
    check_probability(p)?;
    Ok(source.uniform(0.0, 1.0) <= p)
}

/// Split a market into `(sample, ready)`
///
/// Each pair independently goes to the sample with probability `p`, keeping
/// both participants' valuations and flags. Both outputs keep the original
/// relative order. With `p == 0` every pair stays ready unless a draw is
/// exactly 0.0, since the draw is compared with `<=`.
pub fn break_market<S>(
    source: &mut S,
    market: &Market,
    p: f64,
) -> Result<(Market, Market), MarketError>
where
    S: ValuationSource + ?Sized,
{
    check_probability(p)?;

    let mut sample_sellers = Vec::new();
    let mut sample_buyers = Vec::new();
    let mut ready_sellers = Vec::with_capacity(market.len());
    let mut ready_buyers = Vec::with_capacity(market.len());

    for (seller, buyer) in market.pairs() {
        if source.uniform(0.0, 1.0) <= p {
            sample_sellers.push(*seller);
            sample_buyers.push(*buyer);
        } else {
            ready_sellers.push(*seller);
            ready_buyers.push(*buyer);
        }
    }

    tracing::trace!(
        sample = sample_sellers.len(),
        ready = ready_sellers.len(),
        p,
        "market partitioned"
    );

    Ok((
        Market::from_pairs(sample_sellers, sample_buyers),
        Market::from_pairs(ready_sellers, ready_buyers),
    ))
}

fn check_probability(p: f64) -> Result<(), MarketError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(MarketError::InvalidProbability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::{ScriptedSource, SeededSource};
    use crate::Participant;

    fn market(n: usize) -> Market {
        Market::new(
            (0..n).map(|i| Participant::seller(i as f64)).collect(),
            (0..n).map(|i| Participant::buyer(100.0 + i as f64)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_pick_threshold_is_inclusive() {
        let mut source = ScriptedSource::new(vec![0.3, 0.31]);
        assert!(pick(&mut source, 0.3).unwrap());
        assert!(!pick(&mut source, 0.3).unwrap());
    }

    #[test]
    fn test_pick_rejects_out_of_range() {
        let mut source = SeededSource::new(0);
        assert_eq!(
            pick(&mut source, 1.5),
            Err(MarketError::InvalidProbability(1.5))
        );
        assert!(pick(&mut source, -0.1).is_err());
        assert!(pick(&mut source, f64::NAN).is_err());
    }

    #[test]
    fn test_break_market_is_stable_partition() {
        // pairs 0, 2, 3 go to the sample
        let mut source = ScriptedSource::new(vec![0.1, 0.9, 0.2, 0.5, 0.8]);
        let (sample, ready) = break_market(&mut source, &market(5), 0.5).unwrap();

        let sample_idx: Vec<f64> = sample.sellers().iter().map(|s| s.valuation).collect();
        let ready_idx: Vec<f64> = ready.sellers().iter().map(|s| s.valuation).collect();
        assert_eq!(sample_idx, vec![0.0, 2.0, 3.0]);
        assert_eq!(ready_idx, vec![1.0, 4.0]);

        // buyers travel with their paired seller
        let sample_buyers: Vec<f64> = sample.buyers().iter().map(|b| b.valuation).collect();
        assert_eq!(sample_buyers, vec![100.0, 102.0, 103.0]);
    }

    #[test]
    fn test_break_market_conserves_pairs() {
        let mut source = SeededSource::new(11);
        let original = market(100);
        let (sample, ready) = break_market(&mut source, &original, 0.27).unwrap();
        assert_eq!(sample.len() + ready.len(), original.len());
        assert_eq!(sample.sellers().len(), sample.buyers().len());
        assert_eq!(ready.sellers().len(), ready.buyers().len());
    }

    #[test]
    fn test_probability_zero_keeps_everything_ready() {
        let mut source = ScriptedSource::new(vec![0.4, 0.7, 0.01]);
        let original = market(3);
        let (sample, ready) = break_market(&mut source, &original, 0.0).unwrap();
        assert!(sample.is_empty());
        assert_eq!(ready, original);
    }

    #[test]
    fn test_probability_one_samples_everything() {
        let mut source = SeededSource::new(5);
        let original = market(20);
        let (sample, ready) = break_market(&mut source, &original, 1.0).unwrap();
        assert_eq!(sample, original);
        assert!(ready.is_empty());
    }

    #[test]
    fn test_break_market_rejects_invalid_probability() {
        let mut source = SeededSource::new(5);
        assert!(break_market(&mut source, &market(3), 2.0).is_err());
    }
}
