use crate::{Market, Participant, Stock, StockEntry};
use std::fmt;

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {:>8.2} | {:<5} ]", self.valuation, self.holds_product)
    }
}

impl fmt::Display for StockEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {:>4} - {:>8.2} ]", self.seller_index, self.price)
    }
}

/// One line per pair: `[seller] - [buyer]`
impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (seller, buyer) in self.pairs() {
            writeln!(f, "{} - {}", seller, buyer)?;
        }
        Ok(())
    }
}

/// One line per unsold unit: `[origin seller - price]`
impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Market contents, optionally followed by the mediator's leftover stock
pub struct MarketReport<'a> {
    pub market: &'a Market,
    pub stock: Option<&'a Stock>,
}

impl<'a> MarketReport<'a> {
    pub fn new(market: &'a Market) -> Self {
        MarketReport {
            market,
            stock: None,
        }
    }

    pub fn with_stock(market: &'a Market, stock: &'a Stock) -> Self {
        MarketReport {
            market,
            stock: Some(stock),
        }
    }
}

impl fmt::Display for MarketReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.market)?;
        if let Some(stock) = self.stock {
            if stock.is_empty() {
                writeln!(f, "(mediator stock empty)")?;
            } else {
                writeln!(f, "Mediator stock:")?;
                write!(f, "{}", stock)?;
            }
        }
        Ok(())
    }
}
