//! Quote pricing.
//!
//! One formula, applied once at quote creation: the recurring total is
//! Σ(price_monthly × quantity) plus Σ(extra.unit_price × extra.quantity).
//! Setup fees are one-time charges, summed separately and never folded into
//! the recurring total.

use crate::models::quote::QuoteBreakdown;

/// An extra selected on a line, reduced to what pricing needs.
#[derive(Debug, Clone, Copy)]
pub struct PricedExtra {
    pub unit_price: f64,
    pub quantity: i32,
}

/// A plate line item, reduced to what pricing needs.
#[derive(Debug, Clone)]
pub struct PricedItem {
    pub price_monthly: f64,
    pub setup_fee: f64,
    pub quantity: i32,
    pub extras: Vec<PricedExtra>,
}

/// Computed totals for a quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteTotals {
    pub monthly_total: f64,
    pub extras_total: f64,
    pub setup_total: f64,
}

impl QuoteTotals {
    /// The amount stored on the quote: recurring charges plus extras.
    pub fn total_amount(&self) -> f64 {
        self.monthly_total + self.extras_total
    }

    pub fn breakdown(&self) -> QuoteBreakdown {
        QuoteBreakdown {
            monthly_total: self.monthly_total,
            extras_total: self.extras_total,
            setup_total: self.setup_total,
        }
    }
}

/// Computes quote totals over plate line items.
pub fn quote_totals(items: &[PricedItem]) -> QuoteTotals {
    let mut monthly_total = 0.0;
    let mut extras_total = 0.0;
    let mut setup_total = 0.0;

    for item in items {
        let quantity = f64::from(item.quantity);
        monthly_total += item.price_monthly * quantity;
        setup_total += item.setup_fee * quantity;
        for extra in &item.extras {
            extras_total += extra.unit_price * f64::from(extra.quantity);
        }
    }

    QuoteTotals {
        monthly_total,
        extras_total,
        setup_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, setup: f64, quantity: i32, extras: Vec<PricedExtra>) -> PricedItem {
        PricedItem {
            price_monthly: price,
            setup_fee: setup,
            quantity,
            extras,
        }
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let totals = quote_totals(&[]);
        assert_eq!(totals.monthly_total, 0.0);
        assert_eq!(totals.extras_total, 0.0);
        assert_eq!(totals.setup_total, 0.0);
        assert_eq!(totals.total_amount(), 0.0);
    }

    #[test]
    fn test_monthly_times_quantity() {
        let totals = quote_totals(&[item(19.99, 0.0, 2, vec![])]);
        assert_eq!(totals.monthly_total, 39.98);
        assert_eq!(totals.total_amount(), 39.98);
    }

    #[test]
    fn test_extras_included_in_total() {
        let extras = vec![PricedExtra { unit_price: 5.0, quantity: 3 }];
        let totals = quote_totals(&[item(10.0, 0.0, 1, extras)]);
        assert_eq!(totals.extras_total, 15.0);
        assert_eq!(totals.total_amount(), 25.0);
    }

    #[test]
    fn test_setup_fees_excluded_from_total() {
        let totals = quote_totals(&[item(10.0, 49.0, 2, vec![])]);
        assert_eq!(totals.setup_total, 98.0);
        assert_eq!(totals.total_amount(), 20.0);
    }

    #[test]
    fn test_mixed_cart() {
        let items = vec![
            item(129.99, 0.0, 1, vec![]),
            item(
                249.99,
                99.0,
                1,
                vec![PricedExtra { unit_price: 49.99, quantity: 2 }],
            ),
        ];
        let totals = quote_totals(&items);
        assert!((totals.monthly_total - 379.98).abs() < 1e-9);
        assert!((totals.extras_total - 99.98).abs() < 1e-9);
        assert_eq!(totals.setup_total, 99.0);
        assert!((totals.total_amount() - 479.96).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_mirrors_totals() {
        let totals = quote_totals(&[item(10.0, 5.0, 1, vec![])]);
        let breakdown = totals.breakdown();
        assert_eq!(breakdown.monthly_total, totals.monthly_total);
        assert_eq!(breakdown.extras_total, totals.extras_total);
        assert_eq!(breakdown.setup_total, totals.setup_total);
    }
}
