//! Total price shown next to the buy quantity.

use rust_decimal::{Decimal, RoundingStrategy};

/// Total price of `quantity` tokens at `unit_price`, formatted with exactly
/// two decimal places. Halves round away from zero (3 × 1.005 → "3.02").
///
/// Returns `None` when the product does not fit in a `Decimal`.
pub fn compute_total(quantity: i64, unit_price: Decimal) -> Option<String> {
    Decimal::from(quantity).checked_mul(unit_price).map(format_price)
}

/// Format a price the same way [`compute_total`] formats totals
pub fn format_price(price: Decimal) -> String {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_compute_total_pads_to_two_places() {
        assert_eq!(compute_total(4, dec("2.50")).as_deref(), Some("10.00"));
        assert_eq!(compute_total(1, dec("1")).as_deref(), Some("1.00"));
        assert_eq!(compute_total(0, dec("2.50")).as_deref(), Some("0.00"));
    }

    #[test]
    fn test_compute_total_rounds_half_up() {
        assert_eq!(compute_total(3, dec("1.005")).as_deref(), Some("3.02"));
        assert_eq!(compute_total(1, dec("0.125")).as_deref(), Some("0.13"));
        assert_eq!(compute_total(1, dec("0.124")).as_deref(), Some("0.12"));
    }

    #[test]
    fn test_compute_total_is_exact_for_long_prices() {
        // 0.1 has no exact binary float representation
        assert_eq!(compute_total(3, dec("0.1")).as_deref(), Some("0.30"));
        assert_eq!(compute_total(1_000_000, dec("0.000001")).as_deref(), Some("1.00"));
    }

    #[test]
    fn test_always_two_decimal_digits() {
        for quantity in [0, 1, 7, 13, 250] {
            for price in ["0.01", "0.333", "1.5", "19.999", "42"] {
                let total = compute_total(quantity, dec(price)).unwrap();
                let (_, decimals) = total.split_once('.').unwrap();
                assert_eq!(decimals.len(), 2, "{} x {} gave {}", quantity, price, total);
            }
        }
    }

    #[test]
    fn test_compute_total_overflow_is_none() {
        assert_eq!(compute_total(i64::MAX, dec("100000000000")), None);
        assert_eq!(compute_total(i64::MIN, dec("100000000000")), None);
        assert!(compute_total(i64::MAX, dec("1")).is_some());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec("2.5")), "2.50");
    }
}
