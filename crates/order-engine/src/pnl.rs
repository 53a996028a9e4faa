//! Mark-to-market

use papertrade_core::{Position, Quote};

/// Reprice `position` at the quote's price
///
/// Pure: the input is untouched and the quote's timestamp becomes the
/// position's update time.
pub fn refresh_pnl(position: &Position, quote: &Quote) -> Position {
    position.marked_to(quote.price, quote.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use papertrade_core::Symbol;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn quote(price: Decimal) -> Quote {
        Quote::from_previous_close(Symbol::normalize("reliance"), price, None, Utc::now())
    }

    #[test]
    fn test_refresh_gain() {
        let position = Position::open(Symbol::normalize("reliance"), 10, dec!(2450), Utc::now());
        let refreshed = refresh_pnl(&position, &quote(dec!(2500)));

        assert_eq!(refreshed.current_price, dec!(2500));
        assert_eq!(refreshed.pnl, dec!(500));
        assert_eq!(refreshed.pnl_percent.round_dp(4), dec!(2.0408));
        assert_eq!(refreshed.quantity, 10);
        assert_eq!(position.pnl, Decimal::ZERO);
    }

    #[test]
    fn test_refresh_loss() {
        let position = Position::open(Symbol::normalize("reliance"), 4, dec!(100), Utc::now());
        let refreshed = refresh_pnl(&position, &quote(dec!(75)));

        assert_eq!(refreshed.pnl, dec!(-100));
        assert_eq!(refreshed.pnl_percent, dec!(-25));
    }
}
