//! Money helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a currency amount to two decimal places.
///
/// Every figure the engine reports is rounded exactly once, at the point
/// it is computed. Callers must not re-round already rounded values.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
