//! Discounts

use rust_decimal::Decimal;

use crate::{
    catalog::{Coupon, DiscountType},
    money::round_currency,
};

/// Compute the savings an eligible coupon produces.
///
/// - `PERCENT`: `applicable_amount * discount_value / 100`, capped at the
///   coupon's `max_discount_amount`.
/// - `FLAT`: `discount_value`, capped at `max_discount_amount`.
/// - Anything else yields zero savings; unrecognized types degrade
///   gracefully rather than erroring (the loader warns about them).
///
/// The result is clamped so savings never exceed the cart total, then
/// rounded to two decimals.
#[must_use]
pub fn coupon_savings(coupon: &Coupon, cart_total: Decimal, applicable_amount: Decimal) -> Decimal {
    let capped = match &coupon.discount_type {
        DiscountType::Percent => {
            let raw = applicable_amount * coupon.discount_value / Decimal::ONE_HUNDRED;
            raw.min(coupon.max_discount_amount)
        }
        DiscountType::Flat => coupon.discount_value.min(coupon.max_discount_amount),
        DiscountType::Other(_) => Decimal::ZERO,
    };

    round_currency(capped.min(cart_total))
}
