//! Eligibility

use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::{
    catalog::{CategoryRule, Coupon},
    money::round_currency,
    pricing::CartBreakdown,
};

/// Outcome of running a coupon through the eligibility rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Eligibility {
    /// Whether the coupon passed every rule.
    pub eligible: bool,

    /// Ordered audit trail: one human-readable line per rule attempted.
    pub reasons: Vec<String>,

    /// Portion of the cart total the coupon may discount against, rounded.
    /// Zero when the active/date checks fail before it is computed.
    pub applicable_amount: Decimal,
}

impl Eligibility {
    fn ineligible(reasons: Vec<String>, applicable_amount: Decimal) -> Self {
        Self {
            eligible: false,
            reasons,
            applicable_amount,
        }
    }
}

/// Evaluate a coupon's rules against a priced cart on a given date.
///
/// The rules run in a strict order, short-circuiting at the first failure
/// while recording a reason line for every rule attempted:
///
/// 1. active flag
/// 2. validity window (inclusive on both ends)
/// 3. applicable-amount computation
/// 4. minimum cart value
/// 5. positive applicable amount
///
/// The evaluation date is an explicit parameter; this function never reads
/// the wall clock.
pub fn check_eligibility(coupon: &Coupon, breakdown: &CartBreakdown, on: Date) -> Eligibility {
    let mut reasons = Vec::new();

    if !coupon.is_active {
        reasons.push("Coupon is not active.".to_string());
        return Eligibility::ineligible(reasons, Decimal::ZERO);
    }

    if on < coupon.start_date {
        reasons.push(format!("Coupon not started (starts {}).", coupon.start_date));
        return Eligibility::ineligible(reasons, Decimal::ZERO);
    }

    if on > coupon.end_date {
        reasons.push(format!("Coupon expired on {}.", coupon.end_date));
        return Eligibility::ineligible(reasons, Decimal::ZERO);
    }

    reasons.push("Date & active checks passed.".to_string());

    let applicable_amount = applicable_amount(coupon, breakdown);
    reasons.push(format!(
        "Applicable amount for coupon (by category): {applicable_amount:.2}"
    ));

    if breakdown.total < coupon.min_cart_value {
        reasons.push(format!(
            "Cart total {:.2} is less than coupon's min required {:.2}.",
            breakdown.total, coupon.min_cart_value
        ));
        return Eligibility::ineligible(reasons, applicable_amount);
    }

    reasons.push(format!(
        "Cart total {:.2} satisfies min cart value {:.2}.",
        breakdown.total, coupon.min_cart_value
    ));

    if applicable_amount <= Decimal::ZERO {
        reasons.push(
            "No items from coupon's applicable categories are present in the cart.".to_string(),
        );
        return Eligibility::ineligible(reasons, applicable_amount);
    }

    reasons.push("Coupon eligible based on rules.".to_string());

    Eligibility {
        eligible: true,
        reasons,
        applicable_amount,
    }
}

/// The amount the coupon's category rule lets it discount against.
///
/// `ALL` coupons apply to the whole cart total; category-restricted
/// coupons apply to the sum of the listed category totals, with absent
/// categories counting as zero.
fn applicable_amount(coupon: &Coupon, breakdown: &CartBreakdown) -> Decimal {
    match &coupon.categories {
        CategoryRule::All => round_currency(breakdown.total),
        CategoryRule::Only(categories) => round_currency(
            breakdown.category_sum(categories.iter().map(String::as_str)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use jiff::civil::date;
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        catalog::{Catalog, DiscountType, Product},
        pricing::price_cart,
    };

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn welcome10() -> Coupon {
        Coupon {
            code: "WELCOME10".to_string(),
            description: "10% off for new customers".to_string(),
            discount_type: DiscountType::Percent,
            discount_value: dec("10"),
            min_cart_value: Decimal::ZERO,
            categories: CategoryRule::All,
            max_discount_amount: dec("250"),
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
            is_active: true,
        }
    }

    fn priced_electronics_cart() -> CartBreakdown {
        let catalog = Catalog::from_products([
            Product::new("P001", "Headphones", "ELECTRONICS", dec("999")),
            Product::new("P003", "Smartwatch", "ELECTRONICS", dec("799")),
        ]);
        let cart = Cart::parse("P001:1, P003:1").expect("valid cart literal");

        price_cart(&catalog, &cart).expect("cart prices cleanly")
    }

    #[test]
    fn eligible_coupon_passes_all_checks() {
        let breakdown = priced_electronics_cart();

        let result = check_eligibility(&welcome10(), &breakdown, date(2025, 5, 1));

        assert!(result.eligible);
        assert_eq!(result.applicable_amount, dec("1798.00"));
        assert_eq!(
            result.reasons,
            [
                "Date & active checks passed.",
                "Applicable amount for coupon (by category): 1798.00",
                "Cart total 1798.00 satisfies min cart value 0.00.",
                "Coupon eligible based on rules.",
            ]
        );
    }

    #[test]
    fn inactive_coupon_is_rejected_before_anything_else() {
        let breakdown = priced_electronics_cart();
        let coupon = Coupon {
            is_active: false,
            ..welcome10()
        };

        let result = check_eligibility(&coupon, &breakdown, date(2025, 5, 1));

        assert!(!result.eligible);
        assert_eq!(result.applicable_amount, Decimal::ZERO);
        assert_eq!(result.reasons, ["Coupon is not active."]);
    }

    #[test]
    fn coupon_before_window_is_not_started() {
        let breakdown = priced_electronics_cart();

        let result = check_eligibility(&welcome10(), &breakdown, date(2024, 12, 31));

        assert!(!result.eligible);
        assert_eq!(result.reasons, ["Coupon not started (starts 2025-01-01)."]);
    }

    #[test]
    fn coupon_after_window_is_expired() {
        let breakdown = priced_electronics_cart();

        let result = check_eligibility(&welcome10(), &breakdown, date(2026, 1, 1));

        assert!(!result.eligible);
        assert_eq!(result.reasons, ["Coupon expired on 2025-12-31."]);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let breakdown = priced_electronics_cart();

        assert!(check_eligibility(&welcome10(), &breakdown, date(2025, 1, 1)).eligible);
        assert!(check_eligibility(&welcome10(), &breakdown, date(2025, 12, 31)).eligible);
    }

    #[test]
    fn min_cart_value_failure_keeps_applicable_amount() {
        let breakdown = priced_electronics_cart();
        let coupon = Coupon {
            min_cart_value: dec("2000"),
            ..welcome10()
        };

        let result = check_eligibility(&coupon, &breakdown, date(2025, 5, 1));

        assert!(!result.eligible);
        assert_eq!(result.applicable_amount, dec("1798.00"));
        assert_eq!(
            result.reasons.last().map(String::as_str),
            Some("Cart total 1798.00 is less than coupon's min required 2000.00.")
        );
    }

    #[test]
    fn category_restricted_coupon_sums_only_listed_categories() {
        let breakdown = priced_electronics_cart();
        let coupon = Coupon {
            categories: CategoryRule::Only(BTreeSet::from(["ELECTRONICS".to_string()])),
            ..welcome10()
        };

        let result = check_eligibility(&coupon, &breakdown, date(2025, 5, 1));

        assert!(result.eligible);
        assert_eq!(result.applicable_amount, dec("1798.00"));
    }

    #[test]
    fn no_matching_categories_yields_ineligible() {
        let breakdown = priced_electronics_cart();
        let coupon = Coupon {
            categories: CategoryRule::Only(BTreeSet::from(["GROCERY".to_string()])),
            ..welcome10()
        };

        let result = check_eligibility(&coupon, &breakdown, date(2025, 5, 1));

        assert!(!result.eligible);
        assert_eq!(result.applicable_amount, Decimal::ZERO);
        assert_eq!(
            result.reasons.last().map(String::as_str),
            Some("No items from coupon's applicable categories are present in the cart.")
        );
    }

    #[test]
    fn eligibility_is_pure_in_the_evaluation_date() {
        let breakdown = priced_electronics_cart();
        let coupon = welcome10();

        let first = check_eligibility(&coupon, &breakdown, date(2025, 5, 1));
        let second = check_eligibility(&coupon, &breakdown, date(2025, 5, 1));

        assert_eq!(first, second);
    }
}
