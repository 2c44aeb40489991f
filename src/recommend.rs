//! Recommendations

use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::{
    cart::Cart,
    catalog::{Catalog, Coupon},
    discounts::coupon_savings,
    eligibility::check_eligibility,
    money::round_currency,
    pricing::{CartBreakdown, PricingError, price_cart},
};

/// The evaluation of one coupon against a priced cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<'a> {
    /// The coupon this evaluation describes.
    pub coupon: &'a Coupon,

    /// Whether the coupon passed every eligibility rule.
    pub eligible: bool,

    /// Ordered audit trail produced by the eligibility checker.
    pub reasons: Vec<String>,

    /// Amount the coupon may discount against, rounded.
    pub applicable_amount: Decimal,

    /// Savings the coupon produces; zero when ineligible.
    pub savings: Decimal,

    /// Cart total minus savings, never negative.
    pub final_total: Decimal,
}

/// A priced cart together with every coupon's evaluation, ranked.
#[derive(Debug, Clone)]
pub struct CartEvaluation<'a> {
    /// The priced cart all evaluations were computed from.
    pub breakdown: CartBreakdown,

    /// One entry per coupon, sorted by descending savings, then ascending
    /// final total. The sort is stable, so ties keep their input order.
    pub evaluations: Vec<Evaluation<'a>>,
}

impl<'a> CartEvaluation<'a> {
    /// The recommended coupon: the best-ranked evaluation that is eligible
    /// with positive savings. `None` when no coupon qualifies, which is a
    /// normal outcome rather than an error.
    pub fn recommended(&self) -> Option<&Evaluation<'a>> {
        self.evaluations
            .iter()
            .find(|evaluation| evaluation.eligible && evaluation.savings > Decimal::ZERO)
    }
}

/// Price the cart once, then evaluate and rank every coupon against it.
///
/// # Errors
///
/// Returns [`PricingError::MissingProduct`] when the cart references an
/// unknown product id; no evaluations are produced in that case.
pub fn evaluate_coupons<'a>(
    coupons: &'a [Coupon],
    catalog: &Catalog,
    cart: &Cart,
    on: Date,
) -> Result<CartEvaluation<'a>, PricingError> {
    let breakdown = price_cart(catalog, cart)?;

    let mut evaluations: Vec<Evaluation<'a>> = coupons
        .iter()
        .map(|coupon| {
            let eligibility = check_eligibility(coupon, &breakdown, on);

            let (savings, final_total) = if eligibility.eligible {
                let savings =
                    coupon_savings(coupon, breakdown.total, eligibility.applicable_amount);
                (savings, round_currency(breakdown.total - savings))
            } else {
                (Decimal::ZERO, breakdown.total)
            };

            Evaluation {
                coupon,
                eligible: eligibility.eligible,
                reasons: eligibility.reasons,
                applicable_amount: eligibility.applicable_amount,
                savings,
                final_total,
            }
        })
        .collect();

    // Stable sort keeps input order for full ties, which makes repeated
    // runs deterministic.
    evaluations.sort_by(|a, b| {
        b.savings
            .cmp(&a.savings)
            .then(a.final_total.cmp(&b.final_total))
    });

    Ok(CartEvaluation {
        breakdown,
        evaluations,
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::catalog::{CategoryRule, DiscountType, Product};

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn test_catalog() -> Catalog {
        Catalog::from_products([
            Product::new("P001", "Headphones", "ELECTRONICS", dec("999")),
            Product::new("P003", "Smartwatch", "ELECTRONICS", dec("799")),
        ])
    }

    fn coupon(code: &str, discount_type: DiscountType, value: &str, cap: &str) -> Coupon {
        Coupon {
            code: code.to_string(),
            description: format!("{code} test coupon"),
            discount_type,
            discount_value: dec(value),
            min_cart_value: Decimal::ZERO,
            categories: CategoryRule::All,
            max_discount_amount: dec(cap),
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
            is_active: true,
        }
    }

    #[test]
    fn ranks_by_descending_savings() -> TestResult {
        let coupons = [
            coupon("FLAT150", DiscountType::Flat, "150", "150"),
            coupon("WELCOME10", DiscountType::Percent, "10", "250"),
        ];
        let cart = Cart::parse("P001:1, P003:1")?;

        let evaluated = evaluate_coupons(&coupons, &test_catalog(), &cart, date(2025, 5, 1))?;

        let codes: Vec<&str> = evaluated
            .evaluations
            .iter()
            .map(|e| e.coupon.code.as_str())
            .collect();

        assert_eq!(codes, ["WELCOME10", "FLAT150"]);
        assert_eq!(evaluated.evaluations[0].savings, dec("179.80"));
        assert_eq!(evaluated.evaluations[0].final_total, dec("1618.20"));

        Ok(())
    }

    #[test]
    fn recommends_best_eligible_coupon() -> TestResult {
        let coupons = [
            coupon("FLAT150", DiscountType::Flat, "150", "150"),
            coupon("WELCOME10", DiscountType::Percent, "10", "250"),
        ];
        let cart = Cart::parse("P001:1, P003:1")?;

        let evaluated = evaluate_coupons(&coupons, &test_catalog(), &cart, date(2025, 5, 1))?;
        let best = evaluated.recommended().ok_or("expected a recommendation")?;

        assert_eq!(best.coupon.code, "WELCOME10");
        assert_eq!(best.savings, dec("179.80"));
        assert_eq!(best.final_total, dec("1618.20"));

        Ok(())
    }

    #[test]
    fn ineligible_coupons_keep_zero_savings_and_full_total() -> TestResult {
        let coupons = [Coupon {
            is_active: false,
            ..coupon("SLEEPY", DiscountType::Percent, "10", "250")
        }];
        let cart = Cart::parse("P001:1")?;

        let evaluated = evaluate_coupons(&coupons, &test_catalog(), &cart, date(2025, 5, 1))?;

        assert_eq!(evaluated.evaluations[0].savings, Decimal::ZERO);
        assert_eq!(evaluated.evaluations[0].final_total, dec("999.00"));

        Ok(())
    }

    #[test]
    fn no_eligible_coupon_means_no_recommendation() -> TestResult {
        let coupons = [Coupon {
            is_active: false,
            ..coupon("SLEEPY", DiscountType::Percent, "10", "250")
        }];
        let cart = Cart::parse("P001:1")?;

        let evaluated = evaluate_coupons(&coupons, &test_catalog(), &cart, date(2025, 5, 1))?;

        assert!(evaluated.recommended().is_none());

        Ok(())
    }

    #[test]
    fn eligible_zero_savings_coupon_is_not_recommended() -> TestResult {
        // Unknown discount types pass eligibility but save nothing.
        let coupons = [coupon(
            "MYSTERY",
            DiscountType::Other("BOGO".to_string()),
            "50",
            "500",
        )];
        let cart = Cart::parse("P001:1")?;

        let evaluated = evaluate_coupons(&coupons, &test_catalog(), &cart, date(2025, 5, 1))?;

        assert!(evaluated.evaluations[0].eligible);
        assert_eq!(evaluated.evaluations[0].savings, Decimal::ZERO);
        assert!(evaluated.recommended().is_none());

        Ok(())
    }

    #[test]
    fn savings_ties_break_on_lower_final_total_and_stay_stable() -> TestResult {
        // Same savings, same final total: stable sort keeps input order.
        let coupons = [
            coupon("FIRST", DiscountType::Flat, "100", "100"),
            coupon("SECOND", DiscountType::Flat, "100", "100"),
        ];
        let cart = Cart::parse("P001:1, P003:1")?;

        let evaluated = evaluate_coupons(&coupons, &test_catalog(), &cart, date(2025, 5, 1))?;

        let codes: Vec<&str> = evaluated
            .evaluations
            .iter()
            .map(|e| e.coupon.code.as_str())
            .collect();

        assert_eq!(codes, ["FIRST", "SECOND"]);
        assert_eq!(
            evaluated.recommended().map(|e| e.coupon.code.as_str()),
            Some("FIRST")
        );

        Ok(())
    }

    #[test]
    fn missing_product_aborts_evaluation() -> TestResult {
        let coupons = [coupon("WELCOME10", DiscountType::Percent, "10", "250")];
        let cart = Cart::parse("P999:1")?;

        let result = evaluate_coupons(&coupons, &test_catalog(), &cart, date(2025, 5, 1));

        assert_eq!(
            result.map(|_| ()),
            Err(PricingError::MissingProduct("P999".to_string()))
        );

        Ok(())
    }
}
