//! Pricing

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::Cart, catalog::Catalog, money::round_currency};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The cart references a product id that is not in the catalog.
    ///
    /// Fatal for the whole calculation; no partial totals are produced.
    #[error("product id '{0}' not found in product catalog")]
    MissingProduct(String),
}

/// One priced cart entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Normalized product identifier.
    pub product_id: String,

    /// Product display name.
    pub name: String,

    /// Normalized product category.
    pub category: String,

    /// Unit price as held in the catalog, unrounded.
    pub unit_price: Decimal,

    /// Quantity purchased.
    pub quantity: u32,

    /// `unit_price * quantity`, rounded to two decimals.
    pub subtotal: Decimal,
}

/// A fully priced cart: the grand total, per-category totals, and line items.
#[derive(Debug, Clone, PartialEq)]
pub struct CartBreakdown {
    /// Sum of all line subtotals, rounded to two decimals.
    pub total: Decimal,

    /// Per-category sums of line subtotals, each rounded to two decimals.
    pub category_totals: BTreeMap<String, Decimal>,

    /// One entry per distinct product, in identifier order.
    pub line_items: Vec<LineItem>,
}

impl CartBreakdown {
    /// Total of the categories listed, treating absent categories as zero.
    pub fn category_sum<'a>(&self, categories: impl IntoIterator<Item = &'a str>) -> Decimal {
        categories
            .into_iter()
            .filter_map(|category| self.category_totals.get(category))
            .sum()
    }
}

/// Price a cart against the catalog.
///
/// Accumulation happens on exact decimals; the total and each category
/// total are rounded once at the end. Quantities are trusted to be
/// positive, which [`Cart`] guarantees.
///
/// # Errors
///
/// Returns [`PricingError::MissingProduct`] naming the first cart entry
/// whose id is absent from the catalog.
pub fn price_cart(catalog: &Catalog, cart: &Cart) -> Result<CartBreakdown, PricingError> {
    let mut total = Decimal::ZERO;
    let mut category_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut line_items = Vec::with_capacity(cart.len());

    for (id, quantity) in cart.iter() {
        let product = catalog
            .get(id)
            .ok_or_else(|| PricingError::MissingProduct(id.to_string()))?;

        let subtotal = product.price * Decimal::from(quantity);
        total += subtotal;
        *category_totals
            .entry(product.category.clone())
            .or_insert(Decimal::ZERO) += subtotal;

        line_items.push(LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            unit_price: product.price,
            quantity,
            subtotal: round_currency(subtotal),
        });
    }

    let category_totals = category_totals
        .into_iter()
        .map(|(category, amount)| (category, round_currency(amount)))
        .collect();

    Ok(CartBreakdown {
        total: round_currency(total),
        category_totals,
        line_items,
    })
}
