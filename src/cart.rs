//! Cart

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors produced while parsing an external cart string.
///
/// Malformed carts are rejected here, before they reach the pricing
/// engine; the engine only ever sees validated positive quantities keyed
/// by normalized identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A token had no `:` separator between the id and the quantity.
    #[error("invalid item '{0}'; use PRODUCT_ID:QTY format")]
    MissingSeparator(String),

    /// A token's quantity was not a valid integer.
    #[error("invalid quantity for '{id}': '{quantity}'")]
    InvalidQuantity {
        /// Normalized product id of the offending token.
        id: String,
        /// The raw quantity text as entered.
        quantity: String,
    },

    /// A token's quantity was zero or negative.
    #[error("quantity must be positive for '{0}'")]
    NonPositiveQuantity(String),

    /// A product's quantity, alone or accumulated across duplicate
    /// tokens, exceeds the supported maximum.
    #[error("quantity for '{0}' is too large")]
    QuantityOverflow(String),
}

/// A shopping cart: normalized product identifier to positive quantity.
///
/// Transient and cheap; construct one per evaluation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: BTreeMap<String, u32>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated `PRODUCT_ID:QTY` list.
    ///
    /// Identifiers are upper-cased; duplicate identifiers accumulate their
    /// quantities. Empty tokens are ignored, so trailing commas are fine.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] naming the offending token when an item is
    /// missing its `:` separator, carries a non-integer or non-positive
    /// quantity, or overflows a product's accumulated quantity.
    pub fn parse(input: &str) -> Result<Self, CartError> {
        let mut cart = Cart::new();

        for token in input.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            let Some((id, quantity)) = token.split_once(':') else {
                return Err(CartError::MissingSeparator(token.to_string()));
            };

            let id = id.trim().to_uppercase();
            let quantity = quantity.trim();

            let quantity: i128 =
                quantity
                    .parse()
                    .map_err(|_| CartError::InvalidQuantity {
                        id: id.clone(),
                        quantity: quantity.to_string(),
                    })?;

            if quantity <= 0 {
                return Err(CartError::NonPositiveQuantity(id));
            }

            let quantity = u32::try_from(quantity)
                .map_err(|_| CartError::QuantityOverflow(id.clone()))?;

            cart.add(id, quantity)?;
        }

        Ok(cart)
    }

    /// Add a quantity of a product, accumulating onto any existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] when the accumulated
    /// quantity for the product would exceed [`u32::MAX`]; the cart is
    /// left unchanged in that case.
    pub fn add(&mut self, id: impl AsRef<str>, quantity: u32) -> Result<(), CartError> {
        let id = id.as_ref().trim().to_uppercase();

        let current = self.items.get(&id).copied().unwrap_or(0);
        let total = current
            .checked_add(quantity)
            .ok_or_else(|| CartError::QuantityOverflow(id.clone()))?;
        self.items.insert(id, total);

        Ok(())
    }

    /// Iterate over `(product_id, quantity)` entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(id, quantity)| (id.as_str(), *quantity))
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
