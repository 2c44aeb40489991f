//! Catalog

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;

/// A product in the catalog.
///
/// Identifiers and categories are upper-cased at construction time so that
/// lookups and category matching are case-insensitive everywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Normalized product identifier, the catalog key.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Normalized category.
    pub category: String,

    /// Unit price, non-negative.
    pub price: Decimal,
}

impl Product {
    /// Create a product, normalizing the identifier and category to upper case.
    pub fn new(
        id: impl AsRef<str>,
        name: impl Into<String>,
        category: impl AsRef<str>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.as_ref().trim().to_uppercase(),
            name: name.into(),
            category: category.as_ref().trim().to_uppercase(),
            price,
        }
    }
}

/// How a coupon's discount value is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountType {
    /// `discount_value` is a percentage of the applicable amount.
    Percent,

    /// `discount_value` is a flat currency amount.
    Flat,

    /// An unrecognized type, preserved as loaded. Yields zero savings.
    Other(String),
}

impl DiscountType {
    /// Parse a discount type, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_uppercase();
        match normalized.as_str() {
            "PERCENT" => DiscountType::Percent,
            "FLAT" => DiscountType::Flat,
            _ => DiscountType::Other(normalized),
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percent => f.write_str("PERCENT"),
            DiscountType::Flat => f.write_str("FLAT"),
            DiscountType::Other(raw) => f.write_str(raw),
        }
    }
}

/// Which part of the cart a coupon may discount against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRule {
    /// The coupon applies to the whole cart.
    All,

    /// The coupon applies only to the listed categories (upper-cased,
    /// non-empty).
    Only(BTreeSet<String>),
}

impl CategoryRule {
    /// Parse a semicolon-separated category list, or the literal `ALL`.
    ///
    /// Returns `None` when the list contains no usable category names.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("ALL") {
            return Some(CategoryRule::All);
        }

        let categories: BTreeSet<String> = raw
            .split(';')
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_uppercase)
            .collect();

        if categories.is_empty() {
            None
        } else {
            Some(CategoryRule::Only(categories))
        }
    }
}

/// A discount coupon.
///
/// Immutable once loaded. The validity window is inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    /// Coupon code, upper-cased. Duplicates are the caller's concern.
    pub code: String,

    /// Human-readable description.
    pub description: String,

    /// Discount model.
    pub discount_type: DiscountType,

    /// Percentage points or flat amount, depending on `discount_type`.
    pub discount_value: Decimal,

    /// Minimum cart total for the coupon to apply.
    pub min_cart_value: Decimal,

    /// Categories the coupon discounts against.
    pub categories: CategoryRule,

    /// Upper bound on the computed savings.
    pub max_discount_amount: Decimal,

    /// First day the coupon is valid.
    pub start_date: Date,

    /// Last day the coupon is valid.
    pub end_date: Date,

    /// Whether the coupon is currently enabled at all.
    pub is_active: bool,
}

/// The product catalog, keyed by normalized product identifier.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from products. Later duplicates replace earlier ones.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();

        Self { products }
    }

    /// Look up a product by identifier. The lookup is case-insensitive.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(&id.trim().to_uppercase())
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over the products in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}
