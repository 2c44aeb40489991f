//! Loader
//!
//! CSV catalog loading. The engine assumes a well-formed catalog, so this
//! is where malformed rows stop: rows missing their key field are skipped
//! silently, rows with unparseable numbers or dates are skipped with a
//! warning naming the row, and unknown discount types are warned about but
//! kept (they evaluate to zero savings downstream).

use std::path::Path;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CategoryRule, Coupon, DiscountType, Product};

/// Errors reading a catalog file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read or a record could not be parsed as CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(default)]
    product_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    price: String,
}

#[derive(Debug, Deserialize)]
struct CouponRow {
    #[serde(default)]
    coupon_code: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    discount_type: String,
    #[serde(default)]
    discount_value: String,
    #[serde(default)]
    min_cart_value: String,
    #[serde(default)]
    applicable_categories: String,
    #[serde(default)]
    max_discount_amount: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    is_active: String,
}

/// Load the product catalog from a CSV file.
///
/// Columns: `product_id, name, category, price`. Later rows with a
/// duplicate id replace earlier ones.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] when the file cannot be read or a record is
/// not valid CSV.
pub fn load_products(path: impl AsRef<Path>) -> Result<Catalog, LoadError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut products = Vec::new();

    for (index, row) in reader.deserialize::<ProductRow>().enumerate() {
        let row = row?;
        let line = index + 2; // header is line 1

        if row.product_id.trim().is_empty() {
            continue;
        }

        let Some(price) = parse_decimal(&row.price) else {
            warn!(line, product_id = %row.product_id, price = %row.price, "skipping product row with unparseable price");
            continue;
        };

        if price < Decimal::ZERO {
            warn!(line, product_id = %row.product_id, %price, "skipping product row with negative price");
            continue;
        }

        products.push(Product::new(
            &row.product_id,
            row.name.trim(),
            &row.category,
            price,
        ));
    }

    let catalog = Catalog::from_products(products);
    debug!(count = catalog.len(), "loaded product catalog");

    Ok(catalog)
}

/// Load the coupon catalog from a CSV file.
///
/// Columns: `coupon_code, description, discount_type, discount_value,
/// min_cart_value, applicable_categories, max_discount_amount,
/// start_date, end_date, is_active`. Duplicate codes are allowed.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] when the file cannot be read or a record is
/// not valid CSV.
pub fn load_coupons(path: impl AsRef<Path>) -> Result<Vec<Coupon>, LoadError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut coupons = Vec::new();

    for (index, row) in reader.deserialize::<CouponRow>().enumerate() {
        let row = row?;
        let line = index + 2;

        if row.coupon_code.trim().is_empty() {
            continue;
        }
        let code = row.coupon_code.trim().to_uppercase();

        let (Some(discount_value), Some(min_cart_value), Some(max_discount_amount)) = (
            parse_decimal(&row.discount_value),
            parse_decimal(&row.min_cart_value),
            parse_decimal(&row.max_discount_amount),
        ) else {
            warn!(line, coupon_code = %code, "skipping coupon row with unparseable amounts");
            continue;
        };

        let (Some(start_date), Some(end_date)) =
            (parse_date(&row.start_date), parse_date(&row.end_date))
        else {
            warn!(line, coupon_code = %code, "skipping coupon row with unparseable dates");
            continue;
        };

        let Some(categories) = CategoryRule::parse(&row.applicable_categories) else {
            warn!(line, coupon_code = %code, "skipping coupon row with no usable categories");
            continue;
        };

        let discount_type = DiscountType::parse(&row.discount_type);
        if let DiscountType::Other(raw) = &discount_type {
            warn!(line, coupon_code = %code, discount_type = %raw, "unknown discount type; coupon will never produce savings");
        }

        coupons.push(Coupon {
            code,
            description: row.description.trim().to_string(),
            discount_type,
            discount_value,
            min_cart_value,
            categories,
            max_discount_amount,
            start_date,
            end_date,
            is_active: row.is_active.trim().eq_ignore_ascii_case("TRUE"),
        });
    }

    debug!(count = coupons.len(), "loaded coupon catalog");

    Ok(coupons)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    raw.trim().parse().ok()
}

fn parse_date(raw: &str) -> Option<Date> {
    raw.trim().parse().ok()
}
