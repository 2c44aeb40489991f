//! Clipper
//!
//! Clipper evaluates a shopping cart against a catalog of discount coupons
//! and recommends the best applicable one: it prices the cart, runs every
//! coupon through date, activity, minimum-spend and category rules, then
//! ranks the results by savings.

pub mod cart;
pub mod catalog;
pub mod discounts;
pub mod eligibility;
pub mod loader;
pub mod money;
pub mod pricing;
pub mod receipt;
pub mod recommend;
