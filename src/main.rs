//! Clipper CLI
//!
//! Single-shot coupon recommendation: load the catalogs, price the cart,
//! rank every coupon for the given date, and print (optionally export)
//! the result.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use jiff::{Timestamp, civil::Date};
use tracing_subscriber::EnvFilter;

use clipper::{
    cart::Cart,
    loader::{load_coupons, load_products},
    receipt::{Receipt, evaluations_table},
    recommend::evaluate_coupons,
};

/// Recommend the best coupon for a shopping cart.
#[derive(Debug, Parser)]
#[command(
    name = "clipper",
    about = "Coupon evaluation and recommendation engine",
    after_help = "Example:\n  clipper --cart 'P001:2, P003:1' --date 2025-05-01 --export exports/"
)]
struct Cli {
    /// Path to the products CSV file.
    #[arg(long, default_value = "data/products.csv")]
    products: PathBuf,

    /// Path to the coupons CSV file.
    #[arg(long, default_value = "data/coupons.csv")]
    coupons: PathBuf,

    /// Cart contents as a comma-separated PRODUCT_ID:QTY list.
    #[arg(long)]
    cart: String,

    /// Evaluation date (YYYY-MM-DD). Coupon windows are inclusive.
    #[arg(long)]
    date: Date,

    /// Write a JSON receipt to this file, or into this directory with a
    /// timestamped name.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Maximum number of ranked coupons to show.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Print the recommended coupon's audit trail.
    #[arg(long)]
    reasons: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let catalog = load_products(&cli.products)
        .with_context(|| format!("loading products from {}", cli.products.display()))?;
    let coupons = load_coupons(&cli.coupons)
        .with_context(|| format!("loading coupons from {}", cli.coupons.display()))?;

    let cart = Cart::parse(&cli.cart).context("parsing cart input")?;
    if cart.is_empty() {
        anyhow::bail!("cart is empty; pass --cart 'P001:2, P003:1'");
    }

    let unknown: Vec<&str> = cart
        .iter()
        .filter(|&(id, _)| catalog.get(id).is_none())
        .map(|(id, _)| id)
        .collect();
    if !unknown.is_empty() {
        anyhow::bail!("unknown product ids: {}", unknown.join(", "));
    }

    let evaluated = evaluate_coupons(&coupons, &catalog, &cart, cli.date)?;

    println!("Cart total: {:.2}", evaluated.breakdown.total);
    println!("{}", evaluations_table(&evaluated.evaluations, cli.top));

    match evaluated.recommended() {
        Some(best) => {
            println!(
                "Recommended coupon: {} (saves {:.2}, final total {:.2})",
                best.coupon.code, best.savings, best.final_total
            );
            if cli.reasons {
                println!("\nReasons / checks:");
                for line in &best.reasons {
                    println!(" - {line}");
                }
            }
        }
        None => println!("No eligible coupon found for this cart."),
    }

    if let Some(path) = cli.export {
        let receipt = Receipt::build(&evaluated, Timestamp::now());
        let written = receipt.save(&path).context("exporting receipt")?;
        println!("Receipt written to {}", written.display());
    }

    Ok(())
}
