//! Receipt

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    pricing::LineItem,
    recommend::{CartEvaluation, Evaluation},
};

/// Errors that can occur while exporting a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The receipt could not be serialized or deserialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The export file could not be written.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Summary of the recommended coupon, with a null code when none qualified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedCoupon {
    /// Code of the recommended coupon, or `None` when nothing qualified.
    pub coupon_code: Option<String>,

    /// Savings of the recommendation; zero when there is none.
    pub savings: Decimal,

    /// Final total after the recommendation; the plain cart total when
    /// there is none.
    pub final_total: Decimal,
}

/// Per-coupon evaluation summary as exported.
///
/// The audit-trail reasons are intentionally omitted here; they are a CLI
/// concern, not part of the export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Coupon code.
    pub coupon_code: String,

    /// Whether the coupon was eligible.
    pub eligible: bool,

    /// Amount the coupon could discount against.
    pub applicable_amount: Decimal,

    /// Savings the coupon produced.
    pub savings: Decimal,

    /// Cart total minus savings.
    pub final_total: Decimal,
}

/// The exportable receipt document for one cart evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// When the receipt was generated.
    pub generated_at_utc: Timestamp,

    /// Cart total before any discount.
    pub cart_total: Decimal,

    /// Priced cart entries.
    pub items: Vec<LineItem>,

    /// The recommendation, if any.
    pub recommended_coupon: RecommendedCoupon,

    /// Every coupon's evaluation, in ranked order.
    pub evaluations: Vec<EvaluationSummary>,
}

impl Receipt {
    /// Build a receipt from a cart evaluation.
    ///
    /// The generation timestamp is passed in by the caller; the engine
    /// itself never reads the clock.
    #[must_use]
    pub fn build(evaluation: &CartEvaluation<'_>, generated_at: Timestamp) -> Self {
        let recommended_coupon = match evaluation.recommended() {
            Some(best) => RecommendedCoupon {
                coupon_code: Some(best.coupon.code.clone()),
                savings: best.savings,
                final_total: best.final_total,
            },
            None => RecommendedCoupon {
                coupon_code: None,
                savings: Decimal::ZERO,
                final_total: evaluation.breakdown.total,
            },
        };

        let evaluations = evaluation
            .evaluations
            .iter()
            .map(|entry| EvaluationSummary {
                coupon_code: entry.coupon.code.clone(),
                eligible: entry.eligible,
                applicable_amount: entry.applicable_amount,
                savings: entry.savings,
                final_total: entry.final_total,
            })
            .collect();

        Self {
            generated_at_utc: generated_at,
            cart_total: evaluation.breakdown.total,
            items: evaluation.breakdown.line_items.clone(),
            recommended_coupon,
            evaluations,
        }
    }

    /// Serialize the receipt as pretty-printed JSON into a writer.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Json`] on serialization failure.
    pub fn write_json(&self, out: impl io::Write) -> Result<(), ReceiptError> {
        serde_json::to_writer_pretty(out, self)?;
        Ok(())
    }

    /// Read a receipt back from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Json`] when the document does not parse.
    pub fn read_json(input: impl io::Read) -> Result<Self, ReceiptError> {
        Ok(serde_json::from_reader(input)?)
    }

    /// Write the receipt to `path` as JSON and return the written path.
    ///
    /// When `path` is an existing directory, a timestamped file name
    /// (`receipt_<UTC stamp>.json`) is created inside it.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] when serialization or the file write
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf, ReceiptError> {
        let path = path.as_ref();
        let path = if path.is_dir() {
            let stamp = self.generated_at_utc.strftime("%Y%m%dT%H%M%SZ");
            path.join(format!("receipt_{stamp}.json"))
        } else {
            path.to_path_buf()
        };

        let file = fs::File::create(&path)?;
        self.write_json(io::BufWriter::new(file))?;

        Ok(path)
    }
}

/// Render the ranked evaluations as a terminal table, at most `limit` rows.
#[must_use]
pub fn evaluations_table(evaluations: &[Evaluation<'_>], limit: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(["CODE", "ELIGIBLE", "SAVINGS", "FINAL TOTAL"]);

    for entry in evaluations.iter().take(limit) {
        builder.push_record([
            entry.coupon.code.clone(),
            if entry.eligible { "YES" } else { "NO" }.to_string(),
            format!("{:.2}", entry.savings),
            format!("{:.2}", entry.final_total),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..4), Alignment::right());

    table.to_string()
}
