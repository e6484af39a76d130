//! Bill field extraction module.

mod aggregate;
mod parser;
pub mod rules;

pub use aggregate::compute_aggregates;
pub use parser::{collapse_whitespace, ExtractionResult, InvoiceParser, RuleExtractor};

use crate::models::invoice::InvoiceFields;

/// Trait for bill field extractors.
///
/// Extraction is total: a label that is not found leaves its field at the
/// fallback value, it never produces an error.
pub trait FieldExtractor {
    /// Extract the bill fields (with derived totals) from plain text.
    fn extract(&self, text: &str) -> InvoiceFields;
}
