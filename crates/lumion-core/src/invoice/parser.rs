//! Rule-based electricity bill parser.

use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::models::invoice::{Field, InvoiceFields};

use super::aggregate::compute_aggregates;
use super::rules::{RuleOutcome, FIELD_RULES};
use super::FieldExtractor;

/// Result of bill extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields with derived totals filled in.
    pub fields: InvoiceFields,
    /// Whitespace-collapsed text the rules ran against (empty unless kept).
    pub raw_text: String,
    /// Fields whose label was not found.
    pub missing_fields: Vec<Field>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for bill parsing with diagnostics.
pub trait InvoiceParser {
    /// Parse a bill from text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Collapse every whitespace run (newlines included) into one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parser driven by the static field rule table.
pub struct RuleExtractor {
    /// Keep the normalized text in results.
    include_raw_text: bool,
    /// Log fallbacks as warnings rather than debug events.
    warn_on_missing: bool,
}

impl RuleExtractor {
    /// Create a new extractor with default settings.
    pub fn new() -> Self {
        Self {
            include_raw_text: false,
            warn_on_missing: false,
        }
    }

    /// Keep the normalized text in extraction results.
    pub fn with_raw_text(mut self, include: bool) -> Self {
        self.include_raw_text = include;
        self
    }

    /// Log missing fields at warn level.
    pub fn with_missing_warnings(mut self, warn: bool) -> Self {
        self.warn_on_missing = warn;
        self
    }
}

impl Default for RuleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for RuleExtractor {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let text = collapse_whitespace(text);

        info!("Parsing bill from {} characters of text", text.len());
        trace!("Normalized text: {}", text);

        let mut fields = InvoiceFields::default();
        let mut missing_fields = Vec::new();
        let mut warnings = Vec::new();

        for rule in FIELD_RULES.iter() {
            match rule.apply(&text) {
                RuleOutcome::Found(m) => {
                    trace!("{} <- {:?} at {:?}", rule.field, m.source, m.position);
                    fields.apply(rule.field, m.value);
                }
                RuleOutcome::Malformed(token) => {
                    warn!("Could not parse {} from {:?}, using 0", rule.field, token);
                    fields.apply(rule.field, rule.fallback(&token));
                    warnings.push(format!("Malformed value for {}: {}", rule.field, token));
                }
                RuleOutcome::Missing => {
                    if self.warn_on_missing {
                        warn!("No match for {}, using fallback", rule.field);
                    } else {
                        debug!("No match for {}, using fallback", rule.field);
                    }
                    missing_fields.push(rule.field);
                }
            }
        }

        let fields = compute_aggregates(fields);

        let issues = fields.validate();
        if !issues.is_empty() {
            warnings.extend(issues);
        }

        debug!(
            "Extracted bill for client {} ({}), {} of {} fields missing",
            fields.client_number,
            fields.reference_month,
            missing_fields.len(),
            FIELD_RULES.len()
        );

        ExtractionResult {
            fields,
            raw_text: if self.include_raw_text { text } else { String::new() },
            missing_fields,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl FieldExtractor for RuleExtractor {
    fn extract(&self, text: &str) -> InvoiceFields {
        self.parse(text).fields
    }
}
