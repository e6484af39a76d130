//! Rule table for electricity bill fields.
//!
//! Every extracted field is one row of [`FIELD_RULES`]: the field it fills,
//! a label-anchored pattern whose first capture group is the raw token, and
//! the kind of value the token holds. The parser runs all rows through the
//! same match-and-normalize loop.

pub mod numbers;
pub mod patterns;

pub use numbers::{
    apply_sign, format_brazilian_number, normalize, normalize_signed, parse_brazilian_number,
    parse_signed, MAX_INTEGER_DIGITS,
};

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::invoice::{Field, FieldValue, UNKNOWN};
use patterns::*;

/// How a captured token becomes a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Digit run kept as text (client number).
    Identifier,
    /// `MMM/YYYY`, upper-cased with inner spaces removed.
    Month,
    /// kWh count.
    Quantity,
    /// Monetary value.
    Amount,
    /// Monetary credit, always stored as a non-positive amount.
    Credit,
}

/// One row of the extraction table.
#[derive(Debug)]
pub struct FieldRule {
    pub field: Field,
    pub pattern: &'static Regex,
    pub kind: ValueKind,
}

/// A value found in the source text.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position of the raw token in source text.
    pub position: Option<(usize, usize)>,
    /// Raw token that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Result of running one rule against the text.
#[derive(Debug, Clone)]
pub enum RuleOutcome {
    /// The label matched and the token converted cleanly.
    Found(ExtractionMatch<FieldValue>),
    /// The label matched but the token did not parse; the field stays at zero.
    Malformed(String),
    /// The label is not in the text.
    Missing,
}

impl FieldRule {
    /// Raw token captured by this rule's pattern.
    pub fn capture<'t>(&self, text: &'t str) -> Option<regex::Match<'t>> {
        self.pattern.captures(text).and_then(|caps| caps.get(1))
    }

    /// Locate and convert this rule's value.
    pub fn apply(&self, text: &str) -> RuleOutcome {
        let Some(token) = self.capture(text) else {
            return RuleOutcome::Missing;
        };
        let raw = token.as_str();

        let value = match self.kind {
            ValueKind::Identifier => Some(FieldValue::Text(raw.to_string())),
            ValueKind::Month => Some(FieldValue::Text(
                raw.chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_uppercase(),
            )),
            ValueKind::Quantity | ValueKind::Amount => {
                parse_signed(raw, false).map(FieldValue::Number)
            }
            ValueKind::Credit => parse_signed(raw, true).map(FieldValue::Number),
        };

        match value {
            Some(value) => RuleOutcome::Found(
                ExtractionMatch::new(value, raw).with_position(token.start(), token.end()),
            ),
            None => RuleOutcome::Malformed(raw.to_string()),
        }
    }

    /// Value recorded for a token that matched but did not convert.
    pub fn fallback(&self, token: &str) -> FieldValue {
        match self.kind {
            ValueKind::Identifier | ValueKind::Month => FieldValue::Text(UNKNOWN.to_string()),
            ValueKind::Quantity | ValueKind::Amount => FieldValue::Number(normalize(Some(token))),
            ValueKind::Credit => FieldValue::Number(normalize_signed(Some(token), true)),
        }
    }
}

lazy_static! {
    /// The fixed label vocabulary, one rule per extracted field.
    pub static ref FIELD_RULES: Vec<FieldRule> = vec![
        FieldRule { field: Field::ClientNumber, pattern: &CLIENT_NUMBER, kind: ValueKind::Identifier },
        FieldRule { field: Field::ReferenceMonth, pattern: &REFERENCE_MONTH, kind: ValueKind::Month },
        FieldRule { field: Field::EnergiaEletricaKwh, pattern: &ENERGIA_ELETRICA_KWH, kind: ValueKind::Quantity },
        FieldRule { field: Field::EnergiaEletricaValor, pattern: &ENERGIA_ELETRICA_VALOR, kind: ValueKind::Amount },
        FieldRule { field: Field::EnergiaSceeKwh, pattern: &ENERGIA_SCEE_KWH, kind: ValueKind::Quantity },
        FieldRule { field: Field::EnergiaSceeValor, pattern: &ENERGIA_SCEE_VALOR, kind: ValueKind::Amount },
        FieldRule { field: Field::EnergiaCompensadaKwh, pattern: &ENERGIA_COMPENSADA_KWH, kind: ValueKind::Quantity },
        FieldRule { field: Field::EnergiaCompensadaValor, pattern: &ENERGIA_COMPENSADA_VALOR, kind: ValueKind::Credit },
        FieldRule { field: Field::ContribIlumPublica, pattern: &CONTRIB_ILUM_PUBLICA, kind: ValueKind::Amount },
    ];
}
