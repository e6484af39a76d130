//! Regex patterns for electricity bill extraction.
//!
//! Patterns run against whitespace-collapsed text, so none of them need to
//! deal with line breaks. Each row pattern carries its own label, which makes
//! the rules independent of each other and of declaration order.

use lazy_static::lazy_static;
use regex::Regex;

/// "Energia Elétrica kWh" row label.
pub const ENERGIA_ELETRICA_LABEL: &str = r"Energia\s+El[ée]trica\s*kWh";

/// "Energia SCEE s/ ICMS kWh" row label (also "SCEEE", "s/ICMS").
pub const ENERGIA_SCEE_LABEL: &str = r"Energia\s+SCEEE?\s+s/\s*ICMS\s*kWh";

/// "Energia compensada GD I kWh" row label.
pub const ENERGIA_COMPENSADA_LABEL: &str = r"Energia\s+compensada\s+GD\s+I\s*kWh";

/// "Contrib Ilum Publica Municipal" row label.
pub const CONTRIB_ILUM_LABEL: &str = r"Contrib\.?\s+Ilum\.?\s+P[úu]blica\s+Municipal";

/// Optional colon between a label and its first value.
const LABEL_GAP: &str = r"\s*:?\s*";

/// Quantity cell: `476`, `1.234`, `12,5`.
pub const QUANTITY: &str = r"(\d+(?:\.\d{3})*(?:,\d+)?)(?:\s|$)";

/// Quantity cell followed by the fewest non-letter cells (unit tariffs) that
/// reach a value, so the first amount of the row wins.
const QUANTITY_THEN_CELLS: &str = r"\d+(?:\.\d{3})*(?:,\d+)?\s+(?:\PL*?\s)??";

/// Monetary cell: dotted thousands, exactly two decimals. A printed minus
/// is matched but left out of the capture, so charges come out non-negative.
/// The trailing non-digit keeps tariffs like `0,95999990` from matching.
pub const AMOUNT: &str = r"-?\s?(\d+(?:\.\d{3})*,\d{2})(?:\D|$)";

/// Credit cell: like [`AMOUNT`] but the minus stays in the capture.
pub const CREDIT_AMOUNT: &str = r"(-?\s?\d+(?:\.\d{3})*,\d{2})(?:\D|$)";

fn row_quantity(label: &str) -> Regex {
    Regex::new(&["(?i)", label, LABEL_GAP, QUANTITY].concat()).unwrap()
}

fn row_amount(label: &str, amount: &str) -> Regex {
    Regex::new(&["(?i)", label, LABEL_GAP, QUANTITY_THEN_CELLS, amount].concat()).unwrap()
}

lazy_static! {
    // Client number: "Número do Cliente" / "Nº do Cliente". The number may sit
    // after a neighbouring column header such as "Nº da Instalação".
    pub static ref CLIENT_NUMBER: Regex = Regex::new(
        r"(?i)(?:N[úu]mero|N\.?\s?[º°o]\.?)\s+do\s+Cliente\D{0,60}?(\d+)"
    ).unwrap();

    // Reference month: "Referente a ... ABR/2024"
    pub static ref REFERENCE_MONTH: Regex = Regex::new(
        r"(?i)Referente\s+a\b.{0,120}?\b((?:JAN|FEV|MAR|ABR|MAI|JUN|JUL|AGO|SET|OUT|NOV|DEZ)\s?/\s?\d{4})\b"
    ).unwrap();

    pub static ref ENERGIA_ELETRICA_KWH: Regex = row_quantity(ENERGIA_ELETRICA_LABEL);
    pub static ref ENERGIA_ELETRICA_VALOR: Regex = row_amount(ENERGIA_ELETRICA_LABEL, AMOUNT);

    pub static ref ENERGIA_SCEE_KWH: Regex = row_quantity(ENERGIA_SCEE_LABEL);
    pub static ref ENERGIA_SCEE_VALOR: Regex = row_amount(ENERGIA_SCEE_LABEL, AMOUNT);

    pub static ref ENERGIA_COMPENSADA_KWH: Regex = row_quantity(ENERGIA_COMPENSADA_LABEL);
    pub static ref ENERGIA_COMPENSADA_VALOR: Regex = row_amount(ENERGIA_COMPENSADA_LABEL, CREDIT_AMOUNT);

    pub static ref CONTRIB_ILUM_PUBLICA: Regex = Regex::new(
        &["(?i)", CONTRIB_ILUM_LABEL, LABEL_GAP, r"(?:R\$\s*)?", AMOUNT].concat()
    ).unwrap();
}
