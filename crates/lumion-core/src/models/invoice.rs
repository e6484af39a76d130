//! Electricity bill record extracted from a single document.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder stored in text fields whose label was not found.
pub const UNKNOWN: &str = "Desconhecido";

/// Fields read from an electricity bill plus the three derived totals.
///
/// The serialized names follow the schema consumed by the dashboard,
/// including the `energiaSCEEEKwh` spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFields {
    /// Client number ("Nº do Cliente").
    #[serde(rename = "clientNumber")]
    pub client_number: String,

    /// Reference month as `MMM/YYYY`, e.g. `ABR/2024`.
    #[serde(rename = "referenceMonth")]
    pub reference_month: String,

    /// Grid energy consumption in kWh.
    #[serde(rename = "energiaEletricaKwh")]
    pub energia_eletrica_kwh: Decimal,

    /// Grid energy charge.
    #[serde(rename = "energiaEletricaValor")]
    pub energia_eletrica_valor: Decimal,

    /// Energy billed under SCEE without ICMS, in kWh.
    #[serde(rename = "energiaSCEEEKwh")]
    pub energia_scee_kwh: Decimal,

    /// Charge for the SCEE energy.
    #[serde(rename = "energiaSCEEValor")]
    pub energia_scee_valor: Decimal,

    /// Energy offset by distributed generation credits, in kWh.
    #[serde(rename = "energiaCompensadaKwh")]
    pub energia_compensada_kwh: Decimal,

    /// Credit for the compensated energy. Never positive.
    #[serde(rename = "energiaCompensadaValor")]
    pub energia_compensada_valor: Decimal,

    /// Municipal public lighting contribution.
    #[serde(rename = "contribIlumPublica")]
    pub contrib_ilum_publica: Decimal,

    /// Grid plus SCEE consumption in kWh.
    #[serde(rename = "consumoEnergiaEletrica")]
    pub consumo_energia_eletrica: Decimal,

    /// Bill total before distributed generation credits.
    #[serde(rename = "valorTotalSemGD")]
    pub valor_total_sem_gd: Decimal,

    /// Savings from distributed generation.
    #[serde(rename = "economiaGD")]
    pub economia_gd: Decimal,
}

impl Default for InvoiceFields {
    /// The fallback record: unknown identifiers, every number zero.
    fn default() -> Self {
        Self {
            client_number: UNKNOWN.to_string(),
            reference_month: UNKNOWN.to_string(),
            energia_eletrica_kwh: Decimal::ZERO,
            energia_eletrica_valor: Decimal::ZERO,
            energia_scee_kwh: Decimal::ZERO,
            energia_scee_valor: Decimal::ZERO,
            energia_compensada_kwh: Decimal::ZERO,
            energia_compensada_valor: Decimal::ZERO,
            contrib_ilum_publica: Decimal::ZERO,
            consumo_energia_eletrica: Decimal::ZERO,
            valor_total_sem_gd: Decimal::ZERO,
            economia_gd: Decimal::ZERO,
        }
    }
}

impl InvoiceFields {
    /// Store an extracted value in the slot for `field`.
    ///
    /// Text values sent to a numeric field (and the reverse) are ignored.
    pub fn apply(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::ClientNumber, FieldValue::Text(s)) => self.client_number = s,
            (Field::ReferenceMonth, FieldValue::Text(s)) => self.reference_month = s,
            (field, FieldValue::Number(n)) => {
                if let Some(slot) = self.number_mut(field) {
                    *slot = n;
                }
            }
            _ => {}
        }
    }

    /// Read a numeric extracted field.
    pub fn number(&self, field: Field) -> Option<Decimal> {
        let value = match field {
            Field::EnergiaEletricaKwh => self.energia_eletrica_kwh,
            Field::EnergiaEletricaValor => self.energia_eletrica_valor,
            Field::EnergiaSceeKwh => self.energia_scee_kwh,
            Field::EnergiaSceeValor => self.energia_scee_valor,
            Field::EnergiaCompensadaKwh => self.energia_compensada_kwh,
            Field::EnergiaCompensadaValor => self.energia_compensada_valor,
            Field::ContribIlumPublica => self.contrib_ilum_publica,
            Field::ClientNumber | Field::ReferenceMonth => return None,
        };
        Some(value)
    }

    fn number_mut(&mut self, field: Field) -> Option<&mut Decimal> {
        match field {
            Field::EnergiaEletricaKwh => Some(&mut self.energia_eletrica_kwh),
            Field::EnergiaEletricaValor => Some(&mut self.energia_eletrica_valor),
            Field::EnergiaSceeKwh => Some(&mut self.energia_scee_kwh),
            Field::EnergiaSceeValor => Some(&mut self.energia_scee_valor),
            Field::EnergiaCompensadaKwh => Some(&mut self.energia_compensada_kwh),
            Field::EnergiaCompensadaValor => Some(&mut self.energia_compensada_valor),
            Field::ContribIlumPublica => Some(&mut self.contrib_ilum_publica),
            Field::ClientNumber | Field::ReferenceMonth => None,
        }
    }

    /// Whether the client number was recognized.
    pub fn has_client(&self) -> bool {
        self.client_number != UNKNOWN
    }

    /// Check the record invariants, returning a description of each violation.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for field in Field::ALL {
            if let Some(value) = self.number(field) {
                if field == Field::EnergiaCompensadaValor {
                    if value.is_sign_positive() && !value.is_zero() {
                        issues.push(format!("{} must not be positive: {}", field, value));
                    }
                } else if value.is_sign_negative() && !value.is_zero() {
                    issues.push(format!("{} must not be negative: {}", field, value));
                }
            }
        }

        if self.consumo_energia_eletrica != self.energia_eletrica_kwh.saturating_add(self.energia_scee_kwh) {
            issues.push("consumoEnergiaEletrica does not match its components".to_string());
        }
        let valor_total = self
            .energia_eletrica_valor
            .saturating_add(self.energia_scee_valor)
            .saturating_add(self.contrib_ilum_publica);
        if self.valor_total_sem_gd != valor_total {
            issues.push("valorTotalSemGD does not match its components".to_string());
        }
        if self.economia_gd != self.energia_compensada_valor.abs() {
            issues.push("economiaGD does not match energiaCompensadaValor".to_string());
        }

        issues
    }
}

/// Value produced by a single extraction rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
}

/// The extracted (non-derived) fields of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "clientNumber")]
    ClientNumber,
    #[serde(rename = "referenceMonth")]
    ReferenceMonth,
    #[serde(rename = "energiaEletricaKwh")]
    EnergiaEletricaKwh,
    #[serde(rename = "energiaEletricaValor")]
    EnergiaEletricaValor,
    #[serde(rename = "energiaSCEEEKwh")]
    EnergiaSceeKwh,
    #[serde(rename = "energiaSCEEValor")]
    EnergiaSceeValor,
    #[serde(rename = "energiaCompensadaKwh")]
    EnergiaCompensadaKwh,
    #[serde(rename = "energiaCompensadaValor")]
    EnergiaCompensadaValor,
    #[serde(rename = "contribIlumPublica")]
    ContribIlumPublica,
}

impl Field {
    /// Every extracted field, in record order.
    pub const ALL: [Field; 9] = [
        Field::ClientNumber,
        Field::ReferenceMonth,
        Field::EnergiaEletricaKwh,
        Field::EnergiaEletricaValor,
        Field::EnergiaSceeKwh,
        Field::EnergiaSceeValor,
        Field::EnergiaCompensadaKwh,
        Field::EnergiaCompensadaValor,
        Field::ContribIlumPublica,
    ];

    /// Name used in serialized records.
    pub fn name(&self) -> &'static str {
        match self {
            Field::ClientNumber => "clientNumber",
            Field::ReferenceMonth => "referenceMonth",
            Field::EnergiaEletricaKwh => "energiaEletricaKwh",
            Field::EnergiaEletricaValor => "energiaEletricaValor",
            Field::EnergiaSceeKwh => "energiaSCEEEKwh",
            Field::EnergiaSceeValor => "energiaSCEEValor",
            Field::EnergiaCompensadaKwh => "energiaCompensadaKwh",
            Field::EnergiaCompensadaValor => "energiaCompensadaValor",
            Field::ContribIlumPublica => "contribIlumPublica",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
