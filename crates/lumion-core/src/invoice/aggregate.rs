//! Derived totals of a bill.

use crate::models::invoice::InvoiceFields;

/// Fill in the three derived fields from the extracted ones.
///
/// Always applied, so a bill where nothing matched still comes out as a
/// complete all-zero record. Sums saturate at the `Decimal` bounds instead
/// of panicking.
pub fn compute_aggregates(mut fields: InvoiceFields) -> InvoiceFields {
    fields.consumo_energia_eletrica = fields.energia_eletrica_kwh.saturating_add(fields.energia_scee_kwh);
    fields.valor_total_sem_gd = fields
        .energia_eletrica_valor
        .saturating_add(fields.energia_scee_valor)
        .saturating_add(fields.contrib_ilum_publica);
    fields.economia_gd = fields.energia_compensada_valor.abs();
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_april_2024_example() {
        let fields = InvoiceFields {
            energia_eletrica_kwh: dec("50"),
            energia_scee_kwh: dec("476"),
            energia_eletrica_valor: dec("51.53"),
            energia_scee_valor: dec("242.21"),
            contrib_ilum_publica: dec("58.13"),
            energia_compensada_kwh: dec("476"),
            energia_compensada_valor: dec("-233.99"),
            ..InvoiceFields::default()
        };

        let fields = compute_aggregates(fields);

        assert_eq!(fields.consumo_energia_eletrica, dec("526"));
        assert_eq!(fields.valor_total_sem_gd, dec("351.87"));
        assert_eq!(fields.economia_gd, dec("233.99"));
        assert_eq!(fields.energia_compensada_kwh, dec("476"));
        assert!(fields.validate().is_empty());
    }

    #[test]
    fn test_all_zero_record_stays_defined() {
        let fields = compute_aggregates(InvoiceFields::default());
        assert!(fields.consumo_energia_eletrica.is_zero());
        assert!(fields.valor_total_sem_gd.is_zero());
        assert!(fields.economia_gd.is_zero());
    }

    #[test]
    fn test_recomputing_overwrites_stale_values() {
        let mut fields = InvoiceFields::default();
        fields.economia_gd = dec("999");
        fields.energia_compensada_valor = dec("-10.50");

        let fields = compute_aggregates(compute_aggregates(fields));
        assert_eq!(fields.economia_gd, dec("10.50"));
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let fields = InvoiceFields {
            energia_eletrica_kwh: Decimal::MAX,
            energia_scee_kwh: Decimal::MAX,
            energia_eletrica_valor: Decimal::MAX,
            contrib_ilum_publica: Decimal::MAX,
            ..InvoiceFields::default()
        };

        let fields = compute_aggregates(fields);
        assert_eq!(fields.consumo_energia_eletrica, Decimal::MAX);
        assert_eq!(fields.valor_total_sem_gd, Decimal::MAX);
    }
}
