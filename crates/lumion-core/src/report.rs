//! Totals and per-month series over a set of bills.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::invoice::InvoiceFields;
use crate::models::month::ReferenceMonth;

/// Totals over a set of bills.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub invoice_count: usize,
    pub total_consumption_kwh: Decimal,
    /// Absolute value, the sign of the compensated kWh varies between bills.
    pub total_compensated_kwh: Decimal,
    pub total_value_without_gd: Decimal,
    pub total_gd_savings: Decimal,
}

impl Summary {
    pub fn from_invoices<'a>(invoices: impl IntoIterator<Item = &'a InvoiceFields>) -> Self {
        invoices.into_iter().fold(Self::default(), |mut acc, f| {
            acc.invoice_count += 1;
            acc.total_consumption_kwh = acc.total_consumption_kwh.saturating_add(f.consumo_energia_eletrica);
            acc.total_compensated_kwh = acc.total_compensated_kwh.saturating_add(f.energia_compensada_kwh.abs());
            acc.total_value_without_gd = acc.total_value_without_gd.saturating_add(f.valor_total_sem_gd);
            acc.total_gd_savings = acc.total_gd_savings.saturating_add(f.economia_gd);
            acc
        })
    }
}

/// Energy figures of one reference month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub consumption_kwh: Decimal,
    pub compensated_kwh: Decimal,
}

/// One client's bills in month order, plus their totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRow {
    pub client_number: String,
    pub invoices: Vec<InvoiceFields>,
    pub totals: Summary,
}

/// Chronological ordering of month strings; unparsable months sort last.
pub fn compare_months(a: &str, b: &str) -> Ordering {
    match (a.parse::<ReferenceMonth>(), b.parse::<ReferenceMonth>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Narrows a set of bills the way the invoice table does.
///
/// Every given criterion must hold: `client` is an exact client number,
/// `month` an exact reference month (case ignored), and `search` a
/// case-insensitive substring of either the client number or the month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceFilter {
    pub client: Option<String>,
    pub month: Option<String>,
    pub search: Option<String>,
}

impl InvoiceFilter {
    pub fn matches(&self, f: &InvoiceFields) -> bool {
        if self.client.as_deref().is_some_and(|c| f.client_number != c.trim()) {
            return false;
        }
        if self
            .month
            .as_deref()
            .is_some_and(|m| !f.reference_month.eq_ignore_ascii_case(m.trim()))
        {
            return false;
        }
        match self.search.as_deref().map(|s| s.trim().to_lowercase()) {
            Some(term) if !term.is_empty() => {
                f.client_number.to_lowercase().contains(&term)
                    || f.reference_month.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    pub fn apply<'a>(&self, invoices: &'a [InvoiceFields]) -> Vec<&'a InvoiceFields> {
        invoices.iter().filter(|f| self.matches(f)).collect()
    }
}

/// Consumption and compensated energy summed per month.
pub fn monthly_series<'a>(invoices: impl IntoIterator<Item = &'a InvoiceFields>) -> Vec<MonthlyPoint> {
    let mut by_month: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for f in invoices {
        let entry = by_month.entry(f.reference_month.as_str()).or_default();
        entry.0 = entry.0.saturating_add(f.consumo_energia_eletrica);
        entry.1 = entry.1.saturating_add(f.energia_compensada_kwh.abs());
    }

    let mut points: Vec<MonthlyPoint> = by_month
        .into_iter()
        .map(|(month, (consumption, compensated))| MonthlyPoint {
            month: month.to_string(),
            consumption_kwh: consumption,
            compensated_kwh: compensated,
        })
        .collect();
    points.sort_by(|a, b| compare_months(&a.month, &b.month));
    points
}

/// Bills grouped per client (ordered by client number).
pub fn client_table<'a>(invoices: impl IntoIterator<Item = &'a InvoiceFields>) -> Vec<ClientRow> {
    let mut by_client: BTreeMap<&str, Vec<InvoiceFields>> = BTreeMap::new();
    for f in invoices {
        by_client.entry(f.client_number.as_str()).or_default().push(f.clone());
    }

    by_client
        .into_iter()
        .map(|(client, mut bills)| {
            bills.sort_by(|a, b| compare_months(&a.reference_month, &b.reference_month));
            let totals = Summary::from_invoices(&bills);
            ClientRow {
                client_number: client.to_string(),
                invoices: bills,
                totals,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bill(client: &str, month: &str, consumption: i64, compensated: i64, savings: i64) -> InvoiceFields {
        InvoiceFields {
            client_number: client.to_string(),
            reference_month: month.to_string(),
            consumo_energia_eletrica: Decimal::from(consumption),
            energia_compensada_kwh: Decimal::from(compensated),
            valor_total_sem_gd: Decimal::new(consumption * 100, 2),
            economia_gd: Decimal::from(savings),
            ..InvoiceFields::default()
        }
    }

    fn sample() -> Vec<InvoiceFields> {
        vec![
            bill("222", "FEV/2024", 300, 250, 120),
            bill("111", "DEZ/2023", 526, 476, 233),
            bill("111", "JAN/2024", 400, 350, 180),
            bill("111", "Desconhecido", 10, 0, 0),
        ]
    }

    #[test]
    fn test_summary_totals() {
        let invoices = sample();
        let summary = Summary::from_invoices(&invoices);

        assert_eq!(summary.invoice_count, 4);
        assert_eq!(summary.total_consumption_kwh, Decimal::from(1236));
        assert_eq!(summary.total_compensated_kwh, Decimal::from(1076));
        assert_eq!(summary.total_gd_savings, Decimal::from(533));
    }

    #[test]
    fn test_compensated_kwh_uses_absolute_value() {
        let invoices = vec![bill("1", "JAN/2024", 0, -100, 0), bill("1", "FEV/2024", 0, 50, 0)];
        assert_eq!(Summary::from_invoices(&invoices).total_compensated_kwh, Decimal::from(150));
    }

    #[test]
    fn test_monthly_series_is_chronological() {
        let invoices = sample();
        let months: Vec<String> = monthly_series(&invoices).into_iter().map(|p| p.month).collect();
        assert_eq!(months, vec!["DEZ/2023", "JAN/2024", "FEV/2024", "Desconhecido"]);
    }

    #[test]
    fn test_monthly_series_sums_same_month() {
        let invoices = vec![bill("1", "MAR/2024", 100, 80, 0), bill("2", "MAR/2024", 50, 20, 0)];
        let series = monthly_series(&invoices);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].consumption_kwh, Decimal::from(150));
        assert_eq!(series[0].compensated_kwh, Decimal::from(100));
    }

    #[test]
    fn test_client_table() {
        let invoices = sample();
        let table = client_table(&invoices);

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].client_number, "111");
        let months: Vec<&str> = table[0].invoices.iter().map(|f| f.reference_month.as_str()).collect();
        assert_eq!(months, vec!["DEZ/2023", "JAN/2024", "Desconhecido"]);
        assert_eq!(table[0].totals.total_gd_savings, Decimal::from(413));
        assert_eq!(table[1].totals.invoice_count, 1);
    }

    #[test]
    fn test_filter_by_client() {
        let invoices = sample();
        let by_client = |c: &str| InvoiceFilter { client: Some(c.to_string()), ..InvoiceFilter::default() };

        assert_eq!(by_client("111").apply(&invoices).len(), 3);
        assert_eq!(InvoiceFilter::default().apply(&invoices).len(), 4);
        assert!(by_client("999").apply(&invoices).is_empty());
    }

    #[test]
    fn test_filter_by_month() {
        let invoices = sample();
        let filter = InvoiceFilter { month: Some("jan/2024".to_string()), ..InvoiceFilter::default() };

        let found = filter.apply(&invoices);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].client_number, "111");
        assert_eq!(found[0].reference_month, "JAN/2024");

        let partial = InvoiceFilter { month: Some("JAN".to_string()), ..InvoiceFilter::default() };
        assert!(partial.apply(&invoices).is_empty());
    }

    #[test]
    fn test_filter_by_search_term() {
        let invoices = sample();
        let search = |t: &str| InvoiceFilter { search: Some(t.to_string()), ..InvoiceFilter::default() };

        // Client numbers and months are both searched.
        assert_eq!(search("22").apply(&invoices).len(), 1);
        assert_eq!(search("2024").apply(&invoices).len(), 2);
        assert_eq!(search("desconhecido").apply(&invoices).len(), 1);
        assert_eq!(search("  ").apply(&invoices).len(), 4);
        assert!(search("xyz").apply(&invoices).is_empty());
    }

    #[test]
    fn test_filter_criteria_combine() {
        let invoices = sample();
        let filter = InvoiceFilter {
            client: Some("111".to_string()),
            month: None,
            search: Some("2024".to_string()),
        };
        let months: Vec<&str> = filter.apply(&invoices).into_iter().map(|f| f.reference_month.as_str()).collect();
        assert_eq!(months, vec!["JAN/2024"]);
    }

    #[test]
    fn test_summary_saturates() {
        let invoices = vec![
            InvoiceFields { economia_gd: Decimal::MAX, ..InvoiceFields::default() },
            InvoiceFields { economia_gd: Decimal::MAX, ..InvoiceFields::default() },
        ];
        assert_eq!(Summary::from_invoices(&invoices).total_gd_savings, Decimal::MAX);
    }

    #[test]
    fn test_empty_input() {
        let invoices: Vec<InvoiceFields> = Vec::new();
        assert_eq!(Summary::from_invoices(&invoices), Summary::default());
        assert!(monthly_series(&invoices).is_empty());
        assert!(client_table(&invoices).is_empty());
    }
}
