//! Rendering of bill records as JSON, CSV or text.

use lumion_core::invoice::rules::format_brazilian_number;
use lumion_core::{Decimal, InvoiceFields, StoredInvoice};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// CSV column names, matching the JSON field names.
const FIELD_COLUMNS: [&str; 12] = [
    "clientNumber",
    "referenceMonth",
    "energiaEletricaKwh",
    "energiaEletricaValor",
    "energiaSCEEEKwh",
    "energiaSCEEValor",
    "energiaCompensadaKwh",
    "energiaCompensadaValor",
    "contribIlumPublica",
    "consumoEnergiaEletrica",
    "valorTotalSemGD",
    "economiaGD",
];

fn field_values(f: &InvoiceFields) -> Vec<String> {
    vec![
        f.client_number.clone(),
        f.reference_month.clone(),
        f.energia_eletrica_kwh.to_string(),
        f.energia_eletrica_valor.to_string(),
        f.energia_scee_kwh.to_string(),
        f.energia_scee_valor.to_string(),
        f.energia_compensada_kwh.to_string(),
        f.energia_compensada_valor.to_string(),
        f.contrib_ilum_publica.to_string(),
        f.consumo_energia_eletrica.to_string(),
        f.valor_total_sem_gd.to_string(),
        f.economia_gd.to_string(),
    ]
}

pub fn format_fields(fields: &InvoiceFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(FIELD_COLUMNS)?;
            wtr.write_record(field_values(fields))?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

pub fn format_records(records: &[StoredInvoice], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);

            let mut header = vec!["id"];
            header.extend(FIELD_COLUMNS);
            header.extend(["sourceName", "createdAt"]);
            wtr.write_record(&header)?;

            for record in records {
                let mut row = vec![record.id.to_string()];
                row.extend(field_values(&record.fields));
                row.push(record.source_name.clone().unwrap_or_default());
                row.push(record.created_at.to_rfc3339());
                wtr.write_record(&row)?;
            }

            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = format!(
                "{:>4}  {:<14} {:<12} {:>12} {:>16} {:>14}\n",
                "ID", "Client", "Month", "kWh", "Total w/o GD", "GD savings"
            );
            for record in records {
                let f = &record.fields;
                output.push_str(&format!(
                    "{:>4}  {:<14} {:<12} {:>12} {:>16} {:>14}\n",
                    record.id,
                    f.client_number,
                    f.reference_month,
                    format_brazilian_number(f.consumo_energia_eletrica),
                    money(f.valor_total_sem_gd),
                    money(f.economia_gd),
                ));
            }
            Ok(output)
        }
    }
}

pub fn money(value: Decimal) -> String {
    format!("R$ {}", format_brazilian_number(value))
}

fn format_text(f: &InvoiceFields) -> String {
    let mut output = String::new();

    output.push_str(&format!("Client: {}\n", f.client_number));
    output.push_str(&format!("Reference month: {}\n", f.reference_month));
    output.push('\n');

    output.push_str("Items:\n");
    let rows = [
        ("Electric energy", f.energia_eletrica_kwh, f.energia_eletrica_valor),
        ("SCEE energy", f.energia_scee_kwh, f.energia_scee_valor),
        ("Compensated energy GD I", f.energia_compensada_kwh, f.energia_compensada_valor),
    ];
    for (label, kwh, value) in rows {
        output.push_str(&format!(
            "  {:<26} {:>10} kWh  {:>14}\n",
            label,
            format_brazilian_number(kwh),
            money(value)
        ));
    }
    output.push_str(&format!(
        "  {:<26} {:>14}  {:>14}\n",
        "Public lighting",
        "",
        money(f.contrib_ilum_publica)
    ));
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!(
        "  Consumption:      {} kWh\n",
        format_brazilian_number(f.consumo_energia_eletrica)
    ));
    output.push_str(&format!("  Total without GD: {}\n", money(f.valor_total_sem_gd)));
    output.push_str(&format!("  GD savings:       {}\n", money(f.economia_gd)));

    output
}
