//! Export command - write a stored bill's PDF back to disk.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use lumion_core::{InvoiceStore, ReferenceMonth};

use super::{load_config, open_store};

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Stored invoice id
    id: u64,

    /// Output file (default: fatura-<client>-<MMM-YYYY>.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Download name for a stored bill, e.g. `fatura-7204076116-ABR-2024.pdf`.
pub fn export_file_name(client_number: &str, reference_month: &str) -> String {
    let month = match reference_month.parse::<ReferenceMonth>() {
        Ok(month) => format!("{}-{}", month.abbreviation(), month.year),
        Err(_) => reference_month.replace('/', "-"),
    };
    format!("fatura-{}-{}.pdf", client_number, month)
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let record = store.get(args.id)?;
    let Some(pdf) = store.load_pdf(args.id)? else {
        anyhow::bail!("Invoice {} has no stored PDF", args.id);
    };

    let output_path = args.output.unwrap_or_else(|| {
        PathBuf::from(export_file_name(&record.fields.client_number, &record.fields.reference_month))
    });

    fs::write(&output_path, &pdf)?;
    info!("Exported {} bytes for invoice {}", pdf.len(), args.id);

    println!(
        "{} Exported invoice #{} to {}",
        style("✓").green(),
        args.id,
        output_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("7204076116", "ABR/2024"), "fatura-7204076116-ABR-2024.pdf");
        assert_eq!(export_file_name("1", "Desconhecido"), "fatura-1-Desconhecido.pdf");
    }
}
