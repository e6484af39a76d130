//! Report command - totals and monthly energy figures over stored bills.

use clap::Args;
use serde_json::json;

use lumion_core::invoice::rules::format_brazilian_number;
use lumion_core::{client_table, monthly_series, InvoiceFields, InvoiceFilter, InvoiceStore, Summary};

use super::output::money;
use super::{load_config, open_store};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON output
    Json,
    /// Plain text tables
    Text,
}

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Only include bills of this client number
    #[arg(long)]
    client: Option<String>,

    /// Only include bills of this reference month (e.g. ABR/2024)
    #[arg(long)]
    month: Option<String>,

    /// Only include bills whose client number or month contains this text
    #[arg(long)]
    search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,
}

pub async fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let all: Vec<InvoiceFields> = store.list()?.into_iter().map(|r| r.fields).collect();
    let filter = InvoiceFilter {
        client: args.client,
        month: args.month,
        search: args.search,
    };
    let invoices = filter.apply(&all);

    let summary = Summary::from_invoices(invoices.iter().copied());
    let monthly = monthly_series(invoices.iter().copied());
    let clients = client_table(invoices.iter().copied());

    match args.format {
        ReportFormat::Json => {
            let report = json!({
                "summary": summary,
                "monthly": monthly,
                "clients": clients,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Text => {
            println!("Invoices:          {}", summary.invoice_count);
            println!("Consumption:       {} kWh", format_brazilian_number(summary.total_consumption_kwh));
            println!("Compensated:       {} kWh", format_brazilian_number(summary.total_compensated_kwh));
            println!("Total without GD:  {}", money(summary.total_value_without_gd));
            println!("GD savings:        {}", money(summary.total_gd_savings));

            if !monthly.is_empty() {
                println!();
                println!("{:<14} {:>16} {:>16}", "Month", "Consumption kWh", "Compensated kWh");
                for point in &monthly {
                    println!(
                        "{:<14} {:>16} {:>16}",
                        point.month,
                        format_brazilian_number(point.consumption_kwh),
                        format_brazilian_number(point.compensated_kwh)
                    );
                }
            }

            if !clients.is_empty() {
                println!();
                println!("{:<14} {:>8} {:>16} {:>14}", "Client", "Bills", "Total w/o GD", "GD savings");
                for row in &clients {
                    println!(
                        "{:<14} {:>8} {:>16} {:>14}",
                        row.client_number,
                        row.totals.invoice_count,
                        money(row.totals.total_value_without_gd),
                        money(row.totals.total_gd_savings)
                    );
                }
            }
        }
    }

    Ok(())
}
