//! List command - show stored bills.

use clap::Args;
use console::style;

use lumion_core::{InvoiceFilter, InvoiceStore};

use super::output::{format_records, OutputFormat};
use super::{load_config, open_store};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only show bills of this client number
    #[arg(long)]
    client: Option<String>,

    /// Only show bills of this reference month (e.g. ABR/2024)
    #[arg(long)]
    month: Option<String>,

    /// Only show bills whose client number or month contains this text
    #[arg(long)]
    search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ListArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let mut records = match &args.client {
        Some(client) => store.find_by_client(client)?,
        None => store.list()?,
    };

    let filter = InvoiceFilter {
        client: args.client,
        month: args.month,
        search: args.search,
    };
    records.retain(|r| filter.matches(&r.fields));

    if records.is_empty() && matches!(args.format, OutputFormat::Text) {
        println!("{} No stored invoices.", style("ℹ").blue());
        return Ok(());
    }

    print!("{}", format_records(&records, args.format)?);
    if matches!(args.format, OutputFormat::Json) {
        println!();
    }

    Ok(())
}
