//! CLI application for electricity bill extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, export, list, process, report};

/// lumion - Extract energy and GD compensation figures from electricity bills
#[derive(Parser)]
#[command(name = "lumion")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single bill file
    Process(process::ProcessArgs),

    /// Process multiple bill files
    Batch(batch::BatchArgs),

    /// List stored bills
    List(list::ListArgs),

    /// Export the PDF of a stored bill
    Export(export::ExportArgs),

    /// Report totals over stored bills
    Report(report::ReportArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::List(args) => list::run(args, config_path).await,
        Commands::Export(args) => export::run(args, config_path).await,
        Commands::Report(args) => report::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
