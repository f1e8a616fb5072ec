//! CLI application for business card OCR processing.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, cards, config, extract, process, serve};

/// Business card OCR - Extract contact details from business card images
#[derive(Parser)]
#[command(name = "cardscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a single card image
    Process(process::ProcessArgs),

    /// Scan multiple card images
    Batch(batch::BatchArgs),

    /// Extract contact fields from already recognized text
    Extract(extract::ExtractArgs),

    /// Run the HTTP upload and listing server
    Serve(serve::ServeArgs),

    /// List stored cards
    Cards(cards::CardsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let mut level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    if matches!(cli.command, Commands::Serve(_)) && level < Level::INFO {
        level = Level::INFO;
    }

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
        Commands::Extract(args) => extract::run(args).await,
        Commands::Serve(args) => serve::run(args, config_path).await,
        Commands::Cards(args) => cards::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
