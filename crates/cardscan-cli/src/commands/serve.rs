//! Serve command - run the upload and listing HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use cardscan_core::api;

use super::{load_config, load_engine, open_store};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (overrides config)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Directory for uploaded images (overrides config)
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(database) = args.database {
        config.storage.database_path = database;
    }
    if let Some(upload_dir) = args.upload_dir {
        config.storage.upload_dir = upload_dir;
    }

    let engine = Arc::new(load_engine(&config)?);
    let store = Arc::new(open_store(&config)?);

    info!(
        "Starting cardscan API (OCR language {}, database {})",
        config.ocr.language,
        config.storage.database_path.display()
    );

    api::serve(config, engine, store).await?;
    Ok(())
}
