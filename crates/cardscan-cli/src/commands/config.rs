//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use cardscan_core::CardscanConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Include environment overrides
        #[arg(long)]
        effective: bool,
    },

    /// Initialize a new configuration file
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "server.port")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show { effective } => show_config(&path, effective),
        ConfigCommand::Init { force } => init_config(&path, force),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

fn read_config(path: &Path) -> anyhow::Result<CardscanConfig> {
    if path.exists() {
        Ok(CardscanConfig::from_file(path)?)
    } else {
        Ok(CardscanConfig::default())
    }
}

fn show_config(path: &Path, effective: bool) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }

    let mut config = read_config(path)?;
    if effective {
        config.apply_env();
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    CardscanConfig::default().save(path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        path.display()
    );
    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(read_config(path)?)?;
    let value = lookup_key(&json, key)?;

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = read_config(path)?;

    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    set_key(&mut json, key, parsed_value.clone())?;

    let config: CardscanConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );
    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'cardscan config init' to create a configuration file.");
    }

    Ok(())
}

fn lookup_key<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Replace an existing key; unknown keys are rejected.
fn set_key(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, key),
    };

    let mut current = json;
    if let Some(parent) = parent {
        for part in parent.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    let obj = current
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path"))?;
    if !obj.contains_key(last) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    obj.insert(last.to_string(), value);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_key() {
        let json = serde_json::to_value(CardscanConfig::default()).unwrap();

        assert_eq!(lookup_key(&json, "server.port").unwrap(), &json!(5000));
        assert_eq!(lookup_key(&json, "ocr.language").unwrap(), &json!("eng"));
        assert!(lookup_key(&json, "server.nope").is_err());
    }

    #[test]
    fn test_set_key() {
        let mut json = serde_json::to_value(CardscanConfig::default()).unwrap();

        set_key(&mut json, "listing.max_limit", json!(50)).unwrap();
        assert_eq!(json["listing"]["max_limit"], json!(50));

        assert!(set_key(&mut json, "listing.unknown", json!(1)).is_err());
        assert!(set_key(&mut json, "missing.port", json!(1)).is_err());
    }

    #[test]
    fn test_set_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardscan").join("config.json");

        set_config(&path, "server.port", "8080").unwrap();
        set_config(&path, "ocr.language", "deu").unwrap();

        let config = CardscanConfig::from_file(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ocr.language, "deu");
    }
}
