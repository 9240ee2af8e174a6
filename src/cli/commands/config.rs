//! Config command implementation.

use std::path::PathBuf;

use crate::cli::ConfigCommands;
use crate::config::{JsonSettingsStore, Settings, SettingsStore};
use crate::error::{Error, Result};

const KEYS: &[&str] = &[
    "domain",
    "api-key",
    "target-page",
    "folders",
    "only-annotated",
    "logseq-endpoint",
    "logseq-token",
];

/// Execute a config subcommand.
pub fn execute(command: &ConfigCommands, config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = JsonSettingsStore::resolve(config_path.map(PathBuf::as_path))?;
    let settings = store.load()?;

    match command {
        ConfigCommands::Show => show(&settings, json),
        ConfigCommands::Get { key } => {
            println!("{}", get(&settings, key)?);
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let mut settings = settings;
            set(&mut settings, key, value)?;
            store.save(&settings)?;
            if !json {
                println!("Set {key}");
            }
            Ok(())
        }
    }
}

fn show(settings: &Settings, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(settings)?);
        return Ok(());
    }

    for key in KEYS {
        let value = get(settings, key)?;
        let shown = if matches!(*key, "api-key" | "logseq-token") && !value.is_empty() {
            "(set)".to_string()
        } else {
            value
        };
        println!("{key:15} = {shown}");
    }
    Ok(())
}

fn get(settings: &Settings, key: &str) -> Result<String> {
    Ok(match key {
        "domain" => settings.domain.clone(),
        "api-key" => settings.api_key.clone(),
        "target-page" => settings.target_page_name.clone(),
        "folders" => settings.sync_folders.clone(),
        "only-annotated" => settings.only_annotated.to_string(),
        "logseq-endpoint" => settings.logseq_endpoint.clone(),
        "logseq-token" => settings.logseq_token.clone(),
        _ => {
            return Err(Error::Config(format!(
                "Unknown config key '{key}' (known keys: {})",
                KEYS.join(", ")
            )));
        }
    })
}

fn set(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "domain" => settings.domain = value.to_string(),
        "api-key" => settings.api_key = value.to_string(),
        "target-page" => {
            if value.trim().is_empty() {
                return Err(Error::Config("target-page must not be empty".to_string()));
            }
            settings.target_page_name = value.to_string();
        }
        "folders" => settings.sync_folders = value.to_string(),
        "only-annotated" => {
            settings.only_annotated = value
                .parse()
                .map_err(|_| Error::Config(format!("only-annotated must be true or false, got '{value}'")))?;
        }
        "logseq-endpoint" => settings.logseq_endpoint = value.to_string(),
        "logseq-token" => settings.logseq_token = value.to_string(),
        _ => {
            return Err(Error::Config(format!(
                "Unknown config key '{key}' (known keys: {})",
                KEYS.join(", ")
            )));
        }
    }
    Ok(())
}
