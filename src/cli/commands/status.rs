//! Status command implementation.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::config::{JsonSettingsStore, SettingsStore};
use crate::error::Result;

#[derive(Serialize)]
struct StatusOutput {
    config_path: String,
    configured: bool,
    domain: String,
    target_page: String,
    folders: Vec<String>,
    only_annotated: bool,
    last_card_id: Option<String>,
    last_card_update_time: Option<String>,
    last_sync_time: Option<String>,
}

/// Execute status command.
pub fn execute(config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = JsonSettingsStore::resolve(config_path.map(PathBuf::as_path))?;
    let settings = store.load()?;

    let output = StatusOutput {
        config_path: store.path().display().to_string(),
        configured: settings.is_configured(),
        domain: settings.domain.clone(),
        target_page: settings.target_page_name.clone(),
        folders: settings.folder_names(),
        only_annotated: settings.only_annotated,
        last_card_id: settings.cursor.last_card_id.clone(),
        last_card_update_time: settings.cursor.last_card_update_time.clone(),
        last_sync_time: settings.last_sync_time.map(|t| t.to_rfc3339()),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Cubox Sync Status".cyan().bold());
    println!("  Config:  {}", output.config_path);
    if output.configured {
        println!("  Domain:  {}", output.domain);
    } else {
        println!("  {}", "Not configured (domain and API key required)".yellow());
    }
    println!("  Target page:    {}", output.target_page);
    if output.folders.is_empty() {
        println!("  Folders:        all");
    } else {
        println!("  Folders:        {}", output.folders.join(", "));
    }
    println!("  Only annotated: {}", output.only_annotated);
    println!();

    if let Some(id) = &output.last_card_id {
        println!("  Cursor at card: {id}");
        if let Some(time) = &output.last_card_update_time {
            println!("  Card updated:   {time}");
        }
        if let Some(time) = &output.last_sync_time {
            println!("  Last sync:      {time}");
        }
    } else {
        println!("  Never synced.");
    }

    Ok(())
}
