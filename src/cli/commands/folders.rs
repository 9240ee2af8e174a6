//! Folders command implementation.

use std::path::PathBuf;

use colored::Colorize;

use crate::config::{JsonSettingsStore, SettingsStore};
use crate::error::{Error, Result};
use crate::remote::{CuboxClient, RemoteApi};

/// List the folder catalogue of the configured Cubox account.
pub fn execute(config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = JsonSettingsStore::resolve(config_path.map(PathBuf::as_path))?;
    let settings = store.load()?;
    if !settings.is_configured() {
        return Err(Error::NotConfigured);
    }

    let remote = CuboxClient::new(&settings.domain, &settings.resolve_api_key())?;
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    let folders = rt.block_on(remote.list_folders())?;

    if json {
        println!("{}", serde_json::to_string(&folders)?);
        return Ok(());
    }

    if folders.is_empty() {
        println!("No folders.");
        return Ok(());
    }

    println!("{}", "Folders".cyan().bold());
    for folder in &folders {
        if folder.nested_name.is_empty() || folder.nested_name == folder.name {
            println!("  {}", folder.name);
        } else {
            println!("  {}", folder.nested_name);
        }
    }

    Ok(())
}
