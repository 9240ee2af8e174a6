//! Reset command implementation.

use std::path::PathBuf;

use crate::config::{JsonSettingsStore, SettingsStore};
use crate::error::Result;
use crate::model::Cursor;

/// Clear the pagination cursor so the next sync re-scans from the beginning.
///
/// Re-scanning is safe: existing pages are matched by `cubox-id` and skipped
/// unless the remote copy is newer.
pub fn execute(config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = JsonSettingsStore::resolve(config_path.map(PathBuf::as_path))?;
    let mut settings = store.load()?;

    let was_synced = !settings.cursor.is_start();
    settings.cursor = Cursor::default();
    store.save(&settings)?;

    if json {
        println!("{}", serde_json::json!({ "reset": was_synced }));
    } else if was_synced {
        println!("Cursor reset; the next sync starts from the beginning.");
    } else {
        println!("Cursor was already at the beginning.");
    }

    Ok(())
}
