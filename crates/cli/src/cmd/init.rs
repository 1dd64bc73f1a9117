//! Create the snapshot store

use anyhow::{Context, Result};
use journal::History;
use monitor::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    let history = History::open(&settings.storage_path).with_context(|| {
        format!(
            "cannot initialize snapshot store at {}",
            settings.storage_path.display()
        )
    })?;

    // A round-trip read proves the store is usable, not just present
    let targets = history.list_targets()?;

    println!(
        "Initialized snapshot store at {} ({} targets)",
        settings.storage_path.display(),
        targets.len()
    );
    Ok(())
}
