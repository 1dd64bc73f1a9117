//! List monitored targets

use crate::util;
use anyhow::Result;
use monitor::Settings;
use owo_colors::OwoColorize;

pub fn run(settings: &Settings) -> Result<()> {
    let history = util::open_history_or_exit(settings);

    let targets = history.list_targets()?;
    if targets.is_empty() {
        println!("{}", "No targets stored yet.".dimmed());
        return Ok(());
    }

    for target in targets {
        if target.groups.is_empty() {
            println!("{}  {}", target.name.cyan(), target.address);
        } else {
            println!(
                "{}  {}  [{}]",
                target.name.cyan(),
                target.address,
                target.groups.join(", ").dimmed()
            );
        }
    }

    Ok(())
}
