//! Print stored route snapshots for a target

use crate::util;
use anyhow::Result;
use monitor::Settings;
use std::fmt::Write;
use trace::{RenderEntry, RenderMode};

pub fn run(settings: &Settings, name: &str, limit: Option<usize>, html: bool) -> Result<()> {
    let history = util::open_history_or_exit(settings);

    // An unknown target is a result, not an error
    if history.get_target(name)?.is_none() {
        println!("Target not found in database.");
        return Ok(());
    }

    let snapshots = history.recent_snapshots(name, limit)?;
    let eol = if html { "<br />\n" } else { "\n" };

    let mut out = String::new();
    let _ = write!(out, "Target has {} stored route snapshots.{eol}", snapshots.len());

    if snapshots.len() >= 2 {
        // Diff of the two most recent snapshots, changed hops highlighted
        let newer = &snapshots[0];
        let older = &snapshots[1];
        let changed = trace::diff(&older.raw, &newer.raw);
        let newer_ts = util::format_timestamp(newer.created_at_ms);
        let older_ts = util::format_timestamp(older.created_at_ms);
        let mode = if html {
            RenderMode::Markup { html_breaks: true }
        } else {
            RenderMode::Plain
        };

        out.push_str(&trace::render_diff(
            RenderEntry { raw: &newer.raw, recorded_at: &newer_ts },
            RenderEntry { raw: &older.raw, recorded_at: &older_ts },
            &changed,
            mode,
        ));

        for snapshot in &snapshots[2..] {
            let _ = write!(
                out,
                "Snapshot {} recorded at {}{eol}",
                snapshot.id,
                util::format_timestamp(snapshot.created_at_ms)
            );
        }
    } else if let Some(snapshot) = snapshots.first() {
        let _ = write!(
            out,
            "Route recorded at {}:{eol}",
            util::format_timestamp(snapshot.created_at_ms)
        );
        for line in snapshot.raw.lines() {
            out.push_str(line);
            out.push_str(eol);
        }
    }

    print!("{out}");
    Ok(())
}
