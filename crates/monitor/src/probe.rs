//! The route-probe collaborator

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// Anything that can produce raw route-trace output for an address.
///
/// One call per update attempt; a failed probe yields no snapshot this
/// cycle and is never retried here.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn run(&self, address: &str) -> Result<String>;
}

/// Runs the platform route-tracing binary
pub struct SystemTraceroute;

#[cfg(windows)]
const TRACE_BINARY: &str = "tracert";
#[cfg(not(windows))]
const TRACE_BINARY: &str = "traceroute";

#[async_trait]
impl Prober for SystemTraceroute {
    async fn run(&self, address: &str) -> Result<String> {
        let output = Command::new(TRACE_BINARY)
            .arg(address)
            .output()
            .await
            .with_context(|| format!("failed to launch {TRACE_BINARY}"))?;

        if !output.status.success() {
            anyhow::bail!(
                "{TRACE_BINARY} {address} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            anyhow::bail!("{TRACE_BINARY} {address} produced no output");
        }

        Ok(text)
    }
}
