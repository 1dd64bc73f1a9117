//! Change-gated snapshot updates

use crate::config::TargetSpec;
use crate::probe::Prober;
use journal::{History, Target};
use tracing::{debug, error, info};

/// What one update attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// First snapshot ever stored for this target
    First,
    /// Route differs from the previous snapshot; a new one was appended
    Changed,
    /// Route identical to the previous snapshot; nothing stored
    Unchanged,
    /// Probe failed; nothing stored
    ProbeFailed,
    /// Storage failed; nothing stored
    StoreFailed,
}

/// Probe one target and store a snapshot only if the route changed.
///
/// Every failure is handled here: probe and storage errors are logged and
/// folded into the outcome so a scheduler can never be torn down by one
/// target's bad cycle.
pub async fn update_target(
    history: &History,
    prober: &dyn Prober,
    spec: &TargetSpec,
) -> UpdateOutcome {
    let target = match resolve_target(history, spec) {
        Ok(target) => target,
        Err(err) => {
            error!(target_name = %spec.name, "storage error resolving target: {err}");
            return UpdateOutcome::StoreFailed;
        }
    };

    let raw = match prober.run(&target.address).await {
        Ok(raw) => raw,
        Err(err) => {
            error!(target_name = %target.name, "cannot get traceroute: {err:#}");
            return UpdateOutcome::ProbeFailed;
        }
    };

    // Hold the target's write lock across read-compare-append so no other
    // writer of the same target can interleave. The probe is already done;
    // nothing awaits while the lock is held.
    let lock = history.write_lock(&target.name);
    let _guard = lock.lock();

    let stored = (|| -> journal::Result<UpdateOutcome> {
        match history.latest_snapshot(&target.name)? {
            None => {
                history.append_snapshot(&target.name, &raw)?;
                Ok(UpdateOutcome::First)
            }
            Some(previous) => {
                if trace::diff(&previous.raw, &raw).is_empty() {
                    Ok(UpdateOutcome::Unchanged)
                } else {
                    history.append_snapshot(&target.name, &raw)?;
                    Ok(UpdateOutcome::Changed)
                }
            }
        }
    })();

    match stored {
        Ok(UpdateOutcome::First) => {
            info!(target_name = %target.name, "stored first route snapshot");
            UpdateOutcome::First
        }
        Ok(UpdateOutcome::Changed) => {
            info!(target_name = %target.name, "route changed, stored new snapshot");
            UpdateOutcome::Changed
        }
        Ok(outcome) => {
            debug!(target_name = %target.name, "route identical to last snapshot, nothing to do");
            outcome
        }
        Err(err) => {
            error!(target_name = %target.name, "storage error: {err}");
            UpdateOutcome::StoreFailed
        }
    }
}

/// Fetch the target record, creating it on first reference
fn resolve_target(history: &History, spec: &TargetSpec) -> journal::Result<Target> {
    if let Some(target) = history.get_target(&spec.name)? {
        return Ok(target);
    }
    let target = history.create_target(&spec.name, &spec.address, &spec.groups)?;
    info!(target_name = %spec.name, "created new target");
    Ok(target)
}
