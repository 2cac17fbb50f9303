//! CPU affinity utilities.
//!
//! Pinning the engine threads to one core prevents the OS from migrating
//! them mid-run, which would show up as latency jitter in the report. The
//! pin is best effort: a failure is a warning, never a run abort.

use anyhow::Result;
use core_affinity::CoreId;

/// Pin the current thread to a specific CPU core.
pub fn pin_to_core(core: usize) -> Result<()> {
    let core_id = CoreId { id: core };

    if core_affinity::set_for_current(core_id) {
        tracing::info!("pinned thread to CPU core {}", core);
        Ok(())
    } else {
        anyhow::bail!("failed to pin thread to core {}", core)
    }
}

/// Number of cores visible to the process.
pub fn num_cores() -> usize {
    core_affinity::get_core_ids()
        .map(|ids| ids.len())
        .unwrap_or(1)
}
