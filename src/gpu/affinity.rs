// src/gpu/affinity.rs

//! Reconcile a task's GPU request with the worker's device affinity.

use std::collections::BTreeSet;

use crate::errors::{RenderwatchError, Result};
use crate::types::DeviceIndex;

/// GPU selection requested for one render task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpuRequest {
    /// Devices per task; `0` means unset.
    pub gpus_per_task: u32,
    /// Explicit device indices; only consulted when `gpus_per_task == 0`.
    pub select_devices: BTreeSet<DeviceIndex>,
    /// Devices the worker is restricted to, if it overrides its affinity.
    pub worker_affinity: Option<BTreeSet<DeviceIndex>>,
    /// Render thread slot of this task on the worker.
    pub thread_index: u32,
}

/// Outcome of [`resolve`].
///
/// `warnings` are advisory and meant for the caller's log. A `fatal` reason
/// means the task must not be launched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpuResolution {
    pub devices: Vec<DeviceIndex>,
    pub warnings: Vec<String>,
    pub fatal: Option<String>,
}

impl GpuResolution {
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    /// Turn a fatal resolution into `RenderwatchError::GpuAffinity`.
    pub fn into_result(self) -> Result<Self> {
        match self.fatal {
            Some(reason) => Err(RenderwatchError::GpuAffinity(reason)),
            None => Ok(self),
        }
    }
}

/// Resolve the GPU devices a task may use.
///
/// With a worker affinity set `A`:
/// - explicit devices `E` (and no per-task count) resolve to `E ∩ A`; devices
///   outside `A` are reported, and an empty intersection is fatal.
/// - a per-task count `n` larger than `|A|` resolves to all of `A` with a
///   warning; otherwise to the members of `A` whose index is below `n`.
/// - neither resolves to all of `A`.
///
/// Without affinity, explicit devices are used verbatim, a per-task count
/// selects the block `[thread * n, thread * n + n)`, and otherwise no device
/// is selected.
///
/// This function never logs; warnings are returned to the caller.
pub fn resolve(request: &GpuRequest) -> GpuResolution {
    let per_task = request.gpus_per_task;
    let explicit = &request.select_devices;

    match &request.worker_affinity {
        Some(affinity) => {
            if per_task == 0 && !explicit.is_empty() {
                resolve_explicit_with_affinity(explicit, affinity)
            } else if per_task > 0 {
                resolve_count_with_affinity(per_task, affinity)
            } else {
                GpuResolution {
                    devices: affinity.iter().copied().collect(),
                    ..GpuResolution::default()
                }
            }
        }
        None => {
            if per_task == 0 && !explicit.is_empty() {
                GpuResolution {
                    devices: explicit.iter().copied().collect(),
                    ..GpuResolution::default()
                }
            } else if per_task > 0 {
                resolve_thread_block(per_task, request.thread_index)
            } else {
                GpuResolution::default()
            }
        }
    }
}

fn resolve_explicit_with_affinity(
    explicit: &BTreeSet<DeviceIndex>,
    affinity: &BTreeSet<DeviceIndex>,
) -> GpuResolution {
    let (devices, missing): (Vec<DeviceIndex>, Vec<DeviceIndex>) =
        explicit.iter().copied().partition(|gpu| affinity.contains(gpu));

    let mut resolution = GpuResolution {
        devices,
        ..GpuResolution::default()
    };

    if !missing.is_empty() {
        resolution.warnings.push(format!(
            "worker GPU affinity excludes requested devices {}; they will not be used",
            join_devices(&missing)
        ));
    }

    if resolution.devices.is_empty() {
        resolution.fatal = Some(format!(
            "worker has no affinity for any requested device (requested {}, affinity {})",
            join_devices(&explicit.iter().copied().collect::<Vec<_>>()),
            join_devices(&affinity.iter().copied().collect::<Vec<_>>()),
        ));
    }

    resolution
}

fn resolve_count_with_affinity(per_task: u32, affinity: &BTreeSet<DeviceIndex>) -> GpuResolution {
    if per_task as usize > affinity.len() {
        return GpuResolution {
            devices: affinity.iter().copied().collect(),
            warnings: vec![format!(
                "worker GPU affinity only allows {} of the {} requested devices",
                affinity.len(),
                per_task
            )],
            fatal: None,
        };
    }

    // Filters by device index, not by position in the affinity set.
    GpuResolution {
        devices: affinity.iter().copied().filter(|gpu| *gpu < per_task).collect(),
        ..GpuResolution::default()
    }
}

fn resolve_thread_block(per_task: u32, thread_index: u32) -> GpuResolution {
    let Some(first) = thread_index.checked_mul(per_task) else {
        return overflowed(per_task, thread_index);
    };
    let Some(last) = first.checked_add(per_task) else {
        return overflowed(per_task, thread_index);
    };

    GpuResolution {
        devices: (first..last).collect(),
        ..GpuResolution::default()
    }
}

fn overflowed(per_task: u32, thread_index: u32) -> GpuResolution {
    GpuResolution {
        fatal: Some(format!(
            "device block for thread {thread_index} with {per_task} GPUs per task overflows the device index range"
        )),
        ..GpuResolution::default()
    }
}

/// Comma-separated device list, e.g. `"0,1,3"`.
pub fn join_devices(devices: &[DeviceIndex]) -> String {
    devices
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
