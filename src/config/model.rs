// src/config/model.rs

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::gpu::{DEFAULT_DEVICE_CEILING, GpuRequest};
use crate::types::FrameRange;

/// Job description as read from a TOML file, before validation.
///
/// ```toml
/// [job]
/// start_frame = 1
/// end_frame = 10
/// katana_file = "/shots/sq010/lighting.katana"
/// render_node = "Render"
///
/// [gpu]
/// gpus_per_task = 2
///
/// [worker]
/// gpu_affinity = [0, 1, 2, 3]
/// thread_index = 0
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobFile {
    pub job: JobSection,

    #[serde(default)]
    pub gpu: GpuSection,

    #[serde(default)]
    pub worker: WorkerSection,
}

/// `[job]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSection {
    /// First frame of the task (inclusive).
    pub start_frame: i64,

    /// Last frame of the task (inclusive).
    pub end_frame: i64,

    /// Katana major version, used only for logging and executable lookup.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Katana project to render.
    pub katana_file: String,

    /// Render node to use; Katana picks its default when unset.
    #[serde(default)]
    pub render_node: Option<String>,

    /// Working directory for the render process.
    #[serde(default)]
    pub working_directory: Option<String>,

    /// Path of the Katana executable, if known ahead of launch.
    #[serde(default)]
    pub executable: Option<String>,
}

fn default_version() -> u32 {
    3
}

/// `[gpu]` section: what the task asks for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GpuSection {
    /// GPUs per task; `0` leaves selection to `select_devices`.
    #[serde(default)]
    pub gpus_per_task: u32,

    /// Explicit device indices.
    #[serde(default)]
    pub select_devices: Vec<u32>,
}

/// `[worker]` section: what the worker allows.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSection {
    /// Set when the worker overrides its GPU affinity.
    #[serde(default)]
    pub gpu_affinity: Option<Vec<u32>>,

    /// Render thread slot of this task.
    #[serde(default)]
    pub thread_index: u32,

    /// Width of the device bitmask handed to the renderer.
    #[serde(default = "default_device_ceiling")]
    pub device_ceiling: u32,
}

fn default_device_ceiling() -> u32 {
    DEFAULT_DEVICE_CEILING
}

impl Default for WorkerSection {
    fn default() -> Self {
        Self {
            gpu_affinity: None,
            thread_index: 0,
            device_ceiling: default_device_ceiling(),
        }
    }
}

/// Validated job description.
///
/// Only obtainable through `TryFrom<RawJobFile>` (see `validate.rs`), so the
/// frame range is always well-formed.
#[derive(Debug, Clone)]
pub struct JobFile {
    pub job: JobSection,
    pub gpu: GpuSection,
    pub worker: WorkerSection,
    frame_range: FrameRange,
}

impl JobFile {
    pub(crate) fn new_unchecked(
        job: JobSection,
        gpu: GpuSection,
        worker: WorkerSection,
        frame_range: FrameRange,
    ) -> Self {
        Self {
            job,
            gpu,
            worker,
            frame_range,
        }
    }

    pub fn frame_range(&self) -> FrameRange {
        self.frame_range
    }

    /// Build the GPU request for this task.
    ///
    /// `thread_index` overrides `[worker].thread_index` when given (the
    /// supervisor usually knows the slot only at launch time).
    pub fn gpu_request(&self, thread_index: Option<u32>) -> GpuRequest {
        GpuRequest {
            gpus_per_task: self.gpu.gpus_per_task,
            select_devices: self.gpu.select_devices.iter().copied().collect(),
            worker_affinity: self
                .worker
                .gpu_affinity
                .as_ref()
                .map(|a| a.iter().copied().collect::<BTreeSet<_>>()),
            thread_index: thread_index.unwrap_or(self.worker.thread_index),
        }
    }
}
