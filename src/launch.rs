// src/launch.rs

//! Launch plan for a Katana batch render.
//!
//! Everything the supervisor needs to start the process, computed up front:
//! argument list, environment, GPU selection and startup directory. Nothing
//! here spawns a process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::JobFile;
use crate::errors::Result;
use crate::gpu::{
    self, GpuResolution, REDSHIFT_DEVICES_ENV, devices_beyond_ceiling, join_devices, render_mask,
    selector_args,
};
use crate::types::DeviceIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Katana command-line arguments.
    pub args: Vec<String>,
    /// Environment variables to set on the child process.
    pub env: BTreeMap<String, String>,
    /// Resolved GPU devices, in ascending order.
    pub devices: Vec<DeviceIndex>,
    /// Fixed-width device mask (also present in `env`).
    pub device_mask: String,
    /// `-gpu N` selector for renderers that take devices on the command line.
    pub gpu_args: Vec<String>,
    /// Directory to start the process in, when one can be determined.
    pub startup_dir: Option<PathBuf>,
    /// Advisory messages gathered while planning.
    pub warnings: Vec<String>,
}

/// Build the launch plan for `job`.
///
/// Fails with `RenderwatchError::GpuAffinity` when the worker cannot serve
/// any requested GPU.
pub fn build_plan(job: &JobFile, thread_index: Option<u32>) -> Result<LaunchPlan> {
    let request = job.gpu_request(thread_index);
    let GpuResolution {
        devices, warnings, ..
    } = gpu::resolve(&request).into_result()?;

    let ceiling = job.worker.device_ceiling;
    let mut warnings = warnings;

    let unreachable = devices_beyond_ceiling(&devices, ceiling);
    if !unreachable.is_empty() {
        warnings.push(format!(
            "devices {} are beyond the {ceiling}-device mask and will not be selected",
            join_devices(&unreachable)
        ));
    }

    for w in &warnings {
        warn!(thread_index = request.thread_index, "{}", w);
    }

    let device_mask = render_mask(&devices, ceiling);

    let mut env = BTreeMap::new();
    env.insert(REDSHIFT_DEVICES_ENV.to_string(), device_mask.clone());

    info!(
        version = job.job.version,
        frames = %job.frame_range(),
        devices = %join_devices(&devices),
        "planned Katana render"
    );

    Ok(LaunchPlan {
        args: render_args(job),
        env,
        gpu_args: selector_args(&devices),
        devices,
        device_mask,
        startup_dir: startup_dir(job),
        warnings,
    })
}

/// `--batch --katana-file=<file> -t <start>-<end> [--render-node=<node>]`
pub fn render_args(job: &JobFile) -> Vec<String> {
    let mut args = vec![
        "--batch".to_string(),
        format!("--katana-file={}", job.job.katana_file),
        "-t".to_string(),
        job.frame_range().to_string(),
    ];

    if let Some(node) = job.job.render_node.as_deref().filter(|n| !n.is_empty()) {
        args.push(format!("--render-node={node}"));
    }

    args
}

/// Configured working directory with host path separators, else the
/// directory containing the Katana executable.
pub fn startup_dir(job: &JobFile) -> Option<PathBuf> {
    let configured = job
        .job
        .working_directory
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    match configured {
        Some(dir) => Some(PathBuf::from(normalize_separators(dir))),
        None => job
            .job
            .executable
            .as_deref()
            .and_then(|exe| Path::new(exe).parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf),
    }
}

fn normalize_separators(dir: &str) -> String {
    if cfg!(windows) {
        dir.replace('/', "\\")
    } else {
        dir.replace('\\', "/")
    }
}
