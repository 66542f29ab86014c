// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod failure;
pub mod gpu;
pub mod launch;
pub mod logging;
pub mod matcher;
pub mod monitor;
pub mod progress;
pub mod types;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::AsyncRead;
use tracing::{info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::{JobFile, load_and_validate};
use crate::errors::RenderwatchError;
use crate::gpu::{join_devices, render_mask, selector_args};
use crate::launch::build_plan;
use crate::monitor::{ConsoleSink, StdoutMonitor, monitor_stream};

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the job file, then runs the selected subcommand.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let job = load_and_validate(&config_path)
        .with_context(|| format!("loading job file {}", config_path.display()))?;

    match args.command {
        Command::Monitor { input } => run_monitor(&job, input).await,
        Command::Gpus { thread_index } => print_gpus(&job, thread_index),
        Command::Plan { thread_index } => print_plan(&job, thread_index),
    }
}

async fn run_monitor(job: &JobFile, input: Option<String>) -> Result<()> {
    let monitor = StdoutMonitor::katana(job.frame_range())?;
    info!(frames = %job.frame_range(), "monitoring renderer output");

    let reader: Box<dyn AsyncRead + Unpin + Send> = match input {
        Some(path) => Box::new(
            tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening renderer log {path}"))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let mut sink = ConsoleSink::new();
    let summary = monitor_stream(reader, monitor, &mut sink).await?;

    match summary.failure {
        Some(reason) => Err(RenderwatchError::RenderFailed(reason).into()),
        None => Ok(()),
    }
}

fn print_gpus(job: &JobFile, thread_index: Option<u32>) -> Result<()> {
    let resolution = gpu::resolve(&job.gpu_request(thread_index));
    for w in &resolution.warnings {
        warn!("{}", w);
    }
    let resolution = resolution.into_result()?;

    println!("devices: {}", join_devices(&resolution.devices));
    println!(
        "{}={}",
        gpu::REDSHIFT_DEVICES_ENV,
        render_mask(&resolution.devices, job.worker.device_ceiling)
    );
    println!("selector: {}", selector_args(&resolution.devices).join(" "));
    Ok(())
}

fn print_plan(job: &JobFile, thread_index: Option<u32>) -> Result<()> {
    let plan = build_plan(job, thread_index)?;

    println!("renderwatch plan");
    println!("  frames = {}", job.frame_range());
    println!("  katana version = {}", job.job.version);
    if let Some(ref exe) = job.job.executable {
        println!("  executable = {exe}");
    }
    println!("  args = {:?}", plan.args);
    for (key, value) in &plan.env {
        println!("  env {key}={value}");
    }
    println!("  devices = [{}]", join_devices(&plan.devices));
    if !plan.gpu_args.is_empty() {
        println!("  gpu selector = {}", plan.gpu_args.join(" "));
    }
    if let Some(ref dir) = plan.startup_dir {
        println!("  startup dir = {}", dir.display());
    }
    for w in &plan.warnings {
        println!("  warning: {w}");
    }
    Ok(())
}
