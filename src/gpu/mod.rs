// src/gpu/mod.rs

//! GPU device selection for render tasks.
//!
//! - [`affinity`] resolves the device list from the task request and the
//!   worker's affinity restriction.
//! - [`mask`] encodes the result for the child process: a fixed-width
//!   bitmask for the environment and a selector for the argument list.

pub mod affinity;
pub mod mask;

pub use affinity::{GpuRequest, GpuResolution, join_devices, resolve};
pub use mask::{
    DEFAULT_DEVICE_CEILING, REDSHIFT_DEVICES_ENV, devices_beyond_ceiling, parse_mask, render_mask,
    selector_args,
};
