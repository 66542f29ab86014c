// src/gpu/mask.rs

//! Fixed-width device bitmask and command-line selector encoding.

use std::collections::BTreeSet;

use crate::errors::{RenderwatchError, Result};
use crate::types::DeviceIndex;

/// Device ceiling used by Redshift's CUDA device mask.
pub const DEFAULT_DEVICE_CEILING: u32 = 16;

/// Environment variable Redshift reads its CUDA device mask from.
pub const REDSHIFT_DEVICES_ENV: &str = "REDSHIFT_SELECTED_CUDA_DEVICES";

/// Render `devices` as a `'0'/'1'` string of length `ceiling`.
///
/// Position `i` is `'1'` when device `i` is selected. Devices at or beyond
/// the ceiling cannot be represented and are left out; use
/// [`devices_beyond_ceiling`] to report them.
pub fn render_mask(devices: &[DeviceIndex], ceiling: u32) -> String {
    (0..ceiling)
        .map(|index| if devices.contains(&index) { '1' } else { '0' })
        .collect()
}

/// Parse a mask produced by [`render_mask`] back into a device set.
pub fn parse_mask(mask: &str) -> Result<BTreeSet<DeviceIndex>> {
    let mut devices = BTreeSet::new();
    for (index, ch) in mask.chars().enumerate() {
        match ch {
            '1' => {
                let index = DeviceIndex::try_from(index).map_err(|_| {
                    RenderwatchError::InvalidDeviceMask {
                        mask: mask.to_string(),
                        reason: "mask is longer than the device index range".to_string(),
                    }
                })?;
                devices.insert(index);
            }
            '0' => {}
            other => {
                return Err(RenderwatchError::InvalidDeviceMask {
                    mask: mask.to_string(),
                    reason: format!("unexpected character '{other}' at position {index}"),
                });
            }
        }
    }
    Ok(devices)
}

/// Devices that do not fit in a mask of width `ceiling`.
pub fn devices_beyond_ceiling(devices: &[DeviceIndex], ceiling: u32) -> Vec<DeviceIndex> {
    devices.iter().copied().filter(|d| *d >= ceiling).collect()
}

/// Command-line device selector: `-gpu N` for each device.
pub fn selector_args(devices: &[DeviceIndex]) -> Vec<String> {
    devices
        .iter()
        .flat_map(|d| ["-gpu".to_string(), d.to_string()])
        .collect()
}
