// src/config/validate.rs

use tracing::warn;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::{RenderwatchError, Result};
use crate::types::FrameRange;

impl TryFrom<RawJobFile> for JobFile {
    type Error = RenderwatchError;

    fn try_from(raw: RawJobFile) -> std::result::Result<Self, Self::Error> {
        let frame_range = validate_raw_job(&raw)?;
        Ok(JobFile::new_unchecked(raw.job, raw.gpu, raw.worker, frame_range))
    }
}

fn validate_raw_job(raw: &RawJobFile) -> Result<FrameRange> {
    let range = FrameRange::new(raw.job.start_frame, raw.job.end_frame)?;
    validate_job_section(raw)?;
    validate_worker_section(raw)?;
    warn_on_unreachable_devices(raw);
    Ok(range)
}

fn validate_job_section(raw: &RawJobFile) -> Result<()> {
    if raw.job.version == 0 {
        return Err(RenderwatchError::ConfigError(
            "[job].version must be >= 1 (got 0)".to_string(),
        ));
    }

    if raw.job.katana_file.trim().is_empty() {
        return Err(RenderwatchError::ConfigError(
            "[job].katana_file must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_worker_section(raw: &RawJobFile) -> Result<()> {
    if raw.worker.device_ceiling == 0 {
        return Err(RenderwatchError::ConfigError(
            "[worker].device_ceiling must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

/// Devices past the mask width are legal but can never reach Redshift.
fn warn_on_unreachable_devices(raw: &RawJobFile) {
    let ceiling = raw.worker.device_ceiling;

    let explicit = raw.gpu.select_devices.iter();
    let affinity = raw.worker.gpu_affinity.iter().flatten();

    for device in explicit.chain(affinity).filter(|d| **d >= ceiling) {
        warn!(
            device,
            ceiling, "configured GPU index is outside the device mask and will be ignored"
        );
    }
}
