#![allow(dead_code)]

use renderwatch::config::{GpuSection, JobFile, JobSection, RawJobFile, WorkerSection};

/// Builder for `JobFile` to simplify test setup.
pub struct JobFileBuilder {
    raw: RawJobFile,
}

impl JobFileBuilder {
    /// A job rendering `start..=end` of `/jobs/test.katana`.
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            raw: RawJobFile {
                job: JobSection {
                    start_frame: start,
                    end_frame: end,
                    version: 3,
                    katana_file: "/jobs/test.katana".to_string(),
                    render_node: None,
                    working_directory: None,
                    executable: None,
                },
                gpu: GpuSection::default(),
                worker: WorkerSection::default(),
            },
        }
    }

    pub fn katana_file(mut self, path: &str) -> Self {
        self.raw.job.katana_file = path.to_string();
        self
    }

    pub fn render_node(mut self, node: &str) -> Self {
        self.raw.job.render_node = Some(node.to_string());
        self
    }

    pub fn working_directory(mut self, dir: &str) -> Self {
        self.raw.job.working_directory = Some(dir.to_string());
        self
    }

    pub fn executable(mut self, exe: &str) -> Self {
        self.raw.job.executable = Some(exe.to_string());
        self
    }

    pub fn gpus_per_task(mut self, n: u32) -> Self {
        self.raw.gpu.gpus_per_task = n;
        self
    }

    pub fn select_devices(mut self, devices: &[u32]) -> Self {
        self.raw.gpu.select_devices = devices.to_vec();
        self
    }

    pub fn gpu_affinity(mut self, devices: &[u32]) -> Self {
        self.raw.worker.gpu_affinity = Some(devices.to_vec());
        self
    }

    pub fn thread_index(mut self, index: u32) -> Self {
        self.raw.worker.thread_index = index;
        self
    }

    pub fn device_ceiling(mut self, ceiling: u32) -> Self {
        self.raw.worker.device_ceiling = ceiling;
        self
    }

    pub fn raw(self) -> RawJobFile {
        self.raw
    }

    pub fn build(self) -> JobFile {
        JobFile::try_from(self.raw).expect("Failed to build valid job from builder")
    }
}
