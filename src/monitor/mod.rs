// src/monitor/mod.rs

//! Stdout monitoring for a running render process.
//!
//! The pure per-line state machine lives in [`core`]; [`stream`] is the
//! async shell that reads a process stream and forwards events to an
//! [`EventSink`] from [`sink`].

pub mod core;
pub mod sink;
pub mod stream;

pub use self::core::{MonitorSummary, StdoutMonitor};
pub use sink::{ChannelSink, ConsoleSink, EventSink};
pub use stream::{JOB_COMPLETED_STATUS, JOB_STARTED_STATUS, monitor_stream, spawn_stdout_monitor};
