// src/monitor/stream.rs

//! Async shell around [`StdoutMonitor`].

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::Result;
use crate::monitor::core::{MonitorSummary, StdoutMonitor};
use crate::monitor::sink::{ChannelSink, EventSink};
use crate::types::RenderEvent;

/// Status sent before the first line is read.
pub const JOB_STARTED_STATUS: &str = "Running Katana Job...";

/// Status sent when the stream ends without a failure.
pub const JOB_COMPLETED_STATUS: &str = "Katana Job Completed";

/// Read `reader` line by line until EOF, feeding each line through `monitor`
/// and emitting every resulting event to `sink` before reading the next one.
///
/// Lines are decoded lossily so that stray non-UTF-8 bytes from a renderer
/// never stop monitoring. After a failure the stream is still drained (so the
/// child never blocks on a full pipe) but no further events are produced.
pub async fn monitor_stream<R, S>(
    reader: R,
    mut monitor: StdoutMonitor,
    sink: &mut S,
) -> Result<MonitorSummary>
where
    R: AsyncRead + Unpin,
    S: EventSink + ?Sized,
{
    sink.emit(RenderEvent::SetStatusMessage(JOB_STARTED_STATUS.to_string()))
        .await?;

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);

        for event in monitor.handle_line(line) {
            sink.emit(event).await?;
        }
    }

    let summary = monitor.summary();

    if summary.failure.is_none() {
        sink.emit(RenderEvent::SetStatusMessage(JOB_COMPLETED_STATUS.to_string()))
            .await?;
    }

    info!(
        lines_read = summary.lines_read,
        lines_matched = summary.lines_matched,
        lines_rejected = summary.lines_rejected,
        last_progress = summary.last_progress,
        failed = summary.failure.is_some(),
        "stdout monitor finished"
    );

    Ok(summary)
}

/// Spawn a background task monitoring `reader` and forwarding events over
/// `events_tx`.
///
/// This is the hook a supervisor uses for a child's stdout pipe.
pub fn spawn_stdout_monitor<R>(
    reader: R,
    monitor: StdoutMonitor,
    events_tx: mpsc::Sender<RenderEvent>,
) -> JoinHandle<Result<MonitorSummary>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut sink = ChannelSink::new(events_tx);
        let result = monitor_stream(reader, monitor, &mut sink).await;
        debug!("stdout monitor task ended");
        result
    })
}
