// tests/monitor_stream.rs
mod common;
use crate::common::{RecordingSink, assert_percent, init_tracing, with_timeout};

use std::error::Error;

use tokio::sync::mpsc;

use renderwatch::monitor::{
    JOB_COMPLETED_STATUS, JOB_STARTED_STATUS, StdoutMonitor, monitor_stream, spawn_stdout_monitor,
};
use renderwatch::types::{FrameRange, RenderEvent};

type TestResult = Result<(), Box<dyn Error>>;

const KATANA_ARNOLD_LOG: &str = "\
Katana 3.6v4 batch render
Starting frame 1
[kat] Starting render pass 1 of 1
50% done - 4 rays/pixel
[kat] Finished render pass 1 of 1
Frame 1 completed
Frame 2 completed
";

#[tokio::test]
async fn katana_log_produces_ordered_events() -> TestResult {
    init_tracing();
    let monitor = StdoutMonitor::katana(FrameRange::new(1, 2)?)?;
    let mut sink = RecordingSink::new();

    let summary = with_timeout(monitor_stream(
        KATANA_ARNOLD_LOG.as_bytes(),
        monitor,
        &mut sink,
    ))
    .await?;

    assert_eq!(
        sink.events(),
        vec![
            RenderEvent::SetStatusMessage(JOB_STARTED_STATUS.to_string()),
            RenderEvent::SetStatusMessage("1".to_string()),
            RenderEvent::SetStatusMessage("Arnold: Starting Render Pass 1 of 1".to_string()),
            RenderEvent::SetStatusMessage(
                "Arnold: Rendering Pass 1 of 1 : 50% done - 4 rays/pixel".to_string()
            ),
            RenderEvent::SetStatusMessage("Arnold: Finished Rendering Pass 1 of 1".to_string()),
            RenderEvent::SetProgress(50.0),
            RenderEvent::SetStatusMessage("completed".to_string()),
            RenderEvent::SetProgress(100.0),
            RenderEvent::SetStatusMessage("completed".to_string()),
            RenderEvent::SetStatusMessage(JOB_COMPLETED_STATUS.to_string()),
        ]
    );

    assert_eq!(summary.lines_read, 7);
    assert_eq!(summary.lines_matched, 6);
    assert_eq!(summary.lines_rejected, 0);
    assert_percent(summary.last_progress, 100.0);
    assert!(summary.failure.is_none());
    Ok(())
}

#[tokio::test]
async fn redshift_blocks_with_crlf_endings() -> TestResult {
    init_tracing();
    let log = "Block 1/4 (0,0) rendered by GPU 0 in 3ms\r\nBlock 4/4 (1,1) rendered by GPU 0 in 3ms\r\n";
    let monitor = StdoutMonitor::katana(FrameRange::single(0))?;
    let mut sink = RecordingSink::new();

    with_timeout(monitor_stream(log.as_bytes(), monitor, &mut sink)).await?;

    assert_eq!(sink.progress(), vec![25.0, 100.0]);
    Ok(())
}

#[tokio::test]
async fn error_line_stops_progress_and_skips_completion_status() -> TestResult {
    init_tracing();
    let log = "Frame 1 completed\nERROR   | Render failed: out of memory\nFrame 2 completed\n";
    let monitor = StdoutMonitor::katana(FrameRange::new(1, 2)?)?;
    let mut sink = RecordingSink::new();

    let summary = with_timeout(monitor_stream(log.as_bytes(), monitor, &mut sink)).await?;

    let events = sink.events();
    assert_eq!(
        events.last(),
        Some(&RenderEvent::FailRender(
            "ERROR   | Render failed: out of memory".to_string()
        ))
    );
    assert_eq!(sink.progress(), vec![50.0]);
    assert!(!sink.statuses().contains(&JOB_COMPLETED_STATUS.to_string()));
    assert_eq!(summary.lines_read, 2);
    assert_eq!(
        summary.failure.as_deref(),
        Some("ERROR   | Render failed: out of memory")
    );
    Ok(())
}

#[tokio::test]
async fn non_utf8_bytes_do_not_stop_monitoring() -> TestResult {
    init_tracing();
    let log: &[u8] = b"Frame 1 completed \xff\xfe\nFrame 2 completed\n";
    let monitor = StdoutMonitor::katana(FrameRange::new(1, 2)?)?;
    let mut sink = RecordingSink::new();

    with_timeout(monitor_stream(log, monitor, &mut sink)).await?;

    assert_eq!(sink.progress(), vec![50.0, 100.0]);
    Ok(())
}

#[tokio::test]
async fn rejected_lines_are_counted_and_skipped() -> TestResult {
    init_tracing();
    let log = "Block 3/0 (0,0) rendered by GPU 0\nBlock 1/2 (0,0) rendered by GPU 0\n";
    let monitor = StdoutMonitor::katana(FrameRange::single(5))?;
    let mut sink = RecordingSink::new();

    let summary = with_timeout(monitor_stream(log.as_bytes(), monitor, &mut sink)).await?;

    assert_eq!(sink.progress(), vec![50.0]);
    assert_eq!(summary.lines_rejected, 1);
    assert_eq!(summary.lines_matched, 2);
    Ok(())
}

#[tokio::test]
async fn spawned_monitor_forwards_events_over_channel() -> TestResult {
    init_tracing();
    let (tx, mut rx) = mpsc::channel::<RenderEvent>(64);
    let monitor = StdoutMonitor::katana(FrameRange::new(1, 4)?)?;

    let log: &'static [u8] = b"Frame 1 completed\nFrame 2 completed\n";
    let handle = spawn_stdout_monitor(log, monitor, tx);

    let summary = with_timeout(handle).await??;
    assert_percent(summary.last_progress, 50.0);

    let mut received = Vec::new();
    while let Some(event) = with_timeout(rx.recv()).await {
        received.push(event);
    }

    assert_eq!(
        received.first(),
        Some(&RenderEvent::SetStatusMessage(JOB_STARTED_STATUS.to_string()))
    );
    let progress: Vec<f64> = received
        .iter()
        .filter_map(|e| match e {
            RenderEvent::SetProgress(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![25.0, 50.0]);
    assert_eq!(
        received.last(),
        Some(&RenderEvent::SetStatusMessage(JOB_COMPLETED_STATUS.to_string()))
    );
    Ok(())
}
