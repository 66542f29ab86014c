// src/monitor/sink.rs

//! Pluggable event sink abstraction.
//!
//! The stream monitor talks to an `EventSink` instead of a raw mpsc sender,
//! so the supervisor side can be swapped out:
//!
//! - `ChannelSink` forwards events over an mpsc channel to a supervisor task.
//! - `ConsoleSink` prints one event per line on stdout (used by the CLI).
//! - Tests can record events in memory.

use std::future::Future;
use std::pin::Pin;

use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::errors::{Error, Result};
use crate::types::RenderEvent;

/// Receiver of monitor events.
pub trait EventSink: Send {
    fn emit(
        &mut self,
        event: RenderEvent,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Sink that forwards events over an mpsc channel.
pub struct ChannelSink {
    tx: mpsc::Sender<RenderEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<RenderEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(
        &mut self,
        event: RenderEvent,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.tx.send(event).await.map_err(Error::from)?;
            Ok(())
        })
    }
}

/// Sink that writes each event as a line on stdout.
pub struct ConsoleSink {
    out: tokio::io::Stdout,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleSink {
    fn emit(
        &mut self,
        event: RenderEvent,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let line = format!("{event}\n");
            self.out.write_all(line.as_bytes()).await?;
            self.out.flush().await?;
            Ok(())
        })
    }
}
