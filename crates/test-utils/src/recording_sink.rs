use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use renderwatch::errors::Result;
use renderwatch::monitor::EventSink;
use renderwatch::types::RenderEvent;

/// A sink that records every emitted event in order.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// monitor owns another.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Only the `SetProgress` values, in emission order.
    pub fn progress(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RenderEvent::SetProgress(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Only the status messages, in emission order.
    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RenderEvent::SetStatusMessage(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(
        &mut self,
        event: RenderEvent,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let events = Arc::clone(&self.events);
        Box::pin(async move {
            events.lock().unwrap().push(event);
            Ok(())
        })
    }
}
