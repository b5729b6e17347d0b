//! Destinations for pipeline events.

use super::{EventKind, PipelineEvent};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, warn, Level};

/// Receives every event a run announces.
///
/// Sinks must not fail the run: delivery problems stay inside the sink.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one event.
    async fn emit(&self, event: PipelineEvent);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: PipelineEvent) {}
}

/// Writes events to `tracing`.
///
/// Routine events go out at the configured level; setbacks (degraded,
/// skipped or failed stages, aborted runs) always go out at `WARN`.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Logs routine events at `level`. `TRACE` is treated as `DEBUG`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Logs routine events at `DEBUG`.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: PipelineEvent) {
        let PipelineEvent {
            kind,
            pipeline_run_id,
            data,
        } = event;

        if kind.is_setback() {
            warn!(event = %kind, %pipeline_run_id, %data, "Pipeline event");
        } else if self.level >= Level::DEBUG {
            // More verbose levels compare greater.
            debug!(event = %kind, %pipeline_run_id, %data, "Pipeline event");
        } else {
            info!(event = %kind, %pipeline_run_id, %data, "Pipeline event");
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the collected events.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }

    /// Returns the kinds of the collected events, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }

    /// Returns the collected events of one kind.
    #[must_use]
    pub fn of_kind(&self, kind: EventKind) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: PipelineEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageStatus;
    use serde_json::json;
    use uuid::Uuid;

    fn event(kind: EventKind) -> PipelineEvent {
        PipelineEvent::new(kind, Uuid::new_v4(), json!({"stage": "assess_risk"}))
    }

    #[tokio::test]
    async fn test_logging_sink_accepts_every_kind() {
        for sink in [LoggingEventSink::default(), LoggingEventSink::debug()] {
            for kind in EventKind::ALL {
                sink.emit(event(kind)).await;
            }
        }
    }

    #[tokio::test]
    async fn test_collecting_sink_keeps_order() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(event(EventKind::StageStarted)).await;
        sink.emit(event(StageStatus::Degraded.into())).await;
        sink.emit(event(EventKind::StageStarted)).await;

        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.kinds(),
            vec![
                EventKind::StageStarted,
                EventKind::StageFinished(StageStatus::Degraded),
                EventKind::StageStarted,
            ]
        );
        assert_eq!(sink.of_kind(EventKind::StageStarted).len(), 2);
        assert!(sink.of_kind(EventKind::PipelineFailed).is_empty());
    }
}
