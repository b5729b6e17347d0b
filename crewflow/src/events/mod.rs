//! Event sinks for pipeline observability.
//!
//! Pipelines announce their progress as [`PipelineEvent`]s through an
//! [`EventSink`] carried by the run's [`crate::context::PipelineContext`].
//! A document run announces `pipeline.started`, then `stage.started` and a
//! `stage.<status>` event per stage, then `pipeline.completed`. A symptom run
//! that hits a failed stage ends with `pipeline.failed` instead.

mod event;
mod sink;

pub use event::{EventKind, PipelineEvent};
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
