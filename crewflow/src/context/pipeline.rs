//! The write-once field store for one pipeline run.

use super::RunIdentity;
use crate::errors::DataConflictError;
use crate::events::{EventKind, EventSink, NoOpEventSink, PipelineEvent};
use std::sync::Arc;

/// Context key holding the parsed contract text.
pub const DOCUMENT_TEXT_KEY: &str = "parsed_document_text";
/// Context key holding the user's symptom description.
pub const SYMPTOM_DESCRIPTION_KEY: &str = "symptom_description";

/// Returns the first `limit` characters of `text`.
///
/// Counts Unicode scalar values, never splitting a character.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Ordered accumulation of the text fields produced during a run.
///
/// Fields are write-once: a stage may read anything recorded before it but
/// can never rewrite an earlier field.
pub struct PipelineContext {
    run_id: RunIdentity,
    fields: Vec<(String, String)>,
    event_sink: Arc<dyn EventSink>,
}

impl PipelineContext {
    /// Creates a new pipeline context.
    #[must_use]
    pub fn new(run_id: RunIdentity) -> Self {
        Self {
            run_id,
            fields: Vec::new(),
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Returns the run identity.
    #[must_use]
    pub fn run_id(&self) -> &RunIdentity {
        &self.run_id
    }

    /// Records a field.
    ///
    /// # Errors
    ///
    /// Returns `DataConflictError` if the key was already recorded.
    pub fn record(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DataConflictError> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(DataConflictError::new(key));
        }
        self.fields.push((key, value.into()));
        Ok(())
    }

    /// Gets a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Gets the first `limit` characters of a field.
    #[must_use]
    pub fn excerpt(&self, key: &str, limit: usize) -> Option<&str> {
        self.get(key).map(|v| truncate_chars(v, limit))
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Returns the recorded keys, in recording order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Returns the number of recorded fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Emits an event tagged with this run's ID.
    pub async fn emit(&self, kind: EventKind, data: serde_json::Value) {
        let event = PipelineEvent::new(kind, self.run_id.pipeline_run_id, data);
        self.event_sink.emit(event).await;
    }
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("run_id", &self.run_id)
            .field("keys", &self.keys())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;

    #[test]
    fn test_record_and_get() {
        let mut ctx = PipelineContext::new(RunIdentity::new());
        ctx.record(DOCUMENT_TEXT_KEY, "This Agreement...").unwrap();

        assert_eq!(ctx.get(DOCUMENT_TEXT_KEY), Some("This Agreement..."));
        assert!(ctx.contains_key(DOCUMENT_TEXT_KEY));
        assert!(!ctx.contains_key("risk_assessment"));
    }

    #[test]
    fn test_fields_are_write_once() {
        let mut ctx = PipelineContext::new(RunIdentity::new());
        ctx.record("risk_assessment", "first").unwrap();

        let err = ctx.record("risk_assessment", "second").unwrap_err();
        assert_eq!(err.key, "risk_assessment");
        assert_eq!(ctx.get("risk_assessment"), Some("first"));
    }

    #[test]
    fn test_keys_keep_recording_order() {
        let mut ctx = PipelineContext::new(RunIdentity::new());
        ctx.record("b", "2").unwrap();
        ctx.record("a", "1").unwrap();
        ctx.record("c", "3").unwrap();

        assert_eq!(ctx.keys(), vec!["b", "a", "c"]);
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn test_excerpt() {
        let mut ctx = PipelineContext::new(RunIdentity::new());
        ctx.record("text", "abcdef").unwrap();

        assert_eq!(ctx.excerpt("text", 3), Some("abc"));
        assert_eq!(ctx.excerpt("text", 100), Some("abcdef"));
        assert_eq!(ctx.excerpt("missing", 3), None);
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("§§§", 0), "");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[tokio::test]
    async fn test_emit_tags_run_id() {
        let sink = Arc::new(CollectingEventSink::new());
        let ctx = PipelineContext::new(RunIdentity::new()).with_event_sink(sink.clone());

        ctx.emit(EventKind::StageStarted, serde_json::json!({"stage": "assess_risk"}))
            .await;

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::StageStarted);
        assert_eq!(events[0].data["stage"], "assess_risk");
        assert_eq!(events[0].pipeline_run_id, ctx.run_id().pipeline_run_id);
    }
}
