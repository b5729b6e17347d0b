//! Run identity for tracking pipeline executions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    /// The unique ID for this pipeline run.
    pub pipeline_run_id: Uuid,

    /// The request ID of the caller, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl RunIdentity {
    /// Creates a new run identity with a generated pipeline run ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipeline_run_id: Uuid::new_v4(),
            request_id: None,
        }
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunIdentity::new().pipeline_run_id, RunIdentity::new().pipeline_run_id);
    }

    #[test]
    fn test_request_id_skipped_when_absent() {
        let json = serde_json::to_value(RunIdentity::new()).unwrap();
        assert!(json.get("request_id").is_none());

        let request_id = Uuid::new_v4();
        let json = serde_json::to_value(RunIdentity::new().with_request_id(request_id)).unwrap();
        assert_eq!(json["request_id"], serde_json::json!(request_id));
    }
}
