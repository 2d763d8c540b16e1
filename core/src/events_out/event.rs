use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EventsOutTx;

/// One JSON line in the events stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifecycleEvent {
    pub v: i32,
    #[serde(rename = "type")]
    pub event_type: String,
    pub ts: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl LifecycleEvent {
    pub fn new(event_type: &str) -> Self {
        Self {
            v: 1,
            event_type: event_type.to_string(),
            ts: chrono::Utc::now().to_rfc3339(),
            run_id: None,
            test: None,
            data: None,
        }
    }

    pub fn run_id(mut self, run_id: &str) -> Self {
        self.run_id = Some(run_id.to_string());
        self
    }

    pub fn test(mut self, test: &str) -> Self {
        self.test = Some(test.to_string());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

pub async fn write_event(out: Option<&EventsOutTx>, event: &LifecycleEvent) {
    let Some(out) = out else {
        return;
    };
    match serde_json::to_string(event) {
        Ok(line) => out.send_line(line).await,
        Err(e) => tracing::warn!(
            target: "regcheck.events_out",
            error = %e,
            event_type = %event.event_type,
            "failed to serialize event"
        ),
    }
}
