//! Run event models.
//!
//! Events are produced by the workflow engine while a run executes.
//! The controller distinguishes the terminal (`Stop`) and pause
//! (`InputRequired`) kinds from the informational kinds by tag, never
//! by payload shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The final output of a completed run.
///
/// A result is one logical record: usually a JSON object with one
/// entry per declared output field, but workflows may also return a
/// bare scalar (the generic single-`result` shape). `field` resolves a
/// named entry when the record is an object; callers fall back to
/// [`ResultRecord::whole`] when a name cannot be located.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct ResultRecord(Value);

impl ResultRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a named field. Returns `None` when the record is not an
    /// object or the name is absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(name))
    }

    /// The whole record, used as the fallback display value.
    pub fn whole(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ResultRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Events emitted by a workflow execution.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "inputRequired",
///   "payload": { "prompt": "Enter a number: " }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum RunEvent {
    /// Informational progress message.
    Info { data: Value },

    /// An error surfaced by the workflow. Rendered into the event log
    /// like any other event; does not end the run by itself.
    Error { data: Value },

    /// A workflow-defined event kind with an arbitrary payload.
    Custom { name: String, data: Value },

    /// The run is suspended until a human response is injected.
    InputRequired { prompt: String },

    /// Terminal event carrying the final result. The event stream
    /// ends after this.
    Stop { result: ResultRecord },
}

impl RunEvent {
    pub fn info(data: impl Into<Value>) -> Self {
        RunEvent::Info { data: data.into() }
    }

    pub fn error(data: impl Into<Value>) -> Self {
        RunEvent::Error { data: data.into() }
    }
}

/// One rendered event record in the dashboard's event log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventCard {
    /// Position of this event within the current run, starting at 0.
    pub seq: usize,

    /// Short kind label ("info", "error", or the custom event name).
    pub label: String,

    /// Rendered payload text.
    pub body: String,

    /// When the controller observed the event.
    pub at: DateTime<Utc>,
}

/// Who authored a chat transcript block.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChatRole {
    /// The user: a run trigger or a modal response.
    User,

    /// The workflow's final result for one run.
    Response,
}

/// One rendered block in the chat transcript.
///
/// The transcript is append-only and persists across pauses and
/// resumes within a session; it is never silently reset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatBlock {
    pub role: ChatRole,
    pub body: String,
    pub at: DateTime<Utc>,
}

impl ChatBlock {
    pub fn user(body: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            body: body.into(),
            at: Utc::now(),
        }
    }

    pub fn response(body: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Response,
            body: body.into(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_record_field_lookup() {
        let record = ResultRecord::new(json!({"summary": "ok", "count": 3}));
        assert_eq!(record.field("summary"), Some(&json!("ok")));
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn test_result_record_scalar_has_no_fields() {
        let record = ResultRecord::new(json!("4"));
        assert_eq!(record.field("result"), None);
        assert_eq!(record.whole(), &json!("4"));
    }

    #[test]
    fn test_run_event_tagged_serialization() {
        let event = RunEvent::InputRequired {
            prompt: "Enter a number: ".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "inputRequired");
        assert_eq!(json["payload"]["prompt"], "Enter a number: ");
    }

    #[test]
    fn test_stop_event_distinguished_by_tag() {
        // A Stop whose result looks like an Info payload must still
        // deserialize as Stop.
        let json = r#"{"type":"stop","payload":{"result":{"data":"x"}}}"#;
        let event: RunEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, RunEvent::Stop { .. }));
    }
}
