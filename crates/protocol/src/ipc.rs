//! Shell/controller communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between the dashboard shell (user interface) and the run controller
//! (core logic).
//!
//! The protocol follows an Operation/Update pattern:
//! - `Op`: triggers sent from the shell to the controller
//! - `Update`: state changes pushed from the controller to the shell
//!
//! Communication is channel-based. Updates are pushed incrementally
//! while a run is in flight, so the shell can render intermediate
//! events without waiting for the final result.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::{ChatBlock, EventCard};
use crate::widgets::DisplayValue;

/// A raw widget value snapshot, taken by the shell when the run
/// trigger fires.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Field name from the input schema.
    pub name: String,

    /// Uncoerced widget value; the empty string means the field was
    /// left blank.
    pub raw: String,
}

impl RawField {
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }
}

/// Operations sent from the shell to the run controller.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "modalSubmit",
///   "payload": { "text": "5" }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Start a new top-level run from the current input widget values.
    ///
    /// Ignored (not queued, not errored) unless the controller is idle.
    RunTriggered { raw_inputs: Vec<RawField> },

    /// Submit the modal response to a paused run.
    ///
    /// Ignored unless the controller is awaiting human input and the
    /// text is non-empty.
    ModalSubmit { text: String },

    /// Shut down the controller task.
    Shutdown,
}

/// A formatted output value for one declared output field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutputUpdate {
    /// Output field name.
    pub name: String,

    /// Display value, or `None` when the widget should show nothing.
    pub value: Option<DisplayValue>,
}

/// State updates pushed from the run controller to the shell.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Update {
    /// A new top-level run has started; the event log was reset.
    RunStarted {
        run_id: Uuid,
        /// User chat block recorded for the trigger.
        chat: ChatBlock,
    },

    /// One event was appended to the event log.
    ///
    /// Pushed once per event, before the next event is consumed.
    EventAppended { card: EventCard },

    /// The run paused for human input; the modal should open.
    AwaitingInput { prompt: String },

    /// The paused run resumed on its preserved execution state; the
    /// modal should close.
    Resumed {
        /// User chat block recorded for the modal response.
        chat: ChatBlock,
    },

    /// The run reached its terminal event.
    RunCompleted {
        /// One formatted value per declared output field, in schema
        /// order.
        outputs: Vec<OutputUpdate>,
        /// Response chat block for the final result.
        chat: ChatBlock,
    },

    /// The event stream closed without a terminal event; the
    /// controller returned to idle with no result.
    RunEnded,
}
