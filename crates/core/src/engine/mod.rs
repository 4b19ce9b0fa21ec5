//! Workflow engine interface.
//!
//! The engine itself is an external collaborator: runboard only
//! consumes the contract defined here. A [`Workflow`] declares its
//! input/output field schemas and an async `run` body; [`start_run`]
//! spawns the body on a background task and hands back an
//! [`ExecutionHandle`] whose event stream the run controller consumes
//! sequentially.
//!
//! Pausing works through the context: when the workflow calls
//! [`WorkflowContext::require_input`], an `InputRequired` event is
//! emitted and the task suspends on the response channel. Injecting a
//! human response resumes the same task, so all step-local state
//! accumulated before the pause is preserved. No new execution is
//! ever created for a resume.

use async_trait::async_trait;
use rb_protocol::{FieldSchema, ResultRecord, RunEvent};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

/// Typed input map assembled from the coerced widget values.
///
/// Fields whose coercion produced `None` are omitted.
pub type InputMap = serde_json::Map<String, Value>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("workflow failed: {0}")]
    Failed(String),
    #[error("run aborted: channel closed")]
    Aborted,
}

/// An externally-defined asynchronous workflow.
///
/// The field schemas are declarative lists supplied by the workflow
/// author; no runtime type inspection happens anywhere. An empty
/// `stop_fields` list means the workflow uses the generic terminal
/// shape (a single untyped result).
#[async_trait]
pub trait Workflow: Send + Sync + 'static {
    /// Declared shape of the start-input record, in display order.
    fn start_fields(&self) -> Vec<FieldSchema>;

    /// Declared shape of the terminal-output record, in display order.
    fn stop_fields(&self) -> Vec<FieldSchema> {
        Vec::new()
    }

    /// Execute one run. Intermediate events go through `ctx`; the
    /// returned record becomes the terminal `Stop` event.
    async fn run(
        &self,
        ctx: WorkflowContext,
        input: InputMap,
    ) -> Result<ResultRecord, WorkflowError>;
}

/// Capabilities handed to a running workflow body.
pub struct WorkflowContext {
    events_tx: mpsc::Sender<RunEvent>,
    responses: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl WorkflowContext {
    /// Stream an event to the dashboard.
    pub async fn write_event(&self, event: RunEvent) {
        let _ = self.events_tx.send(event).await;
    }

    /// Stream an informational event.
    pub async fn info(&self, data: impl Into<Value>) {
        self.write_event(RunEvent::Info { data: data.into() }).await;
    }

    /// Stream an error event. The run keeps going; only the terminal
    /// event ends it.
    pub async fn error(&self, data: impl Into<Value>) {
        self.write_event(RunEvent::Error { data: data.into() }).await;
    }

    /// Stream a workflow-defined event.
    pub async fn custom(&self, name: impl Into<String>, data: impl Into<Value>) {
        self.write_event(RunEvent::Custom {
            name: name.into(),
            data: data.into(),
        })
        .await;
    }

    /// Pause the run until a human response is injected.
    ///
    /// Emits `InputRequired` and suspends the task on the response
    /// channel. Errors only when the controller side went away.
    pub async fn require_input(&self, prompt: &str) -> Result<String, WorkflowError> {
        self.write_event(RunEvent::InputRequired {
            prompt: prompt.to_string(),
        })
        .await;
        let mut responses = self.responses.lock().await;
        responses.recv().await.ok_or(WorkflowError::Aborted)
    }
}

/// Opaque resume capability for a suspended execution.
///
/// Cheap to clone; never exposed outside the run controller.
#[derive(Clone)]
pub struct ExecutionContext {
    response_tx: mpsc::UnboundedSender<String>,
}

impl ExecutionContext {
    /// Inject the user's modal response into the suspended execution.
    pub fn inject_human_response(&self, text: impl Into<String>) {
        let _ = self.response_tx.send(text.into());
    }
}

/// Resumable reference to one in-flight or paused run.
pub struct ExecutionHandle {
    run_id: Uuid,
    events_rx: mpsc::Receiver<RunEvent>,
    context: ExecutionContext,
}

impl ExecutionHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Pull the next event. Returns `None` once the stream closed;
    /// the stream terminates after `Stop`, or earlier if the workflow
    /// body failed.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events_rx.recv().await
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }
}

/// Start one workflow execution in the background.
///
/// The workflow body runs on its own tokio task. On success the driver
/// appends the terminal `Stop` event; on failure it appends an `Error`
/// event and closes the stream without `Stop`.
pub fn start_run(workflow: Arc<dyn Workflow>, input: InputMap) -> ExecutionHandle {
    let (events_tx, events_rx) = mpsc::channel(64);
    let (response_tx, response_rx) = mpsc::unbounded_channel();
    let run_id = Uuid::new_v4();

    let ctx = WorkflowContext {
        events_tx: events_tx.clone(),
        responses: Mutex::new(response_rx),
    };

    tokio::spawn(async move {
        match workflow.run(ctx, input).await {
            Ok(result) => {
                let _ = events_tx.send(RunEvent::Stop { result }).await;
            }
            Err(e) => {
                tracing::debug!(%run_id, error = %e, "workflow run failed");
                let _ = events_tx
                    .send(RunEvent::Error {
                        data: Value::String(e.to_string()),
                    })
                    .await;
            }
        }
    });

    ExecutionHandle {
        run_id,
        events_rx,
        context: ExecutionContext { response_tx },
    }
}
