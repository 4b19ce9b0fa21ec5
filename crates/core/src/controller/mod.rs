//! Run controller.
//!
//! Owns the lifecycle of at most one workflow run at a time and turns
//! its event stream into incremental dashboard updates. The controller
//! is strictly sequential: it pulls one event, applies it, pushes the
//! resulting update, then pulls the next. Concurrency lives in the
//! workflow task, never here.
//!
//! Lifecycle: `Idle` until a trigger starts a run, `Running` while the
//! event stream is live, `AwaitingHumanInput` while the execution sits
//! parked in the pending slot waiting for a modal response. A trigger
//! while busy and a blank modal submit are both silently ignored.

use crate::coerce::{self, value_to_text};
use crate::engine::{self, ExecutionHandle, InputMap, Workflow};
use crate::introspect;
use chrono::Utc;
use rb_protocol::{
    ChatBlock, EventCard, FieldSchema, Op, OutputUpdate, RawField, ResultRecord, RunEvent, Update,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Where the controller currently sits in the run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    AwaitingHumanInput,
}

/// Sequential driver for one workflow's runs.
pub struct RunController {
    workflow: Arc<dyn Workflow>,
    input_schema: Vec<FieldSchema>,
    output_schema: Vec<FieldSchema>,
    /// Live execution whose events are being pulled.
    running: Option<ExecutionHandle>,
    /// Paused execution parked until the modal response arrives.
    /// Single-owner: an execution is in exactly one slot at a time.
    pending: Option<ExecutionHandle>,
    event_log: Vec<EventCard>,
    updates_tx: mpsc::UnboundedSender<Update>,
}

impl RunController {
    /// Introspects the workflow's schemas once; they are fixed for the
    /// controller's lifetime.
    pub fn new(workflow: Arc<dyn Workflow>, updates_tx: mpsc::UnboundedSender<Update>) -> Self {
        let input_schema = introspect::input_fields(workflow.as_ref());
        let output_schema = introspect::output_fields(workflow.as_ref());
        Self {
            workflow,
            input_schema,
            output_schema,
            running: None,
            pending: None,
            event_log: Vec::new(),
            updates_tx,
        }
    }

    pub fn input_schema(&self) -> &[FieldSchema] {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &[FieldSchema] {
        &self.output_schema
    }

    pub fn phase(&self) -> Phase {
        if self.running.is_some() {
            Phase::Running
        } else if self.pending.is_some() {
            Phase::AwaitingHumanInput
        } else {
            Phase::Idle
        }
    }

    /// Start a run from raw widget values. Returns `false` (and does
    /// nothing) unless the controller is idle.
    pub fn trigger(&mut self, raw_inputs: &[RawField]) -> bool {
        if self.phase() != Phase::Idle {
            tracing::debug!(phase = ?self.phase(), "run trigger ignored while busy");
            return false;
        }

        self.event_log.clear();
        let input = self.assemble_input(raw_inputs);
        let chat = ChatBlock::user(describe_inputs(raw_inputs));

        let handle = engine::start_run(Arc::clone(&self.workflow), input);
        let run_id = handle.run_id();
        tracing::debug!(%run_id, "run started");

        self.running = Some(handle);
        self.push(Update::RunStarted { run_id, chat });
        true
    }

    /// Deliver the modal response to the paused execution. Returns
    /// `false` (and does nothing) for a blank submit or when no
    /// execution is waiting.
    pub fn submit(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            tracing::debug!("blank modal submit ignored");
            return false;
        }
        let Some(handle) = self.pending.take() else {
            tracing::debug!("modal submit ignored with no paused execution");
            return false;
        };

        handle.context().inject_human_response(text);
        self.running = Some(handle);
        self.push(Update::Resumed {
            chat: ChatBlock::user(text),
        });
        true
    }

    /// Pull and apply exactly one event from the live execution.
    /// No-op when nothing is running.
    pub async fn step(&mut self) {
        let Some(handle) = self.running.as_mut() else {
            return;
        };

        match handle.next_event().await {
            Some(RunEvent::InputRequired { prompt }) => {
                // Park the execution; it resumes on the next submit.
                self.pending = self.running.take();
                self.push(Update::AwaitingInput { prompt });
            }
            Some(RunEvent::Stop { result }) => {
                self.running = None;
                self.finish(result);
            }
            Some(event) => {
                let card = self.render_event_card(&event);
                self.event_log.push(card.clone());
                self.push(Update::EventAppended { card });
            }
            None => {
                // Stream closed without a terminal event: the workflow
                // body failed or was dropped.
                self.running = None;
                self.push(Update::RunEnded);
            }
        }
    }

    /// Drive the live execution until it stops, fails, or pauses for
    /// human input.
    pub async fn pump(&mut self) {
        while self.running.is_some() {
            self.step().await;
        }
    }

    /// Trigger then drive to quiescence. Convenience surface for
    /// embedders that do not run [`serve`](Self::serve).
    pub async fn on_run_triggered(&mut self, raw_inputs: &[RawField]) {
        if self.trigger(raw_inputs) {
            self.pump().await;
        }
    }

    /// Submit then drive to quiescence.
    pub async fn on_modal_submit(&mut self, text: &str) {
        if self.submit(text) {
            self.pump().await;
        }
    }

    /// Event loop: interleave run events with incoming ops. While a
    /// run is live, ops other than shutdown are dropped, not queued.
    pub async fn serve(mut self, mut ops_rx: mpsc::UnboundedReceiver<Op>) {
        loop {
            if self.running.is_some() {
                tokio::select! {
                    () = self.step() => {}
                    op = ops_rx.recv() => match op {
                        Some(Op::Shutdown) | None => break,
                        Some(op) => {
                            tracing::debug!(?op, "op dropped while running");
                        }
                    },
                }
            } else {
                match ops_rx.recv().await {
                    Some(Op::RunTriggered { raw_inputs }) => {
                        self.trigger(&raw_inputs);
                    }
                    Some(Op::ModalSubmit { text }) => {
                        self.submit(&text);
                    }
                    Some(Op::Shutdown) | None => break,
                }
            }
        }
        tracing::debug!("run controller shut down");
    }

    /// Coerce raw widget values against the input schema. Fields whose
    /// coercion yields nothing are left out of the record.
    fn assemble_input(&self, raw_inputs: &[RawField]) -> InputMap {
        let mut input = InputMap::new();
        for field in &self.input_schema {
            let raw = raw_inputs
                .iter()
                .find(|r| r.name == field.name)
                .map_or("", |r| r.raw.as_str());
            if let Some(value) = coerce::parse_input(raw, field.value_type) {
                input.insert(field.name.clone(), value);
            }
        }
        input
    }

    fn render_event_card(&self, event: &RunEvent) -> EventCard {
        let (label, body) = match event {
            RunEvent::Info { data } => ("info".to_string(), value_to_text(data)),
            RunEvent::Error { data } => ("error".to_string(), value_to_text(data)),
            RunEvent::Custom { name, data } => (name.clone(), value_to_text(data)),
            // Terminal and pause events never reach the log.
            RunEvent::InputRequired { prompt } => ("input".to_string(), prompt.clone()),
            RunEvent::Stop { result } => ("stop".to_string(), value_to_text(result.whole())),
        };
        EventCard {
            seq: self.event_log.len(),
            label,
            body,
            at: Utc::now(),
        }
    }

    /// Format the terminal record into per-widget output values and
    /// close out the run.
    fn finish(&mut self, result: ResultRecord) {
        let outputs = self
            .output_schema
            .iter()
            .map(|field| {
                // A result without the named field feeds the whole
                // record to the widget. This also covers the synthetic
                // single `result` field for untyped workflows.
                let value = result.field(&field.name).unwrap_or_else(|| result.whole());
                OutputUpdate {
                    name: field.name.clone(),
                    value: coerce::format_output(Some(value), field.value_type),
                }
            })
            .collect();

        let chat = ChatBlock::response(value_to_text(result.whole()));
        self.push(Update::RunCompleted { outputs, chat });
    }

    fn push(&mut self, update: Update) {
        let _ = self.updates_tx.send(update);
    }
}

fn describe_inputs(raw_inputs: &[RawField]) -> String {
    raw_inputs
        .iter()
        .filter(|field| !field.raw.is_empty())
        .map(|field| format!("{}: {}", field.name, field.raw))
        .collect::<Vec<_>>()
        .join("\n")
}
