//! Dashboard application state and event loop.
//!
//! The app owns display state only. All run semantics live behind the
//! op channel in the run controller; the app mirrors controller
//! updates into its panes and snapshots raw widget values when the
//! run trigger fires.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;
use rb_core::widgets::{input_widget_for, output_widget_for};
use rb_protocol::{
    ChatBlock, DisplayValue, EventCard, FieldSchema, InputWidget, Op, OutputWidget, RawField,
    Update, WidgetSpec,
};
use tokio::select;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_stream::StreamExt;

use crate::theme::Theme;
use crate::tui::{ShellEvent, Tui};
use crate::widgets::{chat, event_log, form, modal, outputs};

/// One editable field in the input form.
pub struct InputField {
    pub schema: FieldSchema,
    pub spec: WidgetSpec<InputWidget>,
    /// Raw uncoerced text, snapshotted on trigger.
    pub value: String,
}

/// One output pane with its last formatted value.
pub struct OutputPane {
    pub schema: FieldSchema,
    pub spec: WidgetSpec<OutputWidget>,
    pub value: Option<DisplayValue>,
}

/// Display state of the human input modal.
pub struct ModalState {
    pub prompt: String,
    pub input: String,
}

pub struct App {
    pub theme: Theme,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<OutputPane>,
    pub event_log: Vec<EventCard>,
    pub chat: Vec<ChatBlock>,
    pub modal: Option<ModalState>,
    /// True from trigger until the run completes or ends; the run
    /// trigger stays disabled while set.
    pub busy: bool,
    pub focus: usize,
    pub should_exit: bool,
    op_tx: UnboundedSender<Op>,
    update_rx: UnboundedReceiver<Update>,
}

impl App {
    pub fn new(
        input_schema: &[FieldSchema],
        output_schema: &[FieldSchema],
        theme: Theme,
        op_tx: UnboundedSender<Op>,
        update_rx: UnboundedReceiver<Update>,
    ) -> Self {
        let inputs = input_schema
            .iter()
            .map(|field| {
                let spec = input_widget_for(&field.name, field.value_type);
                let value = initial_value(&spec.widget);
                InputField {
                    schema: field.clone(),
                    spec,
                    value,
                }
            })
            .collect();

        let outputs = output_schema
            .iter()
            .map(|field| OutputPane {
                schema: field.clone(),
                spec: output_widget_for(&field.name, field.value_type),
                value: None,
            })
            .collect();

        Self {
            theme,
            inputs,
            outputs,
            event_log: Vec::new(),
            chat: Vec::new(),
            modal: None,
            busy: false,
            focus: 0,
            should_exit: false,
            op_tx,
            update_rx,
        }
    }

    /// Main loop: interleave controller updates with terminal events.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut shell_events = tui.event_stream();

        tui.frame_requester().schedule_frame();

        while !self.should_exit {
            select! {
                Some(update) = self.update_rx.recv() => {
                    self.handle_update(update);
                    tui.frame_requester().schedule_frame();
                }
                Some(shell_event) = shell_events.next() => {
                    match shell_event {
                        ShellEvent::Key(key_event) => {
                            self.handle_key_event(key_event);
                            tui.frame_requester().schedule_frame();
                        }
                        ShellEvent::Paste(pasted) => {
                            self.handle_paste(&pasted);
                            tui.frame_requester().schedule_frame();
                        }
                        ShellEvent::Draw => {
                            tui.draw(|frame| self.render(frame))?;
                        }
                    }
                }
            }
        }

        let _ = self.op_tx.send(Op::Shutdown);
        Ok(())
    }

    /// Mirror one controller update into display state.
    pub fn handle_update(&mut self, update: Update) {
        match update {
            Update::RunStarted { run_id, chat } => {
                tracing::debug!(%run_id, "dashboard tracking new run");
                self.busy = true;
                self.event_log.clear();
                for pane in &mut self.outputs {
                    pane.value = None;
                }
                self.chat.push(chat);
            }
            Update::EventAppended { card } => {
                self.event_log.push(card);
            }
            Update::AwaitingInput { prompt } => {
                self.modal = Some(ModalState {
                    prompt,
                    input: String::new(),
                });
            }
            Update::Resumed { chat } => {
                self.modal = None;
                self.chat.push(chat);
            }
            Update::RunCompleted { outputs, chat } => {
                for output in outputs {
                    if let Some(pane) =
                        self.outputs.iter_mut().find(|p| p.schema.name == output.name)
                    {
                        pane.value = output.value;
                    }
                }
                self.chat.push(chat);
                self.busy = false;
                self.reset_inputs();
            }
            Update::RunEnded => {
                self.modal = None;
                self.busy = false;
                self.reset_inputs();
            }
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_exit = true;
            return;
        }

        if self.modal.is_some() {
            self.handle_modal_key(key_event.code);
            return;
        }

        match key_event.code {
            KeyCode::Esc => self.should_exit = true,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => self.trigger_run(),
            KeyCode::Char(' ') if self.focused_is_checkbox() => self.toggle_focused(),
            KeyCode::Char(c) => self.edit_focused(|value| value.push(c)),
            KeyCode::Backspace => self.edit_focused(|value| {
                value.pop();
            }),
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, pasted: &str) {
        if let Some(modal) = &mut self.modal {
            modal.input.push_str(pasted);
        } else {
            self.edit_focused(|value| value.push_str(pasted));
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        let Some(modal) = &mut self.modal else {
            return;
        };
        match code {
            KeyCode::Char(c) => modal.input.push(c),
            KeyCode::Backspace => {
                modal.input.pop();
            }
            KeyCode::Enter => {
                // Blank submits are dropped; the modal stays open.
                if !modal.input.trim().is_empty() {
                    let _ = self.op_tx.send(Op::ModalSubmit {
                        text: modal.input.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    /// Snapshot the form and fire the trigger. Disabled while busy.
    fn trigger_run(&mut self) {
        if self.busy {
            return;
        }
        let raw_inputs = self
            .inputs
            .iter()
            .map(|field| RawField::new(&field.schema.name, &field.value))
            .collect();
        let _ = self.op_tx.send(Op::RunTriggered { raw_inputs });
    }

    fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.inputs.len() - 1);
        }
    }

    fn focused_is_checkbox(&self) -> bool {
        self.inputs
            .get(self.focus)
            .is_some_and(|field| matches!(field.spec.widget, InputWidget::Checkbox { .. }))
    }

    fn toggle_focused(&mut self) {
        if let Some(field) = self.inputs.get_mut(self.focus) {
            if field.value.is_empty() {
                field.value = "true".to_string();
            } else {
                field.value.clear();
            }
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        if let Some(field) = self.inputs.get_mut(self.focus) {
            edit(&mut field.value);
        }
    }

    /// The form clears once a run is over, ready for the next trigger.
    fn reset_inputs(&mut self) {
        for field in &mut self.inputs {
            field.value = initial_value(&field.spec.widget);
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        form::render_form(frame, left[0], &self.inputs, self.focus, self.busy, &self.theme);
        chat::render_chat(frame, left[1], &self.chat, &self.theme);
        outputs::render_outputs(frame, right[0], &self.outputs, &self.theme);
        event_log::render_event_log(frame, right[1], &self.event_log, &self.theme);

        if let Some(modal) = &self.modal {
            modal::render_modal(frame, area, modal, &self.theme);
        }
    }
}

/// Initial raw text for a freshly built input widget.
fn initial_value(widget: &InputWidget) -> String {
    match widget {
        InputWidget::DatePicker { default } => default.format("%Y-%m-%d").to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use rb_protocol::{OutputUpdate, TypeTag};
    use serde_json::json;
    use tokio::sync::mpsc::unbounded_channel;
    use uuid::Uuid;

    fn test_app() -> (App, UnboundedReceiver<Op>) {
        let (op_tx, op_rx) = unbounded_channel();
        let (_update_tx, update_rx) = unbounded_channel();
        let app = App::new(
            &[
                FieldSchema::new("query", TypeTag::String),
                FieldSchema::new("verbose", TypeTag::Boolean),
            ],
            &[FieldSchema::new("result", TypeTag::String)],
            crate::theme::DEFAULT,
            op_tx,
            update_rx,
        );
        (app, op_rx)
    }

    fn buffer_text(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_all_panes() {
        let (app, _op_rx) = test_app();
        let text = buffer_text(&app);
        assert!(text.contains("Inputs"));
        assert!(text.contains("query"));
        assert!(text.contains("Chat"));
        assert!(text.contains("result"));
        assert!(text.contains("Events"));
    }

    #[test]
    fn test_typing_edits_the_focused_field() {
        let (mut app, _op_rx) = test_app();
        app.handle_key_event(KeyEvent::from(KeyCode::Char('h')));
        app.handle_key_event(KeyEvent::from(KeyCode::Char('i')));
        assert_eq!(app.inputs[0].value, "hi");

        app.handle_key_event(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(app.inputs[0].value, "h");
    }

    #[test]
    fn test_space_toggles_a_checkbox() {
        let (mut app, _op_rx) = test_app();
        app.handle_key_event(KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.focus, 1);

        app.handle_key_event(KeyEvent::from(KeyCode::Char(' ')));
        assert_eq!(app.inputs[1].value, "true");

        app.handle_key_event(KeyEvent::from(KeyCode::Char(' ')));
        assert_eq!(app.inputs[1].value, "");
    }

    #[test]
    fn test_enter_triggers_a_run_with_the_snapshot() {
        let (mut app, mut op_rx) = test_app();
        app.handle_key_event(KeyEvent::from(KeyCode::Char('2')));
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));

        let op = op_rx.try_recv().expect("trigger op sent");
        match op {
            Op::RunTriggered { raw_inputs } => {
                assert_eq!(raw_inputs[0], RawField::new("query", "2"));
                assert_eq!(raw_inputs[1], RawField::new("verbose", ""));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_trigger_is_disabled_while_busy() {
        let (mut app, mut op_rx) = test_app();
        app.handle_update(Update::RunStarted {
            run_id: Uuid::new_v4(),
            chat: ChatBlock::user("query: 2"),
        });
        assert!(app.busy);

        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert!(op_rx.try_recv().is_err());
    }

    #[test]
    fn test_form_clears_after_the_run_finishes() {
        let (mut app, _op_rx) = test_app();
        app.handle_key_event(KeyEvent::from(KeyCode::Char('2')));
        app.handle_key_event(KeyEvent::from(KeyCode::Tab));
        app.handle_key_event(KeyEvent::from(KeyCode::Char(' ')));
        assert_eq!(app.inputs[0].value, "2");
        assert_eq!(app.inputs[1].value, "true");

        app.handle_update(Update::RunCompleted {
            outputs: Vec::new(),
            chat: ChatBlock::response("4"),
        });
        assert_eq!(app.inputs[0].value, "");
        assert_eq!(app.inputs[1].value, "");

        // A run that ends without a result clears the form too.
        app.inputs[0].value = "stale".to_string();
        app.handle_update(Update::RunEnded);
        assert_eq!(app.inputs[0].value, "");
    }

    #[test]
    fn test_date_field_resets_to_its_default() {
        let (op_tx, _op_rx) = unbounded_channel();
        let (_update_tx, update_rx) = unbounded_channel();
        let mut app = App::new(
            &[FieldSchema::new("when", TypeTag::Date)],
            &[],
            crate::theme::DEFAULT,
            op_tx,
            update_rx,
        );
        let default = app.inputs[0].value.clone();
        assert!(!default.is_empty());

        app.inputs[0].value = "1999-01-01".to_string();
        app.handle_update(Update::RunCompleted {
            outputs: Vec::new(),
            chat: ChatBlock::response("done"),
        });
        assert_eq!(app.inputs[0].value, default);
    }

    #[test]
    fn test_updates_drive_modal_and_outputs() {
        let (mut app, mut op_rx) = test_app();

        app.handle_update(Update::AwaitingInput {
            prompt: "Enter a number: ".to_string(),
        });
        assert!(app.modal.is_some());

        // Blank modal submit goes nowhere and keeps the modal open.
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert!(op_rx.try_recv().is_err());
        assert!(app.modal.is_some());

        app.handle_key_event(KeyEvent::from(KeyCode::Char('5')));
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert!(matches!(
            op_rx.try_recv(),
            Ok(Op::ModalSubmit { text }) if text == "5"
        ));

        // The modal closes on the resume update, not on submit.
        app.handle_update(Update::Resumed {
            chat: ChatBlock::user("5"),
        });
        assert!(app.modal.is_none());

        app.handle_update(Update::RunCompleted {
            outputs: vec![OutputUpdate {
                name: "result".to_string(),
                value: Some(DisplayValue::Text("25".to_string())),
            }],
            chat: ChatBlock::response("25"),
        });
        assert!(!app.busy);
        assert_eq!(
            app.outputs[0].value,
            Some(DisplayValue::Text("25".to_string()))
        );

        let text = buffer_text(&app);
        assert!(text.contains("25"));
        assert!(text.contains("workflow"));
    }

    #[test]
    fn test_event_cards_render_in_order() {
        let (mut app, _op_rx) = test_app();
        for (seq, body) in ["a", "b", "c"].iter().enumerate() {
            app.handle_update(Update::EventAppended {
                card: EventCard {
                    seq,
                    label: "info".to_string(),
                    body: (*body).to_string(),
                    at: Utc::now(),
                },
            });
        }
        assert_eq!(app.event_log.len(), 3);

        let text = buffer_text(&app);
        let a = text.find("[info] a").expect("first card rendered");
        let c = text.find("[info] c").expect("last card rendered");
        assert!(a < c);
    }

    #[test]
    fn test_new_run_clears_log_and_outputs() {
        let (mut app, _op_rx) = test_app();
        app.handle_update(Update::EventAppended {
            card: EventCard {
                seq: 0,
                label: "info".to_string(),
                body: "old".to_string(),
                at: Utc::now(),
            },
        });
        app.handle_update(Update::RunCompleted {
            outputs: vec![OutputUpdate {
                name: "result".to_string(),
                value: Some(DisplayValue::Text("stale".to_string())),
            }],
            chat: ChatBlock::response("stale"),
        });

        app.handle_update(Update::RunStarted {
            run_id: Uuid::new_v4(),
            chat: ChatBlock::user("query: x"),
        });
        assert!(app.event_log.is_empty());
        assert!(app.outputs[0].value.is_none());
        // The chat transcript survives across runs.
        assert_eq!(app.chat.len(), 2);
    }

    #[test]
    fn test_figure_output_renders_summary() {
        let (op_tx, _op_rx) = unbounded_channel();
        let (_update_tx, update_rx) = unbounded_channel();
        let mut app = App::new(
            &[],
            &[FieldSchema::new("chart", TypeTag::OpaqueFigure)],
            crate::theme::DEFAULT,
            op_tx,
            update_rx,
        );

        app.handle_update(Update::RunCompleted {
            outputs: vec![OutputUpdate {
                name: "chart".to_string(),
                value: Some(DisplayValue::Figure(
                    json!({"data": [{"x": [1], "y": [2]}]}),
                )),
            }],
            chat: ChatBlock::response("done"),
        });

        let text = buffer_text(&app);
        assert!(text.contains("[figure] 1 trace(s)"));
    }
}
