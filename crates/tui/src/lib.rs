//! # rb-tui
//!
//! Terminal dashboard shell for runboard. Builds the input form,
//! output panes, event log, chat transcript and modal from a
//! workflow's declared schemas, and speaks to the run controller in
//! `rb-core` over the `Op`/`Update` channels from `rb-protocol`.

pub mod app;
pub mod theme;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use theme::Theme;
pub use tui::Tui;

use anyhow::Result;
use rb_core::RunController;
use rb_core::Workflow;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Run the dashboard for one workflow until the user quits.
///
/// Spawns the run controller as a background task and drives the
/// terminal loop on the current one. Restores the terminal before
/// returning, including on error.
pub async fn run_app(workflow: Arc<dyn Workflow>, theme: Theme) -> Result<()> {
    let (op_tx, op_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();

    let controller = RunController::new(workflow, update_tx);
    let input_schema = controller.input_schema().to_vec();
    let output_schema = controller.output_schema().to_vec();
    let controller_task = tokio::spawn(controller.serve(op_rx));

    let mut tui = Tui::init()?;
    let mut app = App::new(&input_schema, &output_schema, theme, op_tx, update_rx);

    let result = app.run(&mut tui).await;

    tui.restore()?;
    controller_task.abort();
    result
}
