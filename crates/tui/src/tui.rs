//! Terminal lifecycle and frame scheduling.
//!
//! `Tui` wraps ratatui's Terminal with raw mode setup, a panic hook
//! that restores the terminal, and a frame scheduler that coalesces
//! redraw requests so bursts of updates produce a single draw.

use anyhow::Result;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::pin::Pin;
use std::time::{Duration, Instant};
use tokio::select;
use tokio_stream::{Stream, StreamExt};

pub type TerminalBackend = CrosstermBackend<Stdout>;

/// Terminal-side events consumed by the app loop.
#[derive(Debug)]
pub enum ShellEvent {
    /// Keyboard input.
    Key(KeyEvent),
    /// Bracketed paste into the focused input.
    Paste(String),
    /// A scheduled or resize-forced redraw.
    Draw,
}

pub struct Tui {
    terminal: Terminal<TerminalBackend>,
    frame_schedule_tx: tokio::sync::mpsc::UnboundedSender<Instant>,
    draw_tx: tokio::sync::broadcast::Sender<()>,
}

impl Tui {
    /// Enter raw mode and the alternate screen, and start the frame
    /// coalescing task.
    pub fn init() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnableBracketedPaste)?;
        execute!(stdout(), EnterAlternateScreen)?;

        set_panic_hook();

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        let (frame_schedule_tx, frame_schedule_rx) = tokio::sync::mpsc::unbounded_channel();
        let (draw_tx, _) = tokio::sync::broadcast::channel(1);

        let draw_tx_clone = draw_tx.clone();
        tokio::spawn(async move {
            coalesce_frames(frame_schedule_rx, draw_tx_clone).await;
        });

        Ok(Self {
            terminal,
            frame_schedule_tx,
            draw_tx,
        })
    }

    /// Restore the terminal to its original state.
    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(stdout(), DisableBracketedPaste)?;
        execute!(stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn frame_requester(&self) -> FrameRequester {
        FrameRequester {
            frame_schedule_tx: self.frame_schedule_tx.clone(),
        }
    }

    /// Merge crossterm input and scheduled draws into one stream.
    pub fn event_stream(&self) -> Pin<Box<dyn Stream<Item = ShellEvent> + Send + 'static>> {
        let mut crossterm_events = crossterm::event::EventStream::new();
        let mut draw_rx = self.draw_tx.subscribe();

        let event_stream = async_stream::stream! {
            loop {
                select! {
                    Some(Ok(event)) = crossterm_events.next() => {
                        match event {
                            Event::Key(key_event) => yield ShellEvent::Key(key_event),
                            Event::Resize(_, _) => yield ShellEvent::Draw,
                            Event::Paste(pasted) => yield ShellEvent::Paste(pasted),
                            _ => {}
                        }
                    }
                    result = draw_rx.recv() => {
                        match result {
                            Ok(()) => yield ShellEvent::Draw,
                            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {
                                // Lagged requests collapse into one draw.
                                yield ShellEvent::Draw;
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                        }
                    }
                }
            }
        };

        Box::pin(event_stream)
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Collapses scheduled frame deadlines into single draw notifications.
async fn coalesce_frames(
    mut rx: tokio::sync::mpsc::UnboundedReceiver<Instant>,
    draw_tx: tokio::sync::broadcast::Sender<()>,
) {
    use tokio::time::{sleep_until, Instant as TokioInstant};

    let mut next_deadline: Option<Instant> = None;

    loop {
        let target = next_deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));
        let sleep_fut = sleep_until(TokioInstant::from_std(target));
        tokio::pin!(sleep_fut);

        select! {
            recv = rx.recv() => {
                match recv {
                    Some(at) => {
                        if next_deadline.map_or(true, |deadline| at < deadline) {
                            next_deadline = Some(at);
                        }
                    }
                    None => break,
                }
            }
            () = &mut sleep_fut => {
                if next_deadline.take().is_some() {
                    let _ = draw_tx.send(());
                }
            }
        }
    }
}

/// Handle for scheduling redraws from anywhere in the app.
#[derive(Clone, Debug)]
pub struct FrameRequester {
    frame_schedule_tx: tokio::sync::mpsc::UnboundedSender<Instant>,
}

impl FrameRequester {
    pub fn schedule_frame(&self) {
        let _ = self.frame_schedule_tx.send(Instant::now());
    }

    pub fn schedule_frame_in(&self, dur: Duration) {
        let _ = self.frame_schedule_tx.send(Instant::now() + dur);
    }
}

fn set_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableBracketedPaste);
        let _ = execute!(stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}
