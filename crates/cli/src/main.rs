//! runboard entry point.
//!
//! Picks a bundled demo workflow and serves the terminal dashboard
//! for it. Tracing goes to a file (the terminal belongs to the TUI);
//! set `RUNBOARD_LOG` to a path to enable it.

mod demos;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use colored::Colorize;
use rb_tui::theme;

#[derive(Parser, Debug)]
#[command(name = "runboard", version, about = "Auto-generated dashboard for async workflows")]
struct Args {
    /// Bundled demo workflow to serve.
    #[arg(long, default_value = "squared")]
    demo: String,

    /// Color theme.
    #[arg(long, default_value = "default")]
    theme: String,

    /// List available demos and themes, then exit.
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let args = Args::parse();

    if args.list {
        println!("{}", "demos:".bold());
        for name in demos::NAMES {
            println!("  {name}");
        }
        println!("{}", "themes:".bold());
        for name in theme::names() {
            println!("  {name}");
        }
        return Ok(());
    }

    let workflow = demos::by_name(&args.demo).ok_or_else(|| {
        eyre!(
            "unknown demo '{}' (available: {})",
            args.demo.red(),
            demos::NAMES.join(", ")
        )
    })?;
    let theme = theme::resolve(&args.theme);

    tracing::debug!(demo = %args.demo, theme = theme.name, "starting dashboard");
    rb_tui::run_app(workflow, theme)
        .await
        .map_err(|err| eyre!("{err:#}"))
}

/// Log to the file named by `RUNBOARD_LOG`, if set. Stderr stays
/// untouched while the alternate screen is active.
fn init_tracing() -> Result<()> {
    let Ok(path) = std::env::var("RUNBOARD_LOG") else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| eyre!("cannot open log file {path}: {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
