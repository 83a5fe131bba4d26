use std::{io::BufRead, path::PathBuf, sync::Arc, thread};

use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    error::CommandParseError,
    protocol::{PlaybackCommand, Transition},
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use walkthrough_core::{load_settings, run_session, PlaybackController, PlaybackView};

mod render;

const HELP: &str =
    "keys: <enter>/n next, p previous, <space>/play toggle autoplay, d toggle details, q quit";

#[derive(Parser, Debug)]
#[command(about = "Step through how a Vision Transformer processes an image")]
struct Args {
    /// TOML step catalog to use instead of the built-in walkthrough.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Milliseconds between automatic steps while playing.
    #[arg(long)]
    period_ms: Option<u64>,
    /// Start with autoplay on.
    #[arg(long)]
    autoplay: bool,
    /// Start with the technical details shown.
    #[arg(long)]
    details: bool,
    /// Print one JSON object per state change instead of text.
    #[arg(long)]
    json: bool,
}

/// An empty line (just Enter) steps forward.
fn parse_line(line: &str) -> Result<PlaybackCommand, CommandParseError> {
    if line.is_empty() {
        return Ok(PlaybackCommand::Advance);
    }
    line.parse()
}

/// Blocking stdin reader on its own thread. Dropping the sender at EOF ends the session.
fn spawn_stdin_reader(cmd_tx: mpsc::Sender<PlaybackCommand>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!("failed to read stdin: {err}");
                    break;
                }
            };
            match parse_line(&line) {
                Ok(command) => {
                    let shutdown = command == PlaybackCommand::Shutdown;
                    if cmd_tx.blocking_send(command).is_err() || shutdown {
                        break;
                    }
                }
                Err(err) => eprintln!("{err}; {HELP}"),
            }
        }
        tracing::debug!("stdin closed; ending walkthrough");
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(catalog) = args.catalog {
        settings.catalog_path = Some(catalog);
    }
    if let Some(period_ms) = args.period_ms {
        settings.autoplay_period_ms = period_ms;
    }
    settings.start_playing |= args.autoplay;
    settings.show_details |= args.details;

    let catalog = Arc::new(settings.catalog().context("failed to load step catalog")?);
    let options = settings.playback_options()?;
    let mut controller = PlaybackController::new(Arc::clone(&catalog), options);

    let json = args.json;
    let image_label = settings.image_path.display().to_string();
    if !json {
        println!("Understanding Vision Transformers ({} steps)", catalog.len());
        println!("{HELP}\n");
        println!("{}", render::render_frame(&controller.view(), &image_label));
    }

    controller.subscribe(move |transition: Transition, view: &PlaybackView<'_>| {
        if json {
            match render::render_json(transition, view) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!("failed to encode playback frame: {err}"),
            }
        } else {
            println!("{}", render::render_transition(transition, view, &image_label));
        }
    });
    settings.apply_initial_state(&mut controller);

    let (cmd_tx, cmd_rx) = mpsc::channel::<PlaybackCommand>(64);
    spawn_stdin_reader(cmd_tx);

    let summary = run_session(&mut controller, cmd_rx).await;
    tracing::info!(
        commands = summary.commands,
        autoplay_ticks = summary.autoplay_ticks,
        "walkthrough finished"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_steps_forward_and_words_map_to_commands() {
        assert_eq!(parse_line(""), Ok(PlaybackCommand::Advance));
        assert_eq!(parse_line(" "), Ok(PlaybackCommand::TogglePlay));
        assert_eq!(parse_line("p"), Ok(PlaybackCommand::Retreat));
        assert!(parse_line("zoom").is_err());
    }

    #[test]
    fn args_accept_overrides() {
        let args = Args::parse_from([
            "vit-walkthrough",
            "--period-ms",
            "500",
            "--autoplay",
            "--json",
        ]);
        assert_eq!(args.period_ms, Some(500));
        assert!(args.autoplay);
        assert!(args.json);
        assert!(!args.details);
    }
}
