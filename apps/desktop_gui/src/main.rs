use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod media;
mod ui;

use anyhow::Context as _;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use shared::{
    domain::PlaybackState,
    protocol::{PlaybackCommand, PlaybackSnapshot},
};
use tokio::sync::{mpsc, watch};
use walkthrough_core::{load_settings, template::PATCH_GRID_SIDE, Settings};

use crate::ui::WalkthroughApp;

#[derive(Parser, Debug)]
#[command(about = "Windowed walkthrough of how a Vision Transformer processes an image")]
struct Args {
    /// TOML step catalog to use instead of the built-in walkthrough.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Image shown on the first step and sliced into patches on the second.
    #[arg(long)]
    image: Option<PathBuf>,
    /// Milliseconds between automatic steps while playing.
    #[arg(long)]
    period_ms: Option<u64>,
    /// Start with autoplay on.
    #[arg(long)]
    autoplay: bool,
    /// Start with the technical details shown.
    #[arg(long)]
    details: bool,
}

impl Args {
    fn apply_to(self, settings: &mut Settings) {
        if let Some(catalog) = self.catalog {
            settings.catalog_path = Some(catalog);
        }
        if let Some(image) = self.image {
            settings.image_path = image;
        }
        if let Some(period_ms) = self.period_ms {
            settings.autoplay_period_ms = period_ms;
        }
        settings.start_playing |= self.autoplay;
        settings.show_details |= self.details;
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut settings = load_settings()?;
    Args::parse().apply_to(&mut settings);
    settings.playback_options()?;
    let catalog = Arc::new(settings.catalog().context("failed to load step catalog")?);

    let initial = PlaybackSnapshot::new(
        PlaybackState::default(),
        catalog.len(),
        catalog.get(0).clone(),
    );
    let (source_image, image_error) =
        media::load_or_placeholder(&settings.image_path, PATCH_GRID_SIDE);

    let (cmd_tx, cmd_rx) = mpsc::channel::<PlaybackCommand>(64);
    let (state_tx, state_rx) = watch::channel(None);
    let (ui_tx, ui_rx) = bounded(64);
    let (backend_tx, backend_rx) = bounded(1);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Understanding Vision Transformers")
            .with_inner_size([1080.0, 760.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Understanding Vision Transformers",
        options,
        Box::new(move |cc| {
            let backend = backend_bridge::runtime::launch(
                catalog,
                settings,
                cmd_rx,
                state_tx,
                ui_tx,
                cc.egui_ctx.clone(),
            );
            let _ = backend_tx.send(backend);
            Ok(Box::new(WalkthroughApp::new(
                cmd_tx,
                ui_rx,
                state_rx,
                initial,
                source_image,
                image_error,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run walkthrough window: {err}"))?;

    // The window owned the command sender; the session has ended or is ending.
    if let Ok(backend) = backend_rx.try_recv() {
        if backend.join().is_err() {
            tracing::error!("playback backend thread panicked");
        }
    }
    Ok(())
}
