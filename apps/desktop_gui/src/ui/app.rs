use std::time::Duration;

use crossbeam_channel::Receiver;
use eframe::egui;
use shared::protocol::{PlaybackCommand, PlaybackSnapshot, Transition};
use tokio::sync::{mpsc, watch};
use walkthrough_core::template::{AttentionLink, PatchGrid, Prediction, StepTemplate};

use crate::{
    backend_bridge::commands::{pressed_commands, shortcut_hint},
    controller::{
        events::{describe_transition, StateUpdate, UiError, UiErrorContext, UiEvent},
        orchestration::dispatch_playback_command,
    },
};

const TITLE: &str = "Understanding Vision Transformers";
const SUBTITLE: &str = "An interactive walkthrough of how Vision Transformers process images";
const SOURCE_IMAGE_EDGE: f32 = 320.0;
const TILE_GAP: f32 = 4.0;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x3b, 0x82, 0xf6);
const PANEL_FILL: egui::Color32 = egui::Color32::from_rgb(0xee, 0xf2, 0xf7);
const TOKEN_FILL: egui::Color32 = egui::Color32::from_rgb(0xdb, 0xea, 0xfe);
const POSITION_FILL: egui::Color32 = egui::Color32::from_rgb(0xfe, 0xf3, 0xc7);
const MUTED_TEXT: egui::Color32 = egui::Color32::from_rgb(0x47, 0x55, 0x69);

pub struct WalkthroughApp {
    cmd_tx: mpsc::Sender<PlaybackCommand>,
    ui_rx: Receiver<UiEvent>,
    state_rx: watch::Receiver<Option<StateUpdate>>,
    snapshot: PlaybackSnapshot,
    status: String,
    error: Option<UiError>,
    pending_image: Option<egui::ColorImage>,
    source_texture: Option<egui::TextureHandle>,
    session_closed: bool,
    scroll_to_top: bool,
}

impl WalkthroughApp {
    pub fn new(
        cmd_tx: mpsc::Sender<PlaybackCommand>,
        ui_rx: Receiver<UiEvent>,
        state_rx: watch::Receiver<Option<StateUpdate>>,
        snapshot: PlaybackSnapshot,
        source_image: egui::ColorImage,
        image_error: Option<String>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state_rx,
            snapshot,
            status: shortcut_hint().to_string(),
            error: image_error
                .map(|message| UiError::from_message(UiErrorContext::SourceImage, message)),
            pending_image: Some(source_image),
            source_texture: None,
            session_closed: false,
            scroll_to_top: false,
        }
    }

    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.snapshot
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_session_closed(&self) -> bool {
        self.session_closed
    }

    pub fn send(&mut self, command: PlaybackCommand) {
        if self.session_closed {
            return;
        }
        dispatch_playback_command(&self.cmd_tx, command, &mut self.status);
    }

    pub fn apply_state(&mut self, update: StateUpdate) {
        let StateUpdate {
            transition,
            snapshot,
        } = update;
        self.status = describe_transition(transition, &snapshot);
        self.session_closed = transition == Transition::TornDown;
        self.scroll_to_top |= transition.moved_step();
        self.snapshot = snapshot;
    }

    pub fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(err) => {
                tracing::warn!(context = ?err.context(), "{}", err.message());
                if err.context() == UiErrorContext::BackendStartup {
                    self.session_closed = true;
                }
                self.status = err.status_text();
                self.error = Some(err);
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
        // Read even after the backend exits; the last value is the teardown.
        let latest = {
            let slot = self.state_rx.borrow_and_update();
            if slot.has_changed() {
                (*slot).clone()
            } else {
                None
            }
        };
        if let Some(update) = latest {
            self.apply_state(update);
        }
    }

    fn upload_source_image(&mut self, ctx: &egui::Context) {
        if let Some(image) = self.pending_image.take() {
            self.source_texture =
                Some(ctx.load_texture("source-image", image, egui::TextureOptions::LINEAR));
        }
    }

    fn show_header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading(TITLE);
            ui.label(egui::RichText::new(SUBTITLE).color(MUTED_TEXT));
            ui.add_space(4.0);
            ui.add(
                egui::ProgressBar::new(self.snapshot.progress)
                    .fill(ACCENT)
                    .text(format!(
                        "Step {} of {}",
                        self.snapshot.step_number(),
                        self.snapshot.step_count
                    )),
            );
            ui.add_space(6.0);
        });
    }

    fn show_controls(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.add_enabled_ui(!self.session_closed, |ui| {
                    let details_label = if self.snapshot.state.show_details {
                        "Hide Details"
                    } else {
                        "Show Details"
                    };
                    if ui.button(details_label).clicked() {
                        clicked = Some(PlaybackCommand::ToggleDetails);
                    }
                    if ui.button("Previous").clicked() {
                        clicked = Some(PlaybackCommand::Retreat);
                    }
                    let play_label = if self.snapshot.state.is_playing {
                        "Pause"
                    } else {
                        "Play"
                    };
                    if ui.button(play_label).clicked() {
                        clicked = Some(PlaybackCommand::TogglePlay);
                    }
                    if ui.button("Next").clicked() {
                        clicked = Some(PlaybackCommand::Advance);
                    }
                });
                ui.separator();
                let color = if self.error.is_some() {
                    egui::Color32::from_rgb(0xb9, 0x1c, 0x1c)
                } else {
                    MUTED_TEXT
                };
                ui.label(egui::RichText::new(&self.status).color(color));
            });
            ui.add_space(6.0);
        });
        if let Some(command) = clicked {
            self.send(command);
        }
    }

    fn show_details_panel(&self, ctx: &egui::Context) {
        if !self.snapshot.state.show_details {
            return;
        }
        egui::SidePanel::right("technical-details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.heading("Technical Details");
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| match &self.snapshot.step.detail {
                    Some(detail) => {
                        for paragraph in detail.lines().map(str::trim).filter(|l| !l.is_empty()) {
                            ui.label(paragraph);
                            ui.add_space(4.0);
                        }
                    }
                    None => {
                        ui.label(
                            egui::RichText::new("No technical details for this step.")
                                .color(MUTED_TEXT),
                        );
                    }
                });
            });
    }

    fn show_step(&self, ctx: &egui::Context, scroll_to_top: bool) {
        let mut scroll = egui::ScrollArea::vertical();
        if scroll_to_top {
            scroll = scroll.vertical_scroll_offset(0.0);
        }
        egui::CentralPanel::default().show(ctx, |ui| {
            scroll.show(ui, |ui| {
                ui.heading(format!(
                    "Step {}: {}",
                    self.snapshot.step_number(),
                    self.snapshot.step.title
                ));
                ui.add_space(4.0);
                ui.label(&self.snapshot.step.description);
                ui.add_space(12.0);

                egui::Frame::new()
                    .fill(PANEL_FILL)
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        match StepTemplate::for_index(self.snapshot.state.current_index) {
                            Some(template) => self.show_template(ui, &template),
                            None => {
                                ui.label(
                                    egui::RichText::new("No visualisation for this step.")
                                        .color(MUTED_TEXT),
                                );
                            }
                        }
                    });
            });
        });
    }

    fn show_template(&self, ui: &mut egui::Ui, template: &StepTemplate) {
        if template.uses_source_image() {
            match &self.source_texture {
                Some(texture) => image_template(ui, texture, template),
                None => {
                    ui.spinner();
                }
            }
        } else {
            drawn_template(ui, template);
        }
        if let Some(caption) = template.caption() {
            ui.add_space(8.0);
            ui.label(egui::RichText::new(caption).italics().color(MUTED_TEXT));
        }
    }
}

impl eframe::App for WalkthroughApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.upload_source_image(ctx);

        for command in ctx.input(|i| pressed_commands(&i.events)) {
            self.send(command);
        }
        if ctx.input(|i| i.viewport().close_requested()) {
            self.send(PlaybackCommand::Shutdown);
        }

        self.show_header(ctx);
        self.show_controls(ctx);
        self.show_details_panel(ctx);
        let scroll_to_top = std::mem::take(&mut self.scroll_to_top);
        self.show_step(ctx, scroll_to_top);

        // State changes request their own repaint; this only keeps the queue drained.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

/// Largest size with the image's aspect ratio whose longest edge is `max_edge`.
pub fn fit_size(size: [usize; 2], max_edge: f32) -> egui::Vec2 {
    let [w, h] = [size[0].max(1) as f32, size[1].max(1) as f32];
    let scale = max_edge / w.max(h);
    egui::vec2(w * scale, h * scale)
}

/// Columns for laying `tokens` out as a near-square grid.
pub fn grid_columns(tokens: usize) -> usize {
    ((tokens as f64).sqrt().ceil() as usize).max(1)
}

fn image_template(ui: &mut egui::Ui, texture: &egui::TextureHandle, template: &StepTemplate) {
    let full = fit_size(texture.size(), SOURCE_IMAGE_EDGE);
    match template {
        StepTemplate::SourceImage => {
            ui.vertical_centered(|ui| {
                ui.add(egui::Image::new((texture.id(), full)));
            });
        }
        StepTemplate::PatchGrid(grid) => patch_grid(ui, texture, full, grid),
        _ => {}
    }
}

fn patch_grid(
    ui: &mut egui::Ui,
    texture: &egui::TextureHandle,
    full: egui::Vec2,
    grid: &PatchGrid,
) {
    if grid.is_empty() {
        return;
    }
    let tile = egui::vec2(full.x / grid.cols as f32, full.y / grid.rows as f32);
    egui::Grid::new("patch-grid")
        .spacing([TILE_GAP, TILE_GAP])
        .show(ui, |ui| {
            for patch in grid.tiles() {
                let uv = egui::Rect::from_min_max(
                    egui::pos2(patch.uv_min[0], patch.uv_min[1]),
                    egui::pos2(patch.uv_max[0], patch.uv_max[1]),
                );
                ui.add(egui::Image::new((texture.id(), tile)).uv(uv))
                    .on_hover_text(format!("Patch {}", patch.index));
                if patch.col + 1 == grid.cols {
                    ui.end_row();
                }
            }
        });
}

fn drawn_template(ui: &mut egui::Ui, template: &StepTemplate) {
    match template {
        StepTemplate::Embeddings { tokens, dims } => {
            token_grid(ui, *tokens, TOKEN_FILL, |i| format!("E{i}"));
            ui.label(format!("{dims} dimensions per token"));
        }
        StepTemplate::PositionEncoding { tokens } => {
            token_grid(ui, *tokens, POSITION_FILL, |i| format!("E{i}+P{i}"));
        }
        StepTemplate::SelfAttention { tokens, links } => attention_map(ui, *tokens, links),
        StepTemplate::MultiHeadAttention { heads, rows } => head_rows(ui, *heads, *rows),
        StepTemplate::EncoderBlock { layers } => {
            ui.vertical_centered(|ui| {
                for (i, layer) in layers.iter().enumerate() {
                    if i > 0 {
                        ui.label("↓");
                    }
                    boxed_label(ui, layer.label(), TOKEN_FILL);
                }
            });
        }
        StepTemplate::Classification { predictions } => classification(ui, predictions),
        StepTemplate::SourceImage | StepTemplate::PatchGrid(_) => {}
    }
}

fn boxed_label(ui: &mut egui::Ui, text: &str, fill: egui::Color32) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::symmetric(8, 6))
        .show(ui, |ui| {
            ui.label(text);
        });
}

fn token_grid(
    ui: &mut egui::Ui,
    tokens: usize,
    fill: egui::Color32,
    label: impl Fn(usize) -> String,
) {
    let cols = grid_columns(tokens);
    egui::Grid::new("token-grid")
        .spacing([TILE_GAP, TILE_GAP])
        .show(ui, |ui| {
            for i in 0..tokens {
                boxed_label(ui, &label(i), fill);
                if (i + 1) % cols == 0 {
                    ui.end_row();
                }
            }
        });
}

fn attention_map(ui: &mut egui::Ui, tokens: usize, links: &[AttentionLink]) {
    let cols = grid_columns(tokens);
    let rows = tokens.div_ceil(cols);
    let cell = 44.0;
    let size = egui::vec2(cols as f32 * cell, rows as f32 * cell);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let origin = response.rect.min;
    let center = |index: usize| {
        let (row, col) = (index / cols, index % cols);
        origin + egui::vec2((col as f32 + 0.5) * cell, (row as f32 + 0.5) * cell)
    };

    for index in 0..tokens {
        let rect =
            egui::Rect::from_center_size(center(index), egui::vec2(cell - 6.0, cell - 6.0));
        painter.rect_filled(rect, 4.0, TOKEN_FILL);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            format!("P{index}"),
            egui::FontId::proportional(12.0),
            MUTED_TEXT,
        );
    }
    for link in links.iter().filter(|l| l.from < tokens && l.to < tokens) {
        let alpha = (link.weight.clamp(0.0, 1.0) * 255.0) as u8;
        painter.line_segment(
            [center(link.from), center(link.to)],
            egui::Stroke::new(
                1.0 + link.weight * 5.0,
                egui::Color32::from_rgba_unmultiplied(0x3b, 0x82, 0xf6, alpha),
            ),
        );
    }
}

fn head_rows(ui: &mut egui::Ui, heads: usize, rows: usize) {
    let per_row = heads.div_ceil(rows.max(1)).max(1);
    for row in 0..rows.max(1) {
        ui.horizontal(|ui| {
            for head in row * per_row..((row + 1) * per_row).min(heads) {
                let shade = 0xc0 - ((head * 0x60) / heads.max(1)) as u8;
                boxed_label(
                    ui,
                    &format!("H{}", head + 1),
                    egui::Color32::from_rgb(shade, 0xd8, 0xf0),
                );
            }
        });
    }
}

fn classification(ui: &mut egui::Ui, predictions: &[Prediction]) {
    ui.vertical_centered(|ui| {
        boxed_label(ui, "Transformer Encoder Output", TOKEN_FILL);
        ui.label("↓");
    });
    for prediction in predictions {
        ui.add(
            egui::ProgressBar::new(prediction.confidence_pct / 100.0)
                .fill(ACCENT)
                .text(format!(
                    "{}  {:.2}%",
                    prediction.label, prediction.confidence_pct
                )),
        );
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
