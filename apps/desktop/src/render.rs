//! Plain-text rendering of playback state for the terminal.

use std::fmt::Write as _;

use shared::protocol::{PlaybackSnapshot, Transition};
use walkthrough_core::{
    template::{PatchGrid, StepTemplate},
    PlaybackView,
};

const BAR_WIDTH: usize = 24;

pub fn progress_bar(progress: f32, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn status_line(view: &PlaybackView<'_>) -> String {
    let play_state = if view.state.is_playing {
        "playing"
    } else {
        "paused"
    };
    format!(
        "Step {}/{}: {}  {} {:>3.0}%  ({play_state})",
        view.state.current_index + 1,
        view.step_count,
        view.step.title,
        progress_bar(view.progress(), BAR_WIDTH),
        view.progress() * 100.0,
    )
}

pub fn render_frame(view: &PlaybackView<'_>, image_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(view));
    let _ = writeln!(out, "{}", view.step.description);

    if let Some(template) = StepTemplate::for_index(view.state.current_index) {
        out.push('\n');
        for line in template_lines(&template, image_label) {
            let _ = writeln!(out, "    {line}");
        }
        if let Some(caption) = template.caption() {
            let _ = writeln!(out, "    ({caption})");
        }
    }

    if view.state.show_details {
        if let Some(detail) = &view.step.detail {
            let _ = writeln!(out, "\nTechnical Details");
            for line in detail.lines() {
                let _ = writeln!(out, "  {}", line.trim());
            }
        }
    }
    out
}

pub fn render_transition(
    transition: Transition,
    view: &PlaybackView<'_>,
    image_label: &str,
) -> String {
    match transition {
        Transition::PlaybackStarted => format!("autoplay on\n{}", status_line(view)),
        Transition::PlaybackStopped => format!("autoplay off\n{}", status_line(view)),
        Transition::TornDown => "walkthrough closed".to_string(),
        _ => render_frame(view, image_label),
    }
}

#[derive(serde::Serialize)]
struct JsonFrame<'a> {
    transition: Transition,
    #[serde(flatten)]
    snapshot: &'a PlaybackSnapshot,
}

pub fn render_json(transition: Transition, view: &PlaybackView<'_>) -> serde_json::Result<String> {
    let snapshot = view.to_snapshot();
    serde_json::to_string(&JsonFrame {
        transition,
        snapshot: &snapshot,
    })
}

fn template_lines(template: &StepTemplate, image_label: &str) -> Vec<String> {
    match template {
        StepTemplate::SourceImage => vec![format!("<image: {image_label}>")],
        StepTemplate::PatchGrid(grid) => grid_lines(grid, |i| format!("P{i:02}")),
        StepTemplate::Embeddings { tokens, dims } => {
            let mut lines = grid_lines(&square_for(*tokens), |i| format!("[E{i:<2}]"));
            lines.push(format!("each token: {dims} numbers"));
            lines
        }
        StepTemplate::PositionEncoding { tokens } => {
            grid_lines(&square_for(*tokens), |i| format!("[E{i:<2}+P{i:<2}]"))
        }
        StepTemplate::SelfAttention { tokens, links } => {
            let mut lines = grid_lines(&square_for(*tokens), |i| format!("P{i:<2}"));
            for link in links {
                lines.push(format!(
                    "P{} -> P{}  {}",
                    link.from,
                    link.to,
                    "=".repeat((link.weight * 10.0).round() as usize)
                ));
            }
            lines
        }
        StepTemplate::MultiHeadAttention { heads, rows } => {
            let rows = (*rows).max(1);
            let per_row = heads.div_ceil(rows);
            (0..rows)
                .map(|row| {
                    (row * per_row..((row + 1) * per_row).min(*heads))
                        .map(|head| format!("H{head:<2}"))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        }
        StepTemplate::EncoderBlock { layers } => {
            let mut lines = Vec::new();
            for (i, layer) in layers.iter().enumerate() {
                if i > 0 {
                    lines.push("        |".to_string());
                }
                lines.push(format!("[ {} ]", layer.label()));
            }
            lines
        }
        StepTemplate::Classification { predictions } => {
            let mut lines = vec![
                "[ Transformer Encoder Output ]".to_string(),
                "        |".to_string(),
            ];
            for prediction in predictions {
                lines.push(format!(
                    "{:<14} {:>6.2}%",
                    prediction.label, prediction.confidence_pct
                ));
            }
            lines
        }
    }
}

fn square_for(tokens: usize) -> PatchGrid {
    let side = (tokens as f64).sqrt().ceil().max(1.0) as usize;
    PatchGrid {
        rows: tokens.div_ceil(side),
        cols: side,
    }
}

fn grid_lines(grid: &PatchGrid, cell: impl Fn(usize) -> String) -> Vec<String> {
    (0..grid.rows)
        .map(|row| {
            (0..grid.cols)
                .map(|col| cell(row * grid.cols + col))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
