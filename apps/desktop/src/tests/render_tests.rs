use super::*;

use shared::domain::{PlaybackState, StepDescriptor};
use walkthrough_core::StepCatalog;

fn view_at<'a>(catalog: &'a StepCatalog, index: usize, show_details: bool) -> PlaybackView<'a> {
    PlaybackView {
        state: PlaybackState {
            current_index: index,
            is_playing: false,
            show_details,
        },
        step: catalog.get(index),
        step_count: catalog.len(),
    }
}

#[test]
fn progress_bar_fills_proportionally() {
    assert_eq!(progress_bar(0.0, 4), "[----]");
    assert_eq!(progress_bar(0.5, 4), "[##--]");
    assert_eq!(progress_bar(1.0, 4), "[####]");
    assert_eq!(progress_bar(7.0, 4), "[####]");
}

#[test]
fn status_line_shows_one_based_step_and_percentage() {
    let catalog = StepCatalog::vision_transformer();
    let line = status_line(&view_at(&catalog, 7, false));
    assert!(line.starts_with("Step 8/8: Classification"));
    assert!(line.contains("100%"));
    assert!(line.contains("(paused)"));
}

#[test]
fn frame_includes_template_and_details_only_when_shown() {
    let catalog = StepCatalog::vision_transformer();

    let hidden = render_frame(&view_at(&catalog, 1, false), "cat.jpg");
    assert!(hidden.contains("P00 P01 P02 P03"));
    assert!(hidden.contains("P12 P13 P14 P15"));
    assert!(!hidden.contains("Technical Details"));

    let shown = render_frame(&view_at(&catalog, 1, true), "cat.jpg");
    assert!(shown.contains("Technical Details"));
    assert!(shown.contains("196 patches"));
}

#[test]
fn source_image_and_classification_frames() {
    let catalog = StepCatalog::vision_transformer();
    let source = render_frame(&view_at(&catalog, 0, false), "assets/cat.jpg");
    assert!(source.contains("<image: assets/cat.jpg>"));

    let classification = render_frame(&view_at(&catalog, 7, false), "cat.jpg");
    assert!(classification.contains("Tabby Cat"));
    assert!(classification.contains("61.38%"));
}

#[test]
fn custom_catalog_steps_render_without_a_template() {
    let steps: Vec<StepDescriptor> = (0..10)
        .map(|i| StepDescriptor::new(format!("Step {i}"), "text"))
        .collect();
    let catalog = StepCatalog::new(steps).expect("catalog");
    let frame = render_frame(&view_at(&catalog, 9, false), "img");
    assert!(frame.starts_with("Step 10/10: Step 9"));
}

#[test]
fn json_frames_flatten_the_snapshot() {
    let catalog = StepCatalog::vision_transformer();
    let json = render_json(Transition::Advanced, &view_at(&catalog, 2, false)).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse json");
    assert_eq!(value["transition"], "advanced");
    assert_eq!(value["step"]["title"], "Embedding Generation");
    assert_eq!(value["state"]["current_index"], 2);
    assert_eq!(value["step_count"], 8);
}

#[test]
fn playback_toggles_render_a_status_line_only() {
    let catalog = StepCatalog::vision_transformer();
    let view = view_at(&catalog, 3, false);
    let out = render_transition(Transition::PlaybackStarted, &view, "img");
    assert!(out.starts_with("autoplay on"));
    assert!(!out.contains("Position encodings"));
}
