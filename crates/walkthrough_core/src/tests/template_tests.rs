use super::*;
use crate::catalog::{StepCatalog, DEFAULT_STEP_COUNT};

#[test]
fn every_builtin_step_has_a_template() {
    let catalog = StepCatalog::vision_transformer();
    for index in 0..catalog.len() {
        assert!(
            StepTemplate::for_index(index).is_some(),
            "missing template for step {index}"
        );
    }
    assert_eq!(StepTemplate::for_index(DEFAULT_STEP_COUNT), None);
}

#[test]
fn templates_follow_catalog_order() {
    assert_eq!(StepTemplate::for_index(0), Some(StepTemplate::SourceImage));
    assert!(matches!(
        StepTemplate::for_index(1),
        Some(StepTemplate::PatchGrid(grid)) if grid.len() == PATCH_COUNT
    ));
    assert!(matches!(
        StepTemplate::for_index(7),
        Some(StepTemplate::Classification { ref predictions }) if predictions[0].label == "Tabby Cat"
    ));
}

#[test]
fn patch_tiles_cover_the_image_row_major() {
    let grid = PatchGrid::square(4);
    let tiles: Vec<_> = grid.tiles().collect();
    assert_eq!(tiles.len(), 16);

    assert_eq!(tiles[0].uv_min, [0.0, 0.0]);
    assert_eq!(tiles[0].uv_max, [0.25, 0.25]);

    let fifth = tiles[5];
    assert_eq!((fifth.row, fifth.col), (1, 1));
    assert_eq!(fifth.uv_min, [0.25, 0.25]);

    assert_eq!(tiles[15].uv_max, [1.0, 1.0]);
}

#[test]
fn only_image_steps_need_the_bitmap() {
    let needs_image: Vec<usize> = (0..DEFAULT_STEP_COUNT)
        .filter(|index| {
            StepTemplate::for_index(*index)
                .map(|template| template.uses_source_image())
                .unwrap_or(false)
        })
        .collect();
    assert_eq!(needs_image, vec![0, 1]);
}

#[test]
fn captions_match_their_layouts() {
    let embeddings = StepTemplate::for_index(2).expect("template");
    assert!(embeddings.caption().unwrap_or_default().contains("768"));
    assert_eq!(StepTemplate::SourceImage.caption(), None);
}
