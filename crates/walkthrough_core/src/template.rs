//! Declarative visual layout for each built-in step.
//!
//! The controller knows nothing about these; hosts look up the template for the
//! current index and draw it however their toolkit prefers.

use serde::Serialize;

pub const PATCH_GRID_SIDE: usize = 4;
pub const PATCH_COUNT: usize = PATCH_GRID_SIDE * PATCH_GRID_SIDE;
pub const EMBEDDING_DIMS: usize = 768;
pub const ATTENTION_HEADS: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepTemplate {
    SourceImage,
    PatchGrid(PatchGrid),
    Embeddings { tokens: usize, dims: usize },
    PositionEncoding { tokens: usize },
    SelfAttention { tokens: usize, links: Vec<AttentionLink> },
    MultiHeadAttention { heads: usize, rows: usize },
    EncoderBlock { layers: Vec<EncoderLayer> },
    Classification { predictions: Vec<Prediction> },
}

impl StepTemplate {
    /// Template for a step of the built-in catalog; `None` past the last one.
    pub fn for_index(index: usize) -> Option<Self> {
        let template = match index {
            0 => StepTemplate::SourceImage,
            1 => StepTemplate::PatchGrid(PatchGrid::square(PATCH_GRID_SIDE)),
            2 => StepTemplate::Embeddings {
                tokens: PATCH_COUNT,
                dims: EMBEDDING_DIMS,
            },
            3 => StepTemplate::PositionEncoding {
                tokens: PATCH_COUNT,
            },
            4 => StepTemplate::SelfAttention {
                tokens: PATCH_COUNT,
                links: vec![
                    AttentionLink::new(0, 2, 0.5),
                    AttentionLink::new(0, 5, 0.3),
                    AttentionLink::new(2, 3, 0.7),
                ],
            },
            5 => StepTemplate::MultiHeadAttention {
                heads: ATTENTION_HEADS,
                rows: 2,
            },
            6 => StepTemplate::EncoderBlock {
                layers: vec![
                    EncoderLayer::MultiHeadAttention,
                    EncoderLayer::LayerNorm,
                    EncoderLayer::FeedForward,
                    EncoderLayer::LayerNorm,
                ],
            },
            7 => StepTemplate::Classification {
                predictions: vec![
                    Prediction::new("Tabby Cat", 61.38),
                    Prediction::new("Egyptian Cat", 12.61),
                    Prediction::new("Tiger Cat", 8.50),
                ],
            },
            _ => return None,
        };
        Some(template)
    }

    pub fn caption(&self) -> Option<&'static str> {
        match self {
            StepTemplate::Embeddings { .. } => {
                Some("Each patch is converted to a vector of 768 dimensions")
            }
            StepTemplate::PositionEncoding { .. } => {
                Some("Position encodings are added to maintain spatial information")
            }
            StepTemplate::SelfAttention { .. } => {
                Some("Attention weights show how each patch relates to all other patches")
            }
            StepTemplate::MultiHeadAttention { .. } => {
                Some("Multiple attention heads capture different types of relationships")
            }
            _ => None,
        }
    }

    /// Whether drawing this template needs the source bitmap.
    pub fn uses_source_image(&self) -> bool {
        matches!(self, StepTemplate::SourceImage | StepTemplate::PatchGrid(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatchGrid {
    pub rows: usize,
    pub cols: usize,
}

impl PatchGrid {
    pub fn square(side: usize) -> Self {
        Self {
            rows: side,
            cols: side,
        }
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tiles in row-major order, each with the slice of the source image it shows.
    pub fn tiles(&self) -> impl Iterator<Item = PatchTile> + '_ {
        (0..self.len()).map(move |index| {
            let row = index / self.cols;
            let col = index % self.cols;
            let width = 1.0 / self.cols as f32;
            let height = 1.0 / self.rows as f32;
            PatchTile {
                index,
                row,
                col,
                uv_min: [col as f32 * width, row as f32 * height],
                uv_max: [(col + 1) as f32 * width, (row + 1) as f32 * height],
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatchTile {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Illustrative connection between two patches; `weight` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttentionLink {
    pub from: usize,
    pub to: usize,
    pub weight: f32,
}

impl AttentionLink {
    pub fn new(from: usize, to: usize, weight: f32) -> Self {
        Self { from, to, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderLayer {
    MultiHeadAttention,
    LayerNorm,
    FeedForward,
}

impl EncoderLayer {
    pub fn label(self) -> &'static str {
        match self {
            EncoderLayer::MultiHeadAttention => "Multi-Head Attention",
            EncoderLayer::LayerNorm => "Layer Normalization",
            EncoderLayer::FeedForward => "Feed Forward Network",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence_pct: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence_pct: f32) -> Self {
        Self {
            label: label.into(),
            confidence_pct,
        }
    }
}

#[cfg(test)]
#[path = "tests/template_tests.rs"]
mod tests;
