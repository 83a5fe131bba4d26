use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::{domain::StepDescriptor, error::CatalogError};

pub const DEFAULT_STEP_COUNT: usize = 8;

/// Immutable, ordered list of walkthrough steps. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCatalog {
    steps: Vec<StepDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(rename = "step", default)]
    steps: Vec<StepDescriptor>,
}

impl StepCatalog {
    pub fn new(steps: Vec<StepDescriptor>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, step) in steps.iter().enumerate() {
            if step.title.trim().is_empty() {
                return Err(CatalogError::BlankTitle { index });
            }
            if step.description.trim().is_empty() {
                return Err(CatalogError::BlankDescription { index });
            }
        }
        Ok(Self { steps })
    }

    /// The eight stages a Vision Transformer walks an image through.
    pub fn vision_transformer() -> Self {
        Self {
            steps: vision_transformer_steps(),
        }
    }

    /// Returns the step at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= self.len()`. The controller keeps its index in range,
    /// so an out-of-range lookup is a bug in the caller.
    pub fn get(&self, index: usize) -> &StepDescriptor {
        assert!(
            index < self.steps.len(),
            "step index {index} out of range for catalog of {} steps",
            self.steps.len()
        );
        &self.steps[index]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter()
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = toml::from_str(raw).context("failed to parse step catalog")?;
        Ok(Self::new(file.steps)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read step catalog '{}'", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid step catalog '{}'", path.display()))
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        let file = CatalogFile {
            steps: self.steps.clone(),
        };
        toml::to_string_pretty(&file).context("failed to serialize step catalog")
    }
}

impl Default for StepCatalog {
    fn default() -> Self {
        Self::vision_transformer()
    }
}

fn step(title: &str, description: &str, detail: &str) -> StepDescriptor {
    StepDescriptor::new(title, description).with_detail(detail)
}

fn vision_transformer_steps() -> Vec<StepDescriptor> {
    vec![
        step(
            "Original Image",
            "This is our input image that the Vision Transformer will analyze.",
            "We begin with a simple image of a cat. This is the input for the Vision Transformer, \
             just like the images we see with our own eyes. Computers don't 'see' a cat directly; \
             they see a matrix of numbers, each one describing the colour of a pixel. The Vision \
             Transformer's job is to understand what these numbers represent. Traditional computer \
             vision looks at local features one at a time (first the eyes, then the ears, then the \
             whiskers), while a Vision Transformer can attend to many parts of the image at once and \
             relate them to each other.",
        ),
        step(
            "Patch Extraction",
            "The image is divided into 16 equal patches, each processed independently.",
            "The image is cut into small squares, like the pieces of a puzzle. Here we use a 4x4 \
             grid, giving 16 patches. A real Vision Transformer usually uses a finer division, for \
             example splitting a 224x224 pixel image into 196 patches of 16x16 pixels. Unlike a \
             convolutional network, which slides a window over local regions, a ViT divides the \
             image into non-overlapping patches and processes them globally.",
        ),
        step(
            "Embedding Generation",
            "Each patch is converted to a numerical representation (embedding) using a linear projection.",
            "Each patch is turned into a vector of numbers, its embedding, which captures the \
             patch's features in a form the model can compute with. In this walkthrough every patch \
             becomes a 768-dimensional vector. That may sound large, but describing each patch with \
             many values is what lets the model capture rich visual information.",
        ),
        step(
            "Position Encoding",
            "Position information is added to each patch embedding so the model knows the spatial arrangement.",
            "Cutting the image into patches throws away where each patch came from. Position \
             encodings put that information back, like numbering the pieces of a puzzle so the model \
             knows which piece sits top left and which sits bottom right. Without them the model \
             could confuse an ear in one corner with a paw in another.",
        ),
        step(
            "Self-Attention Mechanism",
            "Each patch 'attends' to all other patches, measuring their relationships and importance.",
            "Self-attention is the core of the Vision Transformer. While processing the patch that \
             contains one of the cat's eyes, the model effectively asks which other patches matter \
             to it: the other eye, the ears and the nose score highly, background patches score \
             low. Every one of the 16 patches (P0 to P15) computes such a relationship strength with \
             every other patch, which is how the model learns relationships between distant parts \
             of the image.",
        ),
        step(
            "Multi-Head Attention",
            "Multiple attention mechanisms work in parallel to capture different types of relationships.",
            "Multi-head attention runs several self-attention mechanisms side by side. Each head is \
             like a different expert looking at the same image: some focus on colour, others on \
             shape, texture or spatial layout. This walkthrough shows 16 heads in two groups; real \
             models typically use 8 to 16 heads and combine what they learn.",
        ),
        step(
            "Transformer Blocks",
            "The attention outputs go through several processing layers to extract higher-level features.",
            "A Transformer block chains four components:\n\
             1. Multi-Head Attention relates the different parts of the image.\n\
             2. Layer Normalization keeps the values numerically stable.\n\
             3. A Feed-Forward Network processes the attention output into higher-level features.\n\
             4. Another Layer Normalization stabilizes the result again.\n\
             A Vision Transformer stacks many of these blocks, each building on the previous one, \
             moving from lines and colours towards shapes and meaning.",
        ),
        step(
            "Classification",
            "The final layer makes a prediction about what's in the image.",
            "After the last Transformer block the model condenses everything into a final \
             representation and predicts what the image shows. Here it is 61.38% confident the \
             image contains a tabby cat. Real Vision Transformers can recognize thousands of \
             objects, animals and scenes, sometimes more accurately than people do.",
        ),
    ]
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
