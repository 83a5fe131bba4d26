use serde::{Deserialize, Serialize};

/// One stage of the walkthrough. Identity is its position in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepDescriptor {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    pub show_details: bool,
}

/// Normalized position of `index` within a sequence of `len` steps.
///
/// A sequence of zero or one steps has no span to travel, so it reports `0.0`
/// instead of dividing by zero.
pub fn progress_fraction(index: usize, len: usize) -> f32 {
    if len <= 1 {
        return 0.0;
    }
    (index as f32 / (len - 1) as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_first_step_paused_without_details() {
        let state = PlaybackState::default();
        assert_eq!(state.current_index, 0);
        assert!(!state.is_playing);
        assert!(!state.show_details);
    }

    #[test]
    fn progress_spans_zero_to_one() {
        assert_eq!(progress_fraction(0, 8), 0.0);
        assert_eq!(progress_fraction(7, 8), 1.0);
        let mut last = -1.0;
        for index in 0..8 {
            let fraction = progress_fraction(index, 8);
            assert!(fraction >= last);
            last = fraction;
        }
    }

    #[test]
    fn progress_is_defined_for_single_and_empty_sequences() {
        assert_eq!(progress_fraction(0, 1), 0.0);
        assert_eq!(progress_fraction(0, 0), 0.0);
        assert!(!progress_fraction(0, 1).is_nan());
    }

    #[test]
    fn detail_is_omitted_from_json_when_absent() {
        let step = StepDescriptor::new("Original Image", "input");
        let json = serde_json::to_string(&step).expect("serialize");
        assert!(!json.contains("detail"));

        let parsed: StepDescriptor =
            serde_json::from_str(r#"{"title":"t","description":"d"}"#).expect("deserialize");
        assert_eq!(parsed.detail, None);
    }
}
