//! Text Metrics
//!
//! Character and word counting over a document or its first selection.
//! Pure functions with no hidden state: the same input always yields the
//! same counts.

pub mod normalize;
pub mod selection;

use serde::{Deserialize, Serialize};

pub use normalize::{normalize, CountOptions};
pub use selection::{extract, SelectionRange};

/// Character and word counts for a span of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub characters: usize,
    pub words: usize,
}

impl Metrics {
    pub fn is_zero(&self) -> bool {
        self.characters == 0 && self.words == 0
    }
}

/// Counts for a whole document together with its selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetrics {
    pub total: Metrics,
    pub selected: Metrics,
}

/// Counter configured with [`CountOptions`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextMetrics {
    options: CountOptions,
}

impl TextMetrics {
    pub fn new(options: CountOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CountOptions {
        self.options
    }

    /// Count characters and words in one normalization pass
    pub fn compute(&self, text: &str, selections: Option<&[SelectionRange]>) -> Metrics {
        let normalized = normalize(extract(text, selections), self.options);
        if normalized.is_empty() {
            return Metrics::default();
        }

        Metrics {
            characters: normalized.chars().count(),
            words: normalized.split(' ').count(),
        }
    }

    pub fn character_count(&self, text: &str, selections: Option<&[SelectionRange]>) -> usize {
        self.compute(text, selections).characters
    }

    pub fn word_count(&self, text: &str, selections: Option<&[SelectionRange]>) -> usize {
        self.compute(text, selections).words
    }

    /// Whole-document counts plus counts for the first selection.
    ///
    /// An empty selection list leaves `selected` at zero instead of falling
    /// back to the whole document.
    pub fn compute_document(
        &self,
        text: &str,
        selections: &[SelectionRange],
    ) -> DocumentMetrics {
        let total = self.compute(text, None);
        let selected = if selections.is_empty() {
            Metrics::default()
        } else {
            self.compute(text, Some(selections))
        };

        DocumentMetrics { total, selected }
    }
}

/// Character count with default options (raw text, tags included)
pub fn character_count(text: &str, selections: Option<&[SelectionRange]>) -> usize {
    TextMetrics::default().character_count(text, selections)
}

/// Word count with default options (raw text, tags included)
pub fn word_count(text: &str, selections: Option<&[SelectionRange]>) -> usize {
    TextMetrics::default().word_count(text, selections)
}
