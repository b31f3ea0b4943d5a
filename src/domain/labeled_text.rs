// ============================================================
// Layer 3 — LabeledText Domain Type
// ============================================================
// One line of a train/dev/test corpus file after parsing:
// the class index and the raw text it belongs to.
//
// Example line in train.txt:
//   3<TAB>the film is a small delight from start to finish
//
// becomes LabeledText { label: 3, text: "the film is ..." }

use serde::{Deserialize, Serialize};

/// A single labelled piece of text, before tokenisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledText {
    /// Class index in `[0, num_classes)`
    pub label: usize,

    /// The raw text of the example
    pub text: String,
}

impl LabeledText {
    pub fn new(label: usize, text: impl Into<String>) -> Self {
        Self { label, text: text.into() }
    }
}
