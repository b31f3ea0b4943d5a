// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to its collaborators through
// these traits so that a corpus can come from a file, from
// memory in a test, or from anywhere else.

use anyhow::Result;
use crate::domain::labeled_text::LabeledText;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce a labelled corpus.
///
/// Implementations:
///   - CorpusLoader → reads a line-oriented `<label>\t<text>` file
pub trait CorpusSource {
    /// Load every example from this source, in order.
    fn load_all(&self) -> Result<Vec<LabeledText>>;
}
