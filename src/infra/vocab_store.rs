// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Reads the flat word list (one token per line) and builds the
// domain Vocabulary from it. A missing file is an error: there
// is no sensible vocabulary to fall back to.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::vocabulary::Vocabulary;

pub struct VocabStore {
    path: PathBuf,
}

impl VocabStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Vocabulary> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read vocabulary '{}'", self.path.display()))?;

        let vocab = Vocabulary::from_words(content.lines().map(|l| l.trim_end_matches('\r')));

        if vocab.is_empty() {
            tracing::warn!("Vocabulary '{}' is empty; every token will encode as 0", self.path.display());
        }
        if vocab.duplicates() > 0 {
            tracing::warn!(
                "Skipped {} duplicate entries in '{}' (first occurrence kept)",
                vocab.duplicates(),
                self.path.display()
            );
        }
        tracing::info!("Vocabulary loaded: {} words", vocab.len());
        Ok(vocab)
    }
}
