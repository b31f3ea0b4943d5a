// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Maps each known word to a unique integer id and back.
//
// Id assignment:
//   - ids start at 1, in file order
//   - id 0 is never assigned; the encoder uses it for both
//     padding and out-of-vocabulary words
//
// Duplicate policy:
//   The first occurrence of a word keeps its id. Later copies
//   are skipped and do not consume an id, so the ids stay the
//   contiguous range [1, N] over the N distinct words and the
//   two directions are exact inverses of each other.

use std::collections::HashMap;

/// The reserved id for padding and unknown words.
pub const PAD_ID: u32 = 0;

/// Immutable word <-> id mapping.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    word_to_id: HashMap<String, u32>,
    /// `id_to_word[i]` is the word with id `i + 1`
    id_to_word: Vec<String>,
    duplicates: usize,
}

impl Vocabulary {
    /// Build a vocabulary from words in order.
    /// Empty entries are ignored.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();

        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if vocab.word_to_id.contains_key(word) {
                vocab.duplicates += 1;
                continue;
            }
            vocab.id_to_word.push(word.to_string());
            let id = vocab.id_to_word.len() as u32;
            vocab.word_to_id.insert(word.to_string(), id);
        }

        vocab
    }

    /// Number of distinct words (id 0 not included)
    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_word.is_empty()
    }

    /// Highest assigned id, or PAD_ID for an empty vocabulary
    pub fn max_id(&self) -> u32 {
        self.id_to_word.len() as u32
    }

    /// How many duplicate entries were skipped while building
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn id(&self, word: &str) -> Option<u32> {
        self.word_to_id.get(word).copied()
    }

    pub fn word(&self, id: u32) -> Option<&str> {
        if id == PAD_ID {
            return None;
        }
        self.id_to_word.get(id as usize - 1).map(String::as_str)
    }

    /// Look up a word, falling back to PAD_ID when unknown
    pub fn id_or_pad(&self, word: &str) -> u32 {
        self.id(word).unwrap_or(PAD_ID)
    }

    /// Iterate `(id, word)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.id_to_word
            .iter()
            .enumerate()
            .map(|(i, w)| (i as u32 + 1, w.as_str()))
    }
}
