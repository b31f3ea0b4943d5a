// ============================================================
// Layer 4 — Text Encoder
// ============================================================
// Turns raw example text into a fixed-length sequence of
// vocabulary ids that the model can embed.
//
// Encoding steps (applied in order):
//   1. Replace tabs, non-breaking/zero-width spaces and other
//      control characters with a plain space
//   2. Split on whitespace
//   3. Look each token up in the vocabulary, unknown → 0
//   4. Keep at most `seq_len` tokens (the first ones)
//   5. Left-pad with 0 up to `seq_len`
//
// Why pad on the LEFT?
//   The classifier reads the LSTM's final hidden state. With
//   left padding the last time step is always a real token,
//   so padding never sits between the text and the output.
//
//   seq_len = 6, text = "a b c"  →  [0, 0, 0, id(a), id(b), id(c)]

use crate::domain::vocabulary::{Vocabulary, PAD_ID};

pub struct Encoder {
    seq_len: usize,
}

impl Encoder {
    pub fn new(seq_len: usize) -> Self {
        Self { seq_len }
    }

    /// Map every character the tokenizer should treat as a gap to ' '.
    pub fn normalize(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect()
    }

    /// Encode one text into exactly `seq_len` ids.
    pub fn encode(&self, vocab: &Vocabulary, text: &str) -> Vec<u32> {
        let normalized = Self::normalize(text);
        let ids: Vec<u32> = normalized
            .split_whitespace()
            .take(self.seq_len)
            .map(|tok| vocab.id_or_pad(tok))
            .collect();

        let mut out = vec![PAD_ID; self.seq_len - ids.len()];
        out.extend(ids);
        out
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::from_words(["a", "b", "c", "d"])
    }

    #[test]
    fn test_left_pads_short_text() {
        let e = Encoder::new(5);
        assert_eq!(e.encode(&vocab(), "a b"), vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_truncates_long_text() {
        let e = Encoder::new(2);
        assert_eq!(e.encode(&vocab(), "a b c d"), vec![1, 2]);
    }

    #[test]
    fn test_unknown_words_become_pad() {
        let e = Encoder::new(3);
        assert_eq!(e.encode(&vocab(), "a zebra c"), vec![1, 0, 3]);
    }

    #[test]
    fn test_control_chars_split_tokens() {
        let e = Encoder::new(3);
        assert_eq!(e.encode(&vocab(), "a\u{00A0}b\x01c"), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_text_is_all_padding() {
        let e = Encoder::new(4);
        assert_eq!(e.encode(&vocab(), ""), vec![0; 4]);
    }
}
