// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads a line-oriented corpus file (train.txt, dev.txt or
// test.txt) into a Vec of LabeledText.
//
// File format, one example per line:
//
//   <label><TAB><text>
//
//   0	a dull and lifeless retread
//   4	one of the best films of the year
//
// Rules:
//   - blank lines are skipped
//   - a trailing '\r' (Windows line endings) is stripped
//   - the label must be a non-negative integer
//   - anything else is an error naming the file and line,
//     training on a half-parsed corpus is never useful

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::labeled_text::LabeledText;
use crate::domain::traits::CorpusSource;

/// Loads one corpus file from disk.
/// Implements the CorpusSource trait from Layer 3.
pub struct CorpusLoader {
    path: PathBuf,
}

impl CorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for CorpusLoader {
    fn load_all(&self) -> Result<Vec<LabeledText>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read corpus file '{}'", self.path.display()))?;

        let examples = parse_corpus(&content)
            .with_context(|| format!("Malformed corpus file '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} examples from '{}'",
            examples.len(),
            self.path.display()
        );
        Ok(examples)
    }
}

/// Parse the full text of a corpus file.
pub fn parse_corpus(content: &str) -> Result<Vec<LabeledText>> {
    let mut examples = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let line_no = idx + 1;
        let Some((label, text)) = line.split_once('\t') else {
            bail!("line {line_no}: expected '<label>\\t<text>'");
        };

        let label: usize = label
            .trim()
            .parse()
            .with_context(|| format!("line {line_no}: invalid label '{}'", label.trim()))?;

        examples.push(LabeledText::new(label, text));
    }

    Ok(examples)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parses_labels_and_text() {
        let parsed = parse_corpus("0\tbad movie\n4\tgreat movie\n").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], LabeledText::new(0, "bad movie"));
        assert_eq!(parsed[1], LabeledText::new(4, "great movie"));
    }

    #[test]
    fn test_skips_blank_lines_and_crlf() {
        let parsed = parse_corpus("1\tfine\r\n\r\n\n2\tok\r\n").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].text, "fine");
        assert_eq!(parsed[1].label, 2);
    }

    #[test]
    fn test_missing_tab_is_an_error() {
        let err = parse_corpus("0\tok\nno label here\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_bad_label_is_an_error() {
        assert!(parse_corpus("x\ttext\n").is_err());
        assert!(parse_corpus("-1\ttext\n").is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CorpusLoader::new(dir.path().join("absent.txt"));
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "3\tsomething good").unwrap();

        let loaded = CorpusLoader::new(&path).load_all().unwrap();
        assert_eq!(loaded, vec![LabeledText::new(3, "something good")]);
    }
}
