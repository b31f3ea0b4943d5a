use anyhow::{bail, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::encoder::Encoder;
use crate::domain::{labeled_text::LabeledText, vocabulary::Vocabulary};

/// One encoded example: a left-padded id sequence and its class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSample {
    pub token_ids: Vec<u32>,
    pub label:     usize,
}

pub struct TextDataset {
    samples: Vec<TextSample>,
}

impl TextDataset {
    pub fn new(samples: Vec<TextSample>) -> Self { Self { samples } }

    /// Encode a parsed corpus with the given vocabulary.
    pub fn encode(examples: &[LabeledText], vocab: &Vocabulary, encoder: &Encoder) -> Self {
        let samples = examples
            .iter()
            .map(|ex| TextSample {
                token_ids: encoder.encode(vocab, &ex.text),
                label:     ex.label,
            })
            .collect();
        Self { samples }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// Every label must index a model output.
    pub fn check_labels(&self, num_classes: usize) -> Result<()> {
        if let Some(bad) = self.samples.iter().find(|s| s.label >= num_classes) {
            bail!("label {} is out of range for {} classes", bad.label, num_classes);
        }
        Ok(())
    }
}

impl Dataset<TextSample> for TextDataset {
    fn get(&self, index: usize) -> Option<TextSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
