// ============================================================
// Layer 4 — Text Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<TextSample>
// into tensors on the target device.
//
// How batching works here:
//   Input:  Vec of N TextSamples, each with seq_len token ids
//   Output: TextBatch with inputs [N, seq_len] and labels [N]
//
//   The token ids are flattened then reshaped:
//   [s1_t1, ..., s1_tS, s2_t1, ..., sN_tS] → [N, S]
//
// Every sample is already padded to the same length by the
// Encoder, so no dynamic padding is needed here.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TextSample;

// ─── TextBatch ────────────────────────────────────────────────────────────────
/// A batch ready for the classifier forward pass.
#[derive(Debug, Clone)]
pub struct TextBatch<B: Backend> {
    /// Token ids — shape: [batch_size, seq_len]
    pub inputs: Tensor<B, 2, Int>,

    /// Class indices — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

impl<B: Backend> TextBatch<B> {
    pub fn size(&self) -> usize {
        self.labels.dims()[0]
    }
}

// ─── TextBatcher ──────────────────────────────────────────────────────────────
/// Holds the device so tensors are created on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct TextBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TextBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TextSample, TextBatch<B>> for TextBatcher<B> {
    fn batch(&self, items: Vec<TextSample>) -> TextBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map(|s| s.token_ids.len()).unwrap_or(0);

        // Burn uses i32 for Int tensor data
        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.token_ids.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items
            .iter()
            .map(|s| s.label as i32)
            .collect();

        let inputs = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(
            labels.as_slice(), &self.device
        );

        TextBatch { inputs, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let batcher = TextBatcher::<NdArray>::new(Default::default());
        let items = vec![
            TextSample { token_ids: vec![0, 1, 2], label: 1 },
            TextSample { token_ids: vec![3, 4, 5], label: 0 },
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.inputs.dims(), [2, 3]);
        assert_eq!(batch.size(), 2);

        let labels: Vec<i64> = batch.labels.into_data().iter::<i64>().collect();
        assert_eq!(labels, vec![1, 0]);
    }
}
