// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Validation loss and test accuracy.
//
// Both routines take the INFERENCE view of a model, i.e. what
// `model.valid()` returns: a module on the inner backend with
// no gradient tracking and dropout switched off. Nothing here
// can touch the training model's parameters.
//
// Both also take any iterator of batches, so the caller can
// hand in `loader.iter()` or a plain Vec in tests.

use anyhow::Result;
use burn::{data::dataloader::DataLoaderBuilder, prelude::*};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{TextBatch, TextBatcher},
    dataset::TextDataset,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Classifier, LstmClassifier};

/// Mean cross-entropy over every batch of the dev set.
/// Returns NaN when the set is empty.
pub fn validate<B, M, I>(model: &M, batches: I) -> f64
where
    B: Backend,
    M: Classifier<B>,
    I: IntoIterator<Item = TextBatch<B>>,
{
    tracing::debug!("Processing validation...");

    let mut loss_sum = 0.0f64;
    let mut count    = 0usize;

    for batch in batches {
        let (loss, _) = model.forward_loss(batch.inputs, batch.labels);
        loss_sum += loss.into_scalar().elem::<f64>();
        count    += 1;
    }

    if count > 0 { loss_sum / count as f64 } else { f64::NAN }
}

/// Result of one pass over the test set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accuracy {
    pub correct:  usize,
    pub examples: usize,
    pub batches:  usize,
}

impl Accuracy {
    /// Percentage of correctly classified examples, in [0, 100].
    /// The divisor is the example count, not the batch count.
    pub fn percent(&self) -> f64 {
        if self.examples == 0 {
            return 0.0;
        }
        self.correct as f64 / self.examples as f64 * 100.0
    }
}

/// Count predictions (argmax over logits) that equal the label.
pub fn test_accuracy<B, M, I>(model: &M, batches: I) -> Accuracy
where
    B: Backend,
    M: Classifier<B>,
    I: IntoIterator<Item = TextBatch<B>>,
{
    let mut acc = Accuracy { correct: 0, examples: 0, batches: 0 };

    for batch in batches {
        let size   = batch.size();
        let logits = model.forward(batch.inputs);

        // argmax(1) returns shape [batch, 1] — flatten to [batch]
        // before comparing with labels which is [batch]
        let predicted = logits.argmax(1).flatten::<1>(0, 1);

        acc.examples += size;
        acc.batches  += 1;

        let correct: i64 = predicted
            .equal(batch.labels)
            .int().sum().into_scalar().elem::<i64>();
        acc.correct += correct as usize;
    }

    acc
}

/// Rebuild the model described by `cfg`, load `checkpoint` into it and
/// measure accuracy over `test_set`.
pub fn run_test<B: Backend>(
    cfg:        &TrainConfig,
    checkpoint: &Path,
    test_set:   TextDataset,
    ckpt:       &CheckpointManager,
    device:     &B::Device,
) -> Result<Accuracy> {
    let model: LstmClassifier<B> = cfg.model_config().init(device);
    let model = ckpt.load_model(model, checkpoint, device)?;

    let test_loader = DataLoaderBuilder::new(TextBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_set);

    let accuracy = test_accuracy(&model, test_loader.iter());
    tracing::info!("Accuracy: {:.2}", accuracy.percent());
    Ok(accuracy)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    /// Predicts the class equal to the last token id of each row.
    struct EchoClassifier {
        num_classes: usize,
    }

    impl Classifier<TestBackend> for EchoClassifier {
        fn forward(&self, inputs: Tensor<TestBackend, 2, Int>) -> Tensor<TestBackend, 2> {
            let [batch_size, seq_len] = inputs.dims();
            let device = inputs.device();
            let ids: Vec<i64> = inputs.into_data().iter::<i64>().collect();

            let mut logits = vec![0.0f32; batch_size * self.num_classes];
            for row in 0..batch_size {
                let class = ids[row * seq_len + seq_len - 1] as usize;
                logits[row * self.num_classes + class] = 1.0;
            }
            Tensor::<TestBackend, 1>::from_floats(logits.as_slice(), &device)
                .reshape([batch_size, self.num_classes])
        }
    }

    fn batch(tokens: &[i32], labels: &[i32]) -> TextBatch<TestBackend> {
        let device = Default::default();
        let n = labels.len();
        TextBatch {
            inputs: Tensor::<TestBackend, 1, Int>::from_ints(tokens, &device)
                .reshape([n, tokens.len() / n]),
            labels: Tensor::<TestBackend, 1, Int>::from_ints(labels, &device),
        }
    }

    #[test]
    fn test_perfect_predictions_give_100() {
        let model = EchoClassifier { num_classes: 4 };
        // K = 4 batches of size 1, every prediction correct
        let batches = vec![
            batch(&[0, 1], &[1]),
            batch(&[0, 3], &[3]),
            batch(&[0, 0], &[0]),
            batch(&[0, 2], &[2]),
        ];

        let acc = test_accuracy(&model, batches);
        assert_eq!(acc.correct, 4);
        assert_eq!(acc.batches, 4);
        assert_eq!(acc.percent(), 100.0);
    }

    #[test]
    fn test_divides_by_examples_not_batches() {
        let model = EchoClassifier { num_classes: 4 };
        // One batch of four, two right and two wrong
        let batches = vec![batch(&[1, 2, 3, 0], &[1, 0, 3, 1])];

        let acc = test_accuracy(&model, batches);
        assert_eq!(acc.correct, 2);
        assert_eq!(acc.examples, 4);
        assert_eq!(acc.batches, 1);
        assert_eq!(acc.percent(), 50.0);
    }

    #[test]
    fn test_accuracy_is_bounded() {
        let model = EchoClassifier { num_classes: 3 };
        let batches = vec![batch(&[2, 2], &[0, 1]), batch(&[1], &[1])];

        let p = test_accuracy(&model, batches).percent();
        assert!((0.0..=100.0).contains(&p));
        assert_eq!(test_accuracy(&model, Vec::<TextBatch<TestBackend>>::new()).percent(), 0.0);
    }

    #[test]
    fn test_validation_of_empty_set_is_nan() {
        let model = EchoClassifier { num_classes: 2 };
        assert!(validate(&model, Vec::<TextBatch<TestBackend>>::new()).is_nan());
    }

    #[test]
    fn test_validation_mean_loss() {
        let model = EchoClassifier { num_classes: 2 };
        // one-hot logits [1, 0] against label 0: ln(1 + e^-1)
        let expected = (1.0f64 + (-1.0f64).exp()).ln();
        let loss = validate(&model, vec![batch(&[0], &[0]), batch(&[1], &[1])]);
        assert!((loss - expected).abs() < 1e-5);
    }
}
