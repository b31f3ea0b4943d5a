// ============================================================
// Layer 2 — TestUseCase
// ============================================================
// Measures classification accuracy of a saved checkpoint on the
// held-out test corpus.
//
//   Step 1: Load the run's TrainConfig   (Layer 6 - infra)
//   Step 2: Pick the checkpoint          (explicit, or the latest)
//   Step 3: Load vocabulary + test set   (Layers 4 and 6)
//   Step 4: Rebuild model, load weights  (Layers 5 and 6)
//   Step 5: Count correct predictions    (Layer 5 - ml)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::train_use_case::load_dataset;
use crate::infra::{checkpoint::CheckpointManager, vocab_store::VocabStore};
use crate::ml::{
    backend::{CpuBackend, DeviceKind, GpuBackend},
    evaluator::{run_test, Accuracy},
};

pub struct TestUseCase {
    model_dir:  PathBuf,
    checkpoint: Option<PathBuf>,
    device:     Option<DeviceKind>,
}

impl TestUseCase {
    pub fn new(
        model_dir:  impl Into<PathBuf>,
        checkpoint: Option<PathBuf>,
        device:     Option<DeviceKind>,
    ) -> Self {
        Self { model_dir: model_dir.into(), checkpoint, device }
    }

    pub fn execute(&self) -> Result<Accuracy> {
        // ── Step 1: Configuration of the training run ─────────────────────────
        let ckpt = CheckpointManager::new(&self.model_dir)?;
        let cfg  = ckpt.load_config()?;
        cfg.validate()?;

        // ── Step 2: Which weights to evaluate ─────────────────────────────────
        let path = match &self.checkpoint {
            Some(path) => path.clone(),
            None => ckpt
                .latest()?
                .map(|r| r.path)
                .with_context(|| {
                    format!("No checkpoint recorded in '{}'", self.model_dir.display())
                })?,
        };

        // ── Step 3: Vocabulary and test corpus ────────────────────────────────
        let vocab = VocabStore::new(cfg.data_path(&cfg.vocab_file)).load()?;
        cfg.check_vocabulary(&vocab)?;
        let test_set = load_dataset(&cfg, &vocab, &cfg.test_file)?;

        // ── Steps 4-5: Evaluate on the chosen backend ─────────────────────────
        let accuracy = match self.device.unwrap_or(cfg.device).resolve() {
            DeviceKind::Gpu => run_test::<GpuBackend>(
                &cfg, &path, test_set, &ckpt, &DeviceKind::gpu_device(),
            )?,
            DeviceKind::Cpu => run_test::<CpuBackend>(
                &cfg, &path, test_set, &ckpt, &DeviceKind::cpu_device(),
            )?,
        };

        tracing::info!(
            "{} of {} test examples correct over {} batches",
            accuracy.correct, accuracy.examples, accuracy.batches
        );
        Ok(accuracy)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use std::fs;

    fn fixture(root: &std::path::Path) -> TrainConfig {
        let data = root.join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("vocab.txt"), "good\nbad\nfilm\n").unwrap();
        let corpus = "1\tgood film\n0\tbad film\n1\tgood\n";
        for f in ["train.txt", "dev.txt", "test.txt"] {
            fs::write(data.join(f), corpus).unwrap();
        }

        TrainConfig {
            data_dir:   data,
            model_dir:  root.join("model"),
            log_dir:    root.join("runs"),
            input_dim:  4,
            emb_dim:    3,
            hid_dim:    3,
            output_dim: 2,
            num_layers: 1,
            dropout:    0.0,
            epochs:     1,
            batch_size: 1,
            seq_len:    2,
            device:     DeviceKind::Cpu,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_evaluates_latest_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());
        TrainUseCase::new(cfg.clone()).execute().unwrap();

        let acc = TestUseCase::new(&cfg.model_dir, None, None).execute().unwrap();
        assert_eq!(acc.examples, 3);
        assert_eq!(acc.batches, 3);
        assert!((0.0..=100.0).contains(&acc.percent()));
    }

    #[test]
    fn test_invalid_saved_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());
        TrainUseCase::new(cfg.clone()).execute().unwrap();

        let ckpt = CheckpointManager::new(&cfg.model_dir).unwrap();
        ckpt.save_config(&TrainConfig { num_layers: 0, ..cfg.clone() }).unwrap();

        let err = TestUseCase::new(&cfg.model_dir, None, None).execute().unwrap_err();
        assert!(err.to_string().contains("num_layers"));
    }

    #[test]
    fn test_without_training_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());
        assert!(TestUseCase::new(&cfg.model_dir, None, None).execute().is_err());
    }
}
