// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load vocabulary            (Layer 6 - infra)
//   Step 2: Load train/dev corpora     (Layer 4 - data)
//   Step 3: Encode into datasets       (Layer 4 - data)
//   Step 4: Save config                (Layer 6 - infra)
//   Step 5: Open the summary writer    (Layer 6 - infra)
//   Step 6: Run training loop          (Layer 5 - ml)
//   Step 7: Close the summary writer   (Layer 6 - infra)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::TextDataset,
    encoder::Encoder,
    loader::CorpusLoader,
};
use crate::domain::{traits::CorpusSource, vocabulary::Vocabulary};
use crate::infra::{
    checkpoint::CheckpointManager,
    summary::SummaryWriter,
    vocab_store::VocabStore,
};
use crate::ml::{
    backend::{CpuTrainBackend, DeviceKind, GpuTrainBackend},
    model::LstmClassifierConfig,
    trainer::{run_training, TrainingReport},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters and paths for a training run.
// Serialisable so it can be saved next to the checkpoints and
// reloaded by the `test` command to rebuild the same model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:     PathBuf,
    pub model_dir:    PathBuf,
    pub log_dir:      PathBuf,
    pub vocab_file:   String,
    pub train_file:   String,
    pub dev_file:     String,
    pub test_file:    String,
    pub input_dim:    usize,
    pub emb_dim:      usize,
    pub hid_dim:      usize,
    pub output_dim:   usize,
    pub num_layers:   usize,
    pub dropout:      f64,
    pub epochs:       usize,
    pub lr:           f64,
    pub log_interval: usize,
    pub batch_size:   usize,
    pub seq_len:      usize,
    pub seed:         u64,
    pub device:       DeviceKind,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:     PathBuf::from("../data"),
            model_dir:    PathBuf::from("../model"),
            log_dir:      PathBuf::from("runs"),
            vocab_file:   "vocab.txt".to_string(),
            train_file:   "train.txt".to_string(),
            dev_file:     "dev.txt".to_string(),
            test_file:    "test.txt".to_string(),
            input_dim:    195158,
            emb_dim:      400,
            hid_dim:      256,
            output_dim:   5,
            num_layers:   3,
            dropout:      0.5,
            epochs:       10,
            lr:           0.0005,
            log_interval: 1,
            batch_size:   50,
            seq_len:      200,
            seed:         42,
            device:       DeviceKind::Gpu,
        }
    }
}

impl TrainConfig {
    pub fn model_config(&self) -> LstmClassifierConfig {
        LstmClassifierConfig::new(
            self.input_dim, self.emb_dim, self.hid_dim,
            self.output_dim, self.num_layers, self.dropout,
        )
    }

    pub fn data_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Reject settings the model or data pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.num_layers == 0 {
            bail!("num_layers must be at least 1");
        }
        if self.seq_len == 0 || self.batch_size == 0 {
            bail!("seq_len and batch_size must be positive");
        }
        if self.output_dim < 2 {
            bail!("output_dim must be at least 2 classes");
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("dropout must be in [0, 1)");
        }
        Ok(())
    }

    /// The embedding table needs a row for every vocabulary id.
    pub fn check_vocabulary(&self, vocab: &Vocabulary) -> Result<()> {
        if vocab.max_id() as usize >= self.input_dim {
            bail!(
                "vocabulary has {} words but input_dim is {}; \
                 input_dim must be at least {}",
                vocab.len(), self.input_dim, vocab.max_id() + 1
            );
        }
        Ok(())
    }
}

/// Load a corpus file and encode it with the vocabulary.
pub fn load_dataset(cfg: &TrainConfig, vocab: &Vocabulary, file: &str) -> Result<TextDataset> {
    let examples = CorpusLoader::new(cfg.data_path(file)).load_all()?;
    let dataset  = TextDataset::encode(&examples, vocab, &Encoder::new(cfg.seq_len));
    dataset.check_labels(cfg.output_dim)?;
    Ok(dataset)
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Vocabulary ────────────────────────────────────────────────
        let vocab = VocabStore::new(cfg.data_path(&cfg.vocab_file)).load()?;
        cfg.check_vocabulary(&vocab)?;

        // ── Steps 2-3: Corpora → datasets ─────────────────────────────────────
        let train_set = load_dataset(cfg, &vocab, &cfg.train_file)?;
        let dev_set   = load_dataset(cfg, &vocab, &cfg.dev_file)?;
        tracing::info!(
            "Datasets: {} train, {} dev",
            train_set.sample_count(),
            dev_set.sample_count()
        );

        // ── Step 4: Save config for the test command ──────────────────────────
        let ckpt = CheckpointManager::new(&cfg.model_dir)?;
        ckpt.save_config(cfg)?;

        // ── Steps 5-7: Train with an explicitly owned summary writer ──────────
        let mut summary = SummaryWriter::create(&cfg.log_dir)?;

        let report = match cfg.device.resolve() {
            DeviceKind::Gpu => run_training::<GpuTrainBackend>(
                cfg, train_set, dev_set, &ckpt, &mut summary, &DeviceKind::gpu_device(),
            )?.1,
            DeviceKind::Cpu => run_training::<CpuTrainBackend>(
                cfg, train_set, dev_set, &ckpt, &mut summary, &DeviceKind::cpu_device(),
            )?.1,
        };

        summary.close()?;
        tracing::info!("Scalar summaries in '{}'", summary.run_dir().display());
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(dir: &std::path::Path) {
        fs::write(dir.join("vocab.txt"), "good\nbad\nfilm\nplot\n").unwrap();
        let corpus = "1\tgood film\n0\tbad plot\n1\tgood plot\n0\tbad film\n";
        fs::write(dir.join("train.txt"), corpus).unwrap();
        fs::write(dir.join("dev.txt"), corpus).unwrap();
        fs::write(dir.join("test.txt"), corpus).unwrap();
    }

    fn tiny_config(root: &std::path::Path) -> TrainConfig {
        TrainConfig {
            data_dir:   root.join("data"),
            model_dir:  root.join("model"),
            log_dir:    root.join("runs"),
            input_dim:  5,
            emb_dim:    4,
            hid_dim:    4,
            output_dim: 2,
            num_layers: 2,
            dropout:    0.0,
            epochs:     2,
            batch_size: 2,
            seq_len:    3,
            device:     DeviceKind::Cpu,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_reference_hyperparameters() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.input_dim, 195158);
        assert_eq!(cfg.emb_dim, 400);
        assert_eq!(cfg.hid_dim, 256);
        assert_eq!(cfg.output_dim, 5);
        assert_eq!(cfg.num_layers, 3);
        assert_eq!(cfg.epochs, 10);
        assert_eq!(cfg.log_interval, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_vocabulary_larger_than_embedding() {
        let cfg   = TrainConfig { input_dim: 3, ..TrainConfig::default() };
        let vocab = Vocabulary::from_words(["a", "b", "c"]);
        assert!(cfg.check_vocabulary(&vocab).is_err());

        let cfg = TrainConfig { input_dim: 4, ..cfg };
        assert!(cfg.check_vocabulary(&vocab).is_ok());
    }

    #[test]
    fn test_rejects_zero_layers() {
        let cfg = TrainConfig { num_layers: 0, ..TrainConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_missing_vocabulary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = tiny_config(dir.path());
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_out_of_range_label_fails() {
        let dir  = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        write_fixture(&data);
        fs::write(data.join("train.txt"), "7\tgood film\n").unwrap();

        assert!(TrainUseCase::new(tiny_config(dir.path())).execute().is_err());
    }

    #[test]
    fn test_trains_on_cpu_end_to_end() {
        let dir  = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        write_fixture(&data);

        let cfg    = tiny_config(dir.path());
        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(report.epochs.len(), 2);
        assert!(!report.checkpoints.is_empty());
        assert!(cfg.model_dir.join("train_config.json").exists());
        assert_eq!(fs::read_dir(&cfg.log_dir).unwrap().count(), 1);
    }
}
