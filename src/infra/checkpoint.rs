// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's named MessagePack
// file recorder at full precision.
//
// What gets written to the model directory:
//   1. Model weights — one file per improving training step,
//      named <MMDD_HHMM>_epoch<N>.<ext>
//   2. checkpoints.jsonl — one line per save, in save order,
//      with the file name, epoch, step and training loss
//   3. train_config.json — the hyperparameters of the run
//
// Checkpoints are never deleted or rotated. Two saves in the
// same minute and epoch share a file name, so the later one
// replaces the earlier weights; the ledger keeps both lines.
//
// File naming convention:
//   model/
//     1018_0942_epoch1.mpk      ← weights
//     1018_0943_epoch1.mpk
//     1018_1010_epoch2.mpk
//     checkpoints.jsonl         ← save ledger
//     train_config.json         ← model hyperparameters
//
// CheckpointRecorder:
//   - Serialises parameters to MessagePack as f32, so a loaded
//     checkpoint holds exactly the weights that were saved
//   - Deserialising into a module of a different structure fails

use anyhow::{bail, Context, Result};
use burn::{
    module::{ModuleVisitor, ParamId},
    prelude::*,
    record::{FileRecorder, FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;

type CheckpointRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

const LEDGER_FILE: &str = "checkpoints.jsonl";
const CONFIG_FILE: &str = "train_config.json";

/// One ledger line: what was saved, when, and at what loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    /// Full path of the weights file, extension included
    pub path:       PathBuf,
    pub epoch:      usize,
    /// Global optimizer step, counted from 1 across epochs
    pub step:       usize,
    pub train_loss: f64,
    pub saved_at:   String,
}

/// Manages saving and loading of model checkpoints.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create model directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// `<MMDD_HHMM>_epoch<N>` without extension (the recorder adds it).
    pub fn checkpoint_stem(now: &DateTime<Local>, epoch: usize) -> String {
        format!("{}_epoch{}", now.format("%m%d_%H%M"), epoch)
    }

    /// Save model weights and append a ledger line.
    pub fn save_model<B: Backend, M: Module<B>>(
        &self,
        model:      &M,
        epoch:      usize,
        step:       usize,
        train_loss: f64,
    ) -> Result<CheckpointRecord> {
        let now  = Local::now();
        let stem = self.dir.join(Self::checkpoint_stem(&now, epoch));

        let recorder = CheckpointRecorder::new();
        Recorder::<B>::record(&recorder, model.clone().into_record(), stem.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", stem.display()))?;

        let path = stem.with_extension(<CheckpointRecorder as FileRecorder<B>>::file_extension());
        let record = CheckpointRecord {
            path,
            epoch,
            step,
            train_loss,
            saved_at: now.to_rfc3339(),
        };
        self.append_ledger(&record)?;

        tracing::debug!(
            "Saved checkpoint '{}' (epoch {}, loss {:.6})",
            record.path.display(), epoch, train_loss
        );
        Ok(record)
    }

    /// Load weights from `path` into `model`.
    ///
    /// The model passed in must have the architecture the checkpoint
    /// was written from; any difference in parameter shapes is an error.
    pub fn load_model<B: Backend, M: Module<B>>(
        &self,
        model:  M,
        path:   &Path,
        device: &B::Device,
    ) -> Result<M> {
        // The recorder appends its own extension.
        let record: M::Record = Recorder::<B>::load(&CheckpointRecorder::new(), path.with_extension(""), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        let expected = param_shapes(&model);
        let loaded   = model.load_record(record);
        let actual   = param_shapes(&loaded);

        if expected != actual {
            bail!(
                "Checkpoint '{}' does not match the model architecture \
                 ({} parameter tensors expected, {} found, or shapes differ)",
                path.display(),
                expected.len(),
                actual.len(),
            );
        }

        tracing::info!("Loaded checkpoint '{}'", path.display());
        Ok(loaded)
    }

    /// Every ledger line, in save order.
    pub fn history(&self) -> Result<Vec<CheckpointRecord>> {
        let path = self.dir.join(LEDGER_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).with_context(|| format!("Bad ledger line: {l}")))
            .collect()
    }

    /// The most recently saved checkpoint, if any.
    pub fn latest(&self) -> Result<Option<CheckpointRecord>> {
        Ok(self.history()?.pop())
    }

    /// Save the training configuration so a test run can rebuild the model.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'test'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }

    fn append_ledger(&self, record: &CheckpointRecord) -> Result<()> {
        let path = self.dir.join(LEDGER_FILE);
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;

        writeln!(f, "{}", serde_json::to_string(record)?)?;
        Ok(())
    }
}

// ─── Shape collection ─────────────────────────────────────────────────────────
struct ShapeCollector {
    shapes: Vec<Vec<usize>>,
}

impl<B: Backend> ModuleVisitor<B> for ShapeCollector {
    fn visit_float<const D: usize>(&mut self, _id: ParamId, tensor: &Tensor<B, D>) {
        self.shapes.push(tensor.dims().to_vec());
    }
}

/// Shapes of every float parameter, in visiting order.
fn param_shapes<B: Backend, M: Module<B>>(model: &M) -> Vec<Vec<usize>> {
    let mut collector = ShapeCollector { shapes: Vec::new() };
    model.visit(&mut collector);
    collector.shapes
}
