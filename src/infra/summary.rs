// ============================================================
// Layer 6 — Summary Writer
// ============================================================
// Records scalar summaries (tag, step, value) for a training
// run so the loss curves can be plotted afterwards.
//
// Each run gets its own directory under the log root, named
// after the start time. A run started in the same second as an
// existing one gets a numeric suffix instead of sharing it:
//
//   runs/
//     Oct18_09-42-03/
//       scalars.csv
//     Oct18_09-42-03_1/
//       scalars.csv
//
// scalars.csv:
//   tag,step,value,wall_time
//   loss/train_loss,1,1.532100,1760780523.118
//   loss/validation_loss,1,1.498700,1760780523.118
//   loss/loss_group/train,1,1.532100,1760780523.118
//   loss/loss_group/validation,1,1.498700,1760780523.118
//
// The writer is an explicit handle: the training loop receives
// it as an argument and the caller closes it when the run ends.
// Dropping an unclosed writer still flushes buffered rows.

use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

const SCALARS_FILE: &str = "scalars.csv";

pub struct SummaryWriter {
    run_dir: PathBuf,
    out:     Option<BufWriter<File>>,
}

impl SummaryWriter {
    /// Create a run directory under `log_root` named after the current time.
    pub fn create(log_root: impl AsRef<Path>) -> Result<Self> {
        let root  = log_root.as_ref();
        let stamp = Local::now().format("%b%d_%H-%M-%S").to_string();

        let mut run_dir = root.join(&stamp);
        let mut suffix  = 0;
        while run_dir.exists() {
            suffix += 1;
            run_dir = root.join(format!("{stamp}_{suffix}"));
        }
        Self::in_dir(run_dir)
    }

    /// Write into exactly `run_dir`, creating it if needed.
    /// Fails rather than overwrite an existing `scalars.csv`.
    pub fn in_dir(run_dir: impl Into<PathBuf>) -> Result<Self> {
        let run_dir = run_dir.into();
        fs::create_dir_all(&run_dir)
            .with_context(|| format!("Cannot create log directory '{}'", run_dir.display()))?;

        let path = run_dir.join(SCALARS_FILE);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;

        let mut out = BufWriter::new(file);
        writeln!(out, "tag,step,value,wall_time")?;

        tracing::info!("Writing summaries to '{}'", run_dir.display());
        Ok(Self { run_dir, out: Some(out) })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn add_scalar(&mut self, tag: &str, value: f64, step: usize) -> Result<()> {
        let out = self
            .out
            .as_mut()
            .context("summary writer is already closed")?;

        let wall_time = Local::now().timestamp_millis() as f64 / 1000.0;
        writeln!(out, "{tag},{step},{value:.6},{wall_time:.3}")?;
        Ok(())
    }

    /// Record several related values under `main_tag/<name>`.
    pub fn add_scalars(&mut self, main_tag: &str, values: &[(&str, f64)], step: usize) -> Result<()> {
        for (name, value) in values {
            self.add_scalar(&format!("{main_tag}/{name}"), *value, step)?;
        }
        Ok(())
    }

    /// Flush and release the file. Later writes are errors.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut out) = self.out.take() {
            out.flush()
                .with_context(|| format!("Cannot flush summaries in '{}'", self.run_dir.display()))?;
            tracing::debug!("Closed summary writer for '{}'", self.run_dir.display());
        }
        Ok(())
    }
}

impl Drop for SummaryWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("{e:#}");
        }
    }
}
