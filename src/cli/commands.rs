// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `test`, and all
// their configurable flags. Every default here equals the
// matching TrainConfig::default() value, so `train` with no
// flags and running the binary with no arguments are the same.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;
use crate::ml::backend::DeviceKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the LSTM classifier, checkpointing on improvement
    Train(TrainArgs),

    /// Measure test-set accuracy of a saved checkpoint
    Test(TestArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding vocab.txt, train.txt, dev.txt and test.txt
    #[arg(long, default_value = "../data")]
    pub data_dir: PathBuf,

    /// Directory for checkpoints, the save ledger and train_config.json
    #[arg(long, default_value = "../model")]
    pub model_dir: PathBuf,

    /// Root directory for per-run scalar summaries
    #[arg(long, default_value = "runs")]
    pub log_dir: PathBuf,

    /// Embedding rows; must exceed the vocabulary size
    #[arg(long, default_value_t = 195158)]
    pub input_dim: usize,

    #[arg(long, default_value_t = 400)]
    pub emb_dim: usize,

    #[arg(long, default_value_t = 256)]
    pub hid_dim: usize,

    /// Number of classes
    #[arg(long, default_value_t = 5)]
    pub output_dim: usize,

    /// Number of stacked LSTM layers
    #[arg(long, default_value_t = 3)]
    pub num_layers: usize,

    /// Dropout between LSTM layers and before the output layer
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.0005)]
    pub lr: f64,

    /// Validate (and maybe checkpoint) every N training batches
    #[arg(long, default_value_t = 1)]
    pub log_interval: usize,

    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    /// Tokens per example after truncation / left padding
    #[arg(long, default_value_t = 200)]
    pub seq_len: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Compute backend, chosen once for the whole run
    #[arg(long, value_enum, default_value_t = DeviceKind::Gpu)]
    pub device: DeviceKind,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:     a.data_dir,
            model_dir:    a.model_dir,
            log_dir:      a.log_dir,
            input_dim:    a.input_dim,
            emb_dim:      a.emb_dim,
            hid_dim:      a.hid_dim,
            output_dim:   a.output_dim,
            num_layers:   a.num_layers,
            dropout:      a.dropout,
            epochs:       a.epochs,
            lr:           a.lr,
            log_interval: a.log_interval,
            batch_size:   a.batch_size,
            seq_len:      a.seq_len,
            seed:         a.seed,
            device:       a.device,
            ..TrainConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Directory the model was trained into
    #[arg(long, default_value = "../model")]
    pub model_dir: PathBuf,

    /// Checkpoint file to evaluate (default: the latest saved one)
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Override the backend recorded in train_config.json
    #[arg(long, value_enum)]
    pub device: Option<DeviceKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["lstm-text-classifier", "train"]);
        let Some(Commands::Train(args)) = cli.command else {
            panic!("expected train");
        };

        let from_cli: TrainConfig = args.into();
        let defaults = TrainConfig::default();
        assert_eq!(
            serde_json::to_value(&from_cli).unwrap(),
            serde_json::to_value(&defaults).unwrap()
        );
    }

    #[test]
    fn test_train_flags_override() {
        let cli = Cli::parse_from([
            "lstm-text-classifier", "train", "--epochs", "2", "--device", "cpu",
        ]);
        let Some(Commands::Train(args)) = cli.command else {
            panic!("expected train");
        };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.epochs, 2);
        assert_eq!(cfg.device, DeviceKind::Cpu);
    }

    #[test]
    fn test_no_arguments_is_allowed() {
        let cli = Cli::parse_from(["lstm-text-classifier"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_test_command_parses_checkpoint() {
        let cli = Cli::parse_from([
            "lstm-text-classifier", "test", "--checkpoint", "m/0101_0000_epoch1.mpk",
        ]);
        let Some(Commands::Test(args)) = cli.command else {
            panic!("expected test");
        };
        assert_eq!(args.checkpoint, Some(PathBuf::from("m/0101_0000_epoch1.mpk")));
        assert!(args.device.is_none());
    }
}
