// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// All business logic is delegated to Layer 2 (application).
//
//   (no arguments) — train with the built-in hyperparameters
//   `train`        — train, with any hyperparameter overridden
//   `test`         — accuracy of a saved checkpoint on test.txt

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TestArgs};

use crate::application::train_use_case::TrainConfig;

#[derive(Parser, Debug)]
#[command(
    name = "lstm-text-classifier",
    version,
    about = "Train an LSTM text classifier, then measure its test accuracy."
)]
pub struct Cli {
    /// The subcommand to run; training with defaults when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Dispatch to the matching use case. This layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(Commands::Train(args)) => run_train(args.into()),
            Some(Commands::Test(args))  => run_test(args),
            None                        => run_train(TrainConfig::default()),
        }
    }
}

fn run_train(config: TrainConfig) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on corpus in: {}", config.data_dir.display());

    let report = TrainUseCase::new(config).execute()?;

    println!(
        "Training complete. {} checkpoints saved, best train loss {:.4}.",
        report.checkpoints.len(),
        report.best_train_loss
    );
    Ok(())
}

fn run_test(args: TestArgs) -> Result<()> {
    use crate::application::test_use_case::TestUseCase;

    let accuracy = TestUseCase::new(args.model_dir, args.checkpoint, args.device).execute()?;

    println!("Accuracy: {:.2}", accuracy.percent());
    Ok(())
}
