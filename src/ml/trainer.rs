// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + periodic validation using Burn's DataLoader and Adam.
//
// Per batch:
//   forward → cross-entropy → backward → one Adam step
//
// Every `log_interval` batches:
//   full validation pass over the dev set, progress log line,
//   and a checkpoint if this step's TRAINING loss is <= the
//   best training loss seen so far in the run.
//
// Per epoch:
//   mean training loss and mean of that epoch's validation
//   losses go to the summary writer.
//
// Key Burn points:
//   - Training runs on an AutodiffBackend for gradients
//   - model.valid() returns the model on the inner backend,
//     with dropout off; validation batches must use it too
//   - Each backward() produces a fresh gradient set, so there
//     is nothing to zero between steps

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{TextBatch, TextBatcher},
    dataset::TextDataset,
};
use crate::infra::{
    checkpoint::{CheckpointManager, CheckpointRecord},
    summary::SummaryWriter,
};
use crate::ml::evaluator::validate;
use crate::ml::model::{Classifier, LstmClassifier};

/// The knobs the loop itself needs.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub epochs:       usize,
    pub lr:           f64,
    pub log_interval: usize,
}

impl From<&TrainConfig> for LoopSettings {
    fn from(cfg: &TrainConfig) -> Self {
        Self {
            epochs:       cfg.epochs,
            lr:           cfg.lr,
            log_interval: cfg.log_interval.max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochSummary {
    pub epoch:      usize,
    pub steps:      usize,
    pub train_loss: f64,
    pub val_loss:   f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs:          Vec<EpochSummary>,
    /// In save order
    pub checkpoints:     Vec<CheckpointRecord>,
    pub best_train_loss: f64,
}

/// Build the LSTM classifier and data loaders, then train.
pub fn run_training<B: AutodiffBackend>(
    cfg:       &TrainConfig,
    train_set: TextDataset,
    dev_set:   TextDataset,
    ckpt:      &CheckpointManager,
    summary:   &mut SummaryWriter,
    device:    &B::Device,
) -> Result<(LstmClassifier<B>, TrainingReport)> {
    B::seed(cfg.seed);

    let model: LstmClassifier<B> = cfg.model_config().init(device);
    tracing::info!(
        "Model ready: {} LSTM layers, emb_dim={}, hid_dim={}, {} classes",
        cfg.num_layers, cfg.emb_dim, cfg.hid_dim, cfg.output_dim
    );

    let optim = AdamConfig::new().with_epsilon(1e-8).init();

    let train_loader = DataLoaderBuilder::new(TextBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_set);

    // Validation uses the inner backend: no autodiff overhead
    let dev_loader = DataLoaderBuilder::new(TextBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(dev_set);

    train_loop(
        model,
        optim,
        &LoopSettings::from(cfg),
        || train_loader.iter(),
        || dev_loader.iter(),
        ckpt,
        summary,
    )
}

/// One optimizer step on one batch. Returns the updated model and
/// the loss measured before the update.
pub fn train_step<B, M, O>(model: M, optim: &mut O, batch: TextBatch<B>, lr: f64) -> (M, f64)
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Classifier<B>,
    O: Optimizer<M, B>,
{
    let (loss, _) = model.forward_loss(batch.inputs, batch.labels);
    let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    (optim.step(lr, model, grads), loss_val)
}

/// The epoch/batch state machine, generic over model, optimizer and
/// batch sources so it can run on any classifier.
pub fn train_loop<B, M, O, T, D>(
    mut model:     M,
    mut optim:     O,
    settings:      &LoopSettings,
    train_batches: impl Fn() -> T,
    dev_batches:   impl Fn() -> D,
    ckpt:          &CheckpointManager,
    summary:       &mut SummaryWriter,
) -> Result<(M, TrainingReport)>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Classifier<B>,
    M::InnerModule: Classifier<B::InnerBackend>,
    O: Optimizer<M, B>,
    T: IntoIterator<Item = TextBatch<B>>,
    D: IntoIterator<Item = TextBatch<B::InnerBackend>>,
{
    tracing::info!("Train starts.");

    let mut best_loss   = f64::MAX;
    let mut global_step = 0usize;
    let mut report = TrainingReport {
        epochs:          Vec::with_capacity(settings.epochs),
        checkpoints:     Vec::new(),
        best_train_loss: f64::MAX,
    };

    for epoch in 1..=settings.epochs {
        let mut epoch_train_loss = Vec::new();
        let mut epoch_valid_loss = Vec::new();
        let mut counter = 0usize;

        for batch in train_batches() {
            counter     += 1;
            global_step += 1;

            let (next, cur_loss) = train_step(model, &mut optim, batch, settings.lr);
            model = next;
            epoch_train_loss.push(cur_loss);

            if counter % settings.log_interval != 0 {
                continue;
            }

            let val_loss = validate(&model.valid(), dev_batches());
            epoch_valid_loss.push(val_loss);

            tracing::info!("epoch: {epoch}, loss: {cur_loss:.6}, val_loss: {val_loss:.6}");

            if cur_loss <= best_loss {
                best_loss = cur_loss;
                let record = ckpt.save_model::<B, M>(&model, epoch, global_step, cur_loss)?;
                report.checkpoints.push(record);
            }
        }

        let train_mean = mean(&epoch_train_loss);
        let valid_mean = mean(&epoch_valid_loss);

        summary.add_scalar("loss/train_loss", train_mean, epoch)?;
        summary.add_scalar("loss/validation_loss", valid_mean, epoch)?;
        summary.add_scalars(
            "loss/loss_group",
            &[("train", train_mean), ("validation", valid_mean)],
            epoch,
        )?;

        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4}",
            epoch, settings.epochs, train_mean, valid_mean,
        );

        report.epochs.push(EpochSummary {
            epoch,
            steps:      counter,
            train_loss: train_mean,
            val_loss:   valid_mean,
        });
    }

    report.best_train_loss = best_loss;
    tracing::info!(
        "Training complete! {} checkpoints saved, best train loss {:.6}",
        report.checkpoints.len(), best_loss
    );
    Ok((model, report))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
