// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Burn model, training and evaluation code lives here.
//
//   model.rs     — Classifier trait and the LSTM classifier:
//                  embedding → stacked LSTM → linear head
//
//   trainer.rs   — Epoch/batch loop: Adam steps, periodic
//                  validation, checkpointing on improvement,
//                  per-epoch scalar summaries
//
//   evaluator.rs — Validation loss and test-set accuracy
//
//   backend.rs   — GPU (Wgpu) / CPU (NdArray) selection

/// Classifier trait and LSTM model architecture
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Validation loss and test accuracy
pub mod evaluator;

/// Compute backend selection
pub mod backend;
