// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   checkpoint.rs  — Saving and loading model weights with
//                    Burn's full-precision MessagePack
//                    recorder, the append-only
//                    save ledger, and the run's TrainConfig
//                    as JSON so a test run can rebuild the model.
//
//   summary.rs     — Scalar summaries (loss curves) written to
//                    a run-specific log directory.
//
//   vocab_store.rs — Reads the flat word list into the domain
//                    Vocabulary.

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Scalar summary writer for loss curves
pub mod summary;

/// Vocabulary file loading
pub mod vocab_store;
