// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from corpus files on disk to tensor batches.
//
//   train.txt / dev.txt / test.txt
//       │
//       ▼
//   CorpusLoader      → parses "<label>\t<text>" lines
//       │
//       ▼
//   Encoder           → text to fixed-length vocabulary ids
//       │
//       ▼
//   TextDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   TextBatcher       → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.

/// Reads line-oriented labelled corpus files
pub mod loader;

/// Maps text to padded vocabulary id sequences
pub mod encoder;

/// Implements Burn's Dataset trait for encoded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
