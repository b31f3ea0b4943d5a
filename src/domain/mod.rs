// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the classifier: the vocabulary and a labelled corpus line.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Keeping this layer free of tensors means the vocabulary and
// corpus rules can be unit tested without any backend.

// Word <-> id mapping built from the flat word list
pub mod vocabulary;

// One (label, text) line of a corpus file
pub mod labeled_text;

// Core abstractions (traits) that other layers implement
pub mod traits;
