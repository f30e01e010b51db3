//! Data sources.
//!
//! Real runs ingest CSV/pasted records via `io::ingest`; the `sample` module
//! generates a reproducible synthetic lactation for `lact demo`.

pub mod sample;

pub use sample::*;
