//! Input/output helpers.
//!
//! - test-day ingest + validation (`ingest`)
//! - per-day result exports (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
