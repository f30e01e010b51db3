//! Wood's incomplete gamma lactation model.
//!
//! The model is implemented as small, pure functions so that fitting/KPI code
//! can stay generic.

pub mod woods;

pub use woods::*;
