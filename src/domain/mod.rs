//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input records (`TestDay`) and dataset statistics
//! - fitted model parameters and quality (`WoodsParams`, `FitQuality`)
//! - derived indicators (`Kpis`) and their conventions (`PersistencyKind`)
//! - run configuration (`FitConfig`, `ParamBounds`) and the curve JSON schema

pub mod types;

pub use types::*;
