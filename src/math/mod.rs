//! Mathematical utilities: least squares, Levenberg-Marquardt, quadrature.

pub mod integrate;
pub mod lm;
pub mod ols;

pub use integrate::*;
pub use lm::*;
pub use ols::*;
