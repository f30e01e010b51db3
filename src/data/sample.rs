//! Synthetic test-day generation for the demo pipeline.
//!
//! Records are drawn from a known Wood's curve with Gaussian measurement
//! noise, using a seeded RNG so the same seed always produces the same herd
//! test. Useful for trying the tool without data and for eyeballing how well
//! the fitter recovers known parameters.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{FitConfig, TestDay};
use crate::error::AppError;

/// First synthetic test day; herd tests rarely happen in the first week.
const FIRST_TEST_DAY: f64 = 15.0;

/// Generate `config.sample_count` evenly spaced test days over the lactation.
pub fn generate_sample(config: &FitConfig) -> Result<Vec<TestDay>, AppError> {
    if config.sample_count < 3 {
        return Err(AppError::new(2, "Demo sample count must be at least 3."));
    }
    if !(config.sample_noise_sd.is_finite() && config.sample_noise_sd >= 0.0) {
        return Err(AppError::new(2, "Demo noise standard deviation must be >= 0."));
    }
    let p = config.sample_params;
    if !(p.a.is_finite() && p.a > 0.0 && p.b.is_finite() && p.c.is_finite() && p.c > 0.0) {
        return Err(AppError::new(2, "Demo curve parameters must be finite with a > 0 and c > 0."));
    }
    if !(config.lactation_length.is_finite() && config.lactation_length > FIRST_TEST_DAY) {
        return Err(AppError::new(2, "Lactation length is too short for demo generation."));
    }

    let mut rng = StdRng::seed_from_u64(config.sample_seed);
    let noise = Normal::new(0.0, config.sample_noise_sd)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    let n = config.sample_count;
    let step = (config.lactation_length - FIRST_TEST_DAY) / (n as f64 - 1.0);

    let mut records = Vec::with_capacity(n);
    for i in 0..n {
        let day = (FIRST_TEST_DAY + step * i as f64).round();
        let clean = crate::models::predict(day, &p);
        let measured = (clean + noise.sample(&mut rng)).max(0.0);
        records.push(TestDay { day, yield_kg: measured });
    }

    Ok(records)
}
