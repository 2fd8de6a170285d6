//! Synthetic step-count day generation.
//!
//! Produces a plausible sparse day (06:00..22:00) so the CLI and TUI can be
//! tried without typing a whole day in. Deterministic for a given seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{DAY_END_HOUR, DAY_START_HOUR, Domain, Sample, Series, TimeKey};
use crate::error::AppError;
use crate::interp::interpolate;

/// Typical hourly step counts: morning commute, lunch, evening walk.
const PROFILE_KNOTS: [(i32, f64); 8] = [
    (6, 400.0),
    (8, 1500.0),
    (10, 600.0),
    (12, 1100.0),
    (14, 500.0),
    (17, 1700.0),
    (19, 900.0),
    (22, 150.0),
];

/// Log-normal noise level applied to the profile.
const NOISE_SIGMA: f64 = 0.25;

#[derive(Debug, Clone)]
pub struct DemoDay {
    /// The sparse series a user would have entered.
    pub series: Series,
}

/// Generate a sparse day where each hour is dropped with `missing_prob`.
///
/// At least two hours are always kept so the day can be interpolated.
pub fn generate_demo_day(seed: u64, missing_prob: f64) -> Result<DemoDay, AppError> {
    if !(0.0..1.0).contains(&missing_prob) {
        return Err(AppError::new(2, "Missing probability must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, NOISE_SIGMA)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let knots = Series::new(
        PROFILE_KNOTS
            .iter()
            .map(|&(h, v)| Sample::known(h, v))
            .collect(),
    )?;
    let profile = interpolate(&knots, &Domain::day())?;

    let noisy: Vec<(TimeKey, f64)> = profile
        .points
        .iter()
        .map(|p| {
            let z: f64 = normal.sample(&mut rng);
            (p.key, (p.value * z.exp()).round())
        })
        .collect();

    let mut samples: Vec<Sample> = noisy
        .iter()
        .map(|&(key, v)| {
            if rng.gen_bool(missing_prob) {
                Sample::missing(key)
            } else {
                Sample::known(key, v)
            }
        })
        .collect();

    if samples.iter().filter(|s| s.is_known()).count() < 2 {
        for (sample, &(_, v)) in samples.iter_mut().zip(&noisy) {
            if sample.key == TimeKey(DAY_START_HOUR) || sample.key == TimeKey(DAY_END_HOUR) {
                sample.value = Some(v);
            }
        }
    }

    tracing::debug!(seed, known = samples.iter().filter(|s| s.is_known()).count(), "generated demo day");

    Ok(DemoDay {
        series: Series::new(samples)?,
    })
}
