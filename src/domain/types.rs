//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built fresh from user input for every computation
//! - exported to JSON/CSV
//! - handed to the report, plot and TUI layers without conversion

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::InterpError;

/// Default calories burned per step (kcal).
pub const DEFAULT_KCAL_PER_STEP: f64 = 0.04;

/// First hour offered by the per-hour form.
pub const DAY_START_HOUR: i32 = 6;

/// Last hour offered by the per-hour form.
pub const DAY_END_HOUR: i32 = 22;

/// An ordered, discrete time key (an hour index for day series).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeKey(pub i32);

impl TimeKey {
    pub fn hour(self) -> Option<u32> {
        (0..=23).contains(&self.0).then_some(self.0 as u32)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hour() {
            Some(h) => write!(f, "{h:02}:00"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<i32> for TimeKey {
    fn from(value: i32) -> Self {
        TimeKey(value)
    }
}

/// One observation: a key plus either a known value or a missing marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub key: TimeKey,
    pub value: Option<f64>,
}

impl Sample {
    pub fn known(key: impl Into<TimeKey>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: Some(value),
        }
    }

    pub fn missing(key: impl Into<TimeKey>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.value.is_some()
    }
}

/// A validated set of samples for one computation.
///
/// Keys are strictly increasing and every known value is finite and `>= 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new(samples: Vec<Sample>) -> Result<Self, InterpError> {
        for pair in samples.windows(2) {
            if pair[1].key <= pair[0].key {
                return Err(InterpError::invalid(format!(
                    "hours must be strictly increasing without duplicates ({} follows {}).",
                    pair[1].key, pair[0].key
                )));
            }
        }
        for s in &samples {
            if let Some(v) = s.value {
                if !v.is_finite() || v < 0.0 {
                    return Err(InterpError::invalid(format!(
                        "step count at {} must be a finite number >= 0 (got {v}).",
                        s.key
                    )));
                }
            }
        }
        Ok(Self { samples })
    }

    /// Pair keys with values, sorting by key before validation.
    pub fn from_pairs(keys: &[TimeKey], values: &[Option<f64>]) -> Result<Self, InterpError> {
        if keys.len() != values.len() {
            return Err(InterpError::DomainKeyMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let mut samples: Vec<Sample> = keys
            .iter()
            .zip(values)
            .map(|(&key, &value)| Sample { key, value })
            .collect();
        samples.sort_by_key(|s| s.key);
        Self::new(samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Known `(key, value)` anchors in key order.
    pub fn known(&self) -> impl Iterator<Item = (TimeKey, f64)> + '_ {
        self.samples.iter().filter_map(|s| s.value.map(|v| (s.key, v)))
    }

    pub fn known_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_known()).count()
    }

    /// Smallest and largest key (known or missing).
    pub fn key_range(&self) -> Option<(TimeKey, TimeKey)> {
        Some((self.samples.first()?.key, self.samples.last()?.key))
    }
}

/// The ordered set of keys the caller wants values for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    keys: Vec<TimeKey>,
}

impl Domain {
    pub fn new(keys: Vec<TimeKey>) -> Result<Self, InterpError> {
        if keys.windows(2).any(|w| w[1] <= w[0]) {
            return Err(InterpError::invalid(
                "domain keys must be strictly increasing without duplicates.",
            ));
        }
        Ok(Self { keys })
    }

    /// Every key from `from` to `to` inclusive.
    pub fn span(from: i32, to: i32) -> Result<Self, InterpError> {
        if to < from {
            return Err(InterpError::invalid(format!(
                "domain end ({to}) is before its start ({from})."
            )));
        }
        Ok(Self {
            keys: (from..=to).map(TimeKey).collect(),
        })
    }

    /// Contiguous keys from the series' first to last key.
    pub fn covering(series: &Series) -> Self {
        match series.key_range() {
            Some((lo, hi)) => Self {
                keys: (lo.0..=hi.0).map(TimeKey).collect(),
            },
            None => Self { keys: Vec::new() },
        }
    }

    /// The form's default hours, 06:00 through 22:00.
    pub fn day() -> Self {
        Self {
            keys: (DAY_START_HOUR..=DAY_END_HOUR).map(TimeKey).collect(),
        }
    }

    pub fn keys(&self) -> &[TimeKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// One dense output value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedPoint {
    pub key: TimeKey,
    pub value: f64,
    pub was_interpolated: bool,
}

/// Dense series aligned with the requested domain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InterpolationResult {
    pub points: Vec<InterpolatedPoint>,
}

impl InterpolationResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, key: TimeKey) -> Option<&InterpolatedPoint> {
        self.points.iter().find(|p| p.key == key)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn interpolated_count(&self) -> usize {
        self.points.iter().filter(|p| p.was_interpolated).count()
    }
}

/// A named calorie range with its advisory text.
///
/// `upper` is exclusive; `None` marks the open-ended top band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upper: Option<f64>,
    pub label: String,
    #[serde(default)]
    pub tip: String,
}

impl Band {
    pub fn new(upper: Option<f64>, label: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            upper,
            label: label.into(),
            tip: tip.into(),
        }
    }
}

/// Parses `UPPER:LABEL[:TIP]`; `UPPER` may be `*` (or `inf`) for the top band.
impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let upper_raw = parts.next().unwrap_or_default().trim();
        let label = parts
            .next()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| format!("band '{s}' must look like UPPER:LABEL[:TIP]"))?;
        let tip = parts.next().map(str::trim).unwrap_or_default();

        let upper = match upper_raw.to_ascii_lowercase().as_str() {
            "*" | "inf" | "" => None,
            other => Some(
                other
                    .parse::<f64>()
                    .map_err(|_| format!("band upper bound '{upper_raw}' is not a number"))?,
            ),
        };
        Ok(Band::new(upper, label, tip))
    }
}

/// Ordered calorie bands with ascending upper bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bands {
    bands: Vec<Band>,
}

impl Bands {
    pub fn new(bands: Vec<Band>) -> Result<Self, InterpError> {
        if bands.is_empty() {
            return Err(InterpError::invalid("at least one calorie band is required."));
        }
        let last = bands.len() - 1;
        let mut prev: Option<f64> = None;
        for (i, band) in bands.iter().enumerate() {
            match band.upper {
                Some(u) => {
                    if !u.is_finite() {
                        return Err(InterpError::invalid(format!(
                            "band '{}' has a non-finite upper bound.",
                            band.label
                        )));
                    }
                    if prev.is_some_and(|p| u <= p) {
                        return Err(InterpError::invalid(format!(
                            "band upper bounds must be ascending ('{}' at {u}).",
                            band.label
                        )));
                    }
                    prev = Some(u);
                }
                None if i != last => {
                    return Err(InterpError::invalid(format!(
                        "only the last band may be open-ended ('{}' is not last).",
                        band.label
                    )));
                }
                None => {}
            }
        }
        Ok(Self { bands })
    }

    pub fn as_slice(&self) -> &[Band] {
        &self.bands
    }
}

impl Default for Bands {
    fn default() -> Self {
        Self {
            bands: vec![
                Band::new(
                    Some(100.0),
                    "low",
                    "Very little movement today. Try a short walk after each meal.",
                ),
                Band::new(
                    Some(200.0),
                    "moderate",
                    "A fair start. Taking the stairs and a longer evening walk will add up.",
                ),
                Band::new(
                    Some(350.0),
                    "active",
                    "Good work. Keep the pace steady and stay hydrated.",
                ),
                Band::new(
                    None,
                    "very active",
                    "Excellent activity. Remember to stretch and give your body time to recover.",
                ),
            ],
        }
    }
}

/// Whether the series holds per-hour increments or a running daily total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CalorieBasis {
    /// Each value is the steps taken during that hour; totals are sums.
    #[default]
    PerHour,
    /// Each value is the running total so far; the total is the last value.
    Cumulative,
}

/// Daily totals and the calorie band they fall in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_steps: f64,
    pub total_calories: f64,
    pub tier: Band,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env`).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub kcal_per_step: f64,
    pub bands: Bands,
    pub basis: CalorieBasis,

    /// Domain bounds; when unset the domain covers the input's hours.
    pub hour_from: Option<i32>,
    pub hour_to: Option<i32>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            kcal_per_step: DEFAULT_KCAL_PER_STEP,
            bands: Bands::default(),
            basis: CalorieBasis::PerHour,
            hour_from: None,
            hour_to: None,
            plot: true,
            plot_width: 68,
            plot_height: 16,
            export_csv: None,
            export_json: None,
        }
    }
}

/// One exported row: an hour with its steps and calories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRow {
    pub hour: TimeKey,
    pub label: String,
    pub steps: f64,
    pub calories: f64,
    pub interpolated: bool,
}

/// A saved run file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFile {
    pub tool: String,
    pub generated_at: String,
    pub kcal_per_step: f64,
    pub basis: CalorieBasis,
    pub hours: Vec<HourRow>,
    pub summary: Summary,
}
