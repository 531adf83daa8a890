//! Three-parameter gamma distribution: fitting and sampling.
//!
//! # Fitting
//!
//! [`fit`] maximises the likelihood of `Gamma(shape, scale)` shifted by
//! `location`.  For a fixed location the shape and scale have a closed-form
//! relationship (`scale = mean(y) / shape`) and the shape solves
//! `ln(k) - ψ(k) = ln(mean(y)) - mean(ln y)`, which Newton's method handles in
//! a few iterations.  The location is then chosen by maximising this profile
//! likelihood over a bounded interval strictly below the smallest sample: a
//! coarse grid scan followed by golden-section refinement.
//!
//! The samples are sorted before any arithmetic, so the result depends only
//! on the multiset of samples and never on their order.
//!
//! # Sampling
//!
//! [`sample`] draws `Gamma(shape, scale) + location` and clamps the draw to a
//! caller-supplied floor.  A negative location can produce negative draws,
//! which would otherwise become negative sleeps downstream.

use rand::Rng;
use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};

use super::special::{digamma, ln_gamma, trigamma};
use super::TimingError;

/// Number of evenly spaced locations evaluated before refinement.
const LOCATION_GRID_POINTS: usize = 96;
/// Golden-section iterations after the grid scan.
const GOLDEN_SECTION_ITERATIONS: usize = 80;
/// The search interval extends this many standard deviations below the minimum.
const LOCATION_SEARCH_STD_DEVS: f64 = 10.0;
/// Gap kept between the upper location bound and the smallest sample, as a
/// fraction of the sample range.
const LOCATION_UPPER_GAP: f64 = 1e-4;
const SHAPE_NEWTON_ITERATIONS: usize = 100;
const SHAPE_TOLERANCE: f64 = 1e-12;
/// Lower clamp on `ln(mean) - mean(ln)`; keeps the solved shape finite.
const MIN_LOG_MEAN_GAP: f64 = 1e-12;

/// Parameters of a shifted gamma distribution.
///
/// Invariant: `shape > 0`, `scale > 0`, and all three are finite.  The
/// invariant is checked on construction and on deserialisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct DistributionParams {
    shape: f64,
    location: f64,
    scale: f64,
}

#[derive(Deserialize)]
struct RawParams {
    shape: f64,
    location: f64,
    scale: f64,
}

impl TryFrom<RawParams> for DistributionParams {
    type Error = TimingError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        DistributionParams::new(raw.shape, raw.location, raw.scale)
    }
}

impl DistributionParams {
    /// Validates and builds a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::InvalidParams`] if `shape` or `scale` is not
    /// strictly positive, or any value is not finite.
    pub fn new(shape: f64, location: f64, scale: f64) -> Result<Self, TimingError> {
        let valid = shape.is_finite()
            && scale.is_finite()
            && location.is_finite()
            && shape > 0.0
            && scale > 0.0;
        if !valid {
            return Err(TimingError::InvalidParams {
                shape,
                location,
                scale,
            });
        }
        Ok(Self {
            shape,
            location,
            scale,
        })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn location(&self) -> f64 {
        self.location
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Mean of the distribution: `location + shape * scale`.
    pub fn mean(&self) -> f64 {
        self.location + self.shape * self.scale
    }

    /// Variance of the distribution: `shape * scale²`.
    pub fn variance(&self) -> f64 {
        self.shape * self.scale * self.scale
    }

    /// Draws one value, clamped to at least `floor`.
    pub fn sample<R: Rng + ?Sized>(&self, floor: f64, rng: &mut R) -> f64 {
        sample(self, floor, rng)
    }

    /// Log-likelihood of `samples` under these parameters.
    ///
    /// Returns negative infinity if any sample lies at or below `location`.
    pub fn log_likelihood(&self, samples: &[f64]) -> f64 {
        let n = samples.len() as f64;
        let mut sum_y = 0.0;
        let mut sum_ln_y = 0.0;
        for &x in samples {
            let y = x - self.location;
            if y <= 0.0 {
                return f64::NEG_INFINITY;
            }
            sum_y += y;
            sum_ln_y += y.ln();
        }
        (self.shape - 1.0) * sum_ln_y
            - sum_y / self.scale
            - n * self.shape * self.scale.ln()
            - n * ln_gamma(self.shape)
    }
}

/// Draws one value from `Gamma(shape, scale) + location`, clamped to `floor`.
pub fn sample<R: Rng + ?Sized>(params: &DistributionParams, floor: f64, rng: &mut R) -> f64 {
    match Gamma::new(params.shape, params.scale) {
        Ok(gamma) => (params.location + gamma.sample(rng)).max(floor),
        // Unreachable for validated params; fall back to the floor.
        Err(_) => floor,
    }
}

/// Fits a three-parameter gamma distribution by maximum likelihood.
///
/// `what` names the sample set in error messages.
///
/// # Errors
///
/// - [`TimingError::InsufficientSamples`] if `samples.len() < min_samples`.
/// - [`TimingError::NonFiniteSample`] if any sample is NaN or infinite.
/// - [`TimingError::DegenerateSamples`] if all samples are equal.
pub fn fit(
    samples: &[f64],
    min_samples: usize,
    what: &str,
) -> Result<DistributionParams, TimingError> {
    if samples.len() < min_samples.max(2) {
        return Err(TimingError::InsufficientSamples {
            what: what.to_string(),
            needed: min_samples.max(2),
            got: samples.len(),
        });
    }
    if samples.iter().any(|x| !x.is_finite()) {
        return Err(TimingError::NonFiniteSample {
            what: what.to_string(),
        });
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let span = max - min;
    if span <= 0.0 {
        return Err(TimingError::DegenerateSamples {
            what: what.to_string(),
        });
    }

    let std_dev = population_std_dev(&sorted);
    let upper = min - span * LOCATION_UPPER_GAP;
    let lower = min - (LOCATION_SEARCH_STD_DEVS * std_dev).max(span);

    let location = maximise_profile(&sorted, lower, upper);
    let profile = profile_at(&sorted, location);

    tracing::debug!(
        what,
        n = sorted.len(),
        shape = profile.shape,
        location,
        scale = profile.scale,
        "fitted gamma distribution"
    );

    DistributionParams::new(profile.shape, location, profile.scale)
}

/// Best shape/scale for a fixed location, with its log-likelihood.
#[derive(Debug, Clone, Copy)]
struct Profile {
    shape: f64,
    scale: f64,
    log_likelihood: f64,
}

fn profile_at(sorted: &[f64], location: f64) -> Profile {
    let n = sorted.len() as f64;
    let mut sum_y = 0.0;
    let mut sum_ln_y = 0.0;
    for &x in sorted {
        let y = x - location;
        sum_y += y;
        sum_ln_y += y.ln();
    }
    let mean_y = sum_y / n;
    let s = (mean_y.ln() - sum_ln_y / n).max(MIN_LOG_MEAN_GAP);

    let shape = solve_shape(s);
    let scale = mean_y / shape;
    let log_likelihood =
        (shape - 1.0) * sum_ln_y - n * shape - n * shape * scale.ln() - n * ln_gamma(shape);

    Profile {
        shape,
        scale,
        log_likelihood,
    }
}

/// Solves `ln(k) - ψ(k) = s` for `k > 0` by Newton's method.
fn solve_shape(s: f64) -> f64 {
    // Closed-form approximation used as the starting point.
    let mut k = (3.0 - s + ((s - 3.0).powi(2) + 24.0 * s).sqrt()) / (12.0 * s);
    for _ in 0..SHAPE_NEWTON_ITERATIONS {
        let f = k.ln() - digamma(k) - s;
        let df = 1.0 / k - trigamma(k);
        if df == 0.0 || !df.is_finite() {
            break;
        }
        let mut next = k - f / df;
        if next <= 0.0 || !next.is_finite() {
            next = k / 2.0;
        }
        let converged = (next - k).abs() <= SHAPE_TOLERANCE * k;
        k = next;
        if converged {
            break;
        }
    }
    k
}

fn maximise_profile(sorted: &[f64], lower: f64, upper: f64) -> f64 {
    let ll = |loc: f64| {
        let value = profile_at(sorted, loc).log_likelihood;
        if value.is_finite() {
            value
        } else {
            f64::NEG_INFINITY
        }
    };

    let step = (upper - lower) / (LOCATION_GRID_POINTS - 1) as f64;
    let grid_point = |i: usize| lower + step * i as f64;

    let mut best_index = 0;
    let mut best_value = f64::NEG_INFINITY;
    for i in 0..LOCATION_GRID_POINTS {
        let value = ll(grid_point(i));
        if value > best_value {
            best_value = value;
            best_index = i;
        }
    }

    // Refine within the neighbouring grid cells.
    let mut a = grid_point(best_index.saturating_sub(1));
    let mut b = grid_point((best_index + 1).min(LOCATION_GRID_POINTS - 1));
    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = ll(c);
    let mut fd = ll(d);
    for _ in 0..GOLDEN_SECTION_ITERATIONS {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = ll(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = ll(d);
        }
    }

    let refined = (a + b) / 2.0;
    if ll(refined) >= best_value {
        refined
    } else {
        grid_point(best_index)
    }
}

fn population_std_dev(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    (samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt()
}
