//! Timing model: extraction, fitting, and sampling.
//!
//! # Sub-modules
//!
//! - **`extract`** – Pairs left presses with releases to get hold durations,
//!   and differences successive presses to get inter-action intervals split
//!   into alternating phase buckets.
//! - **`gamma`** – [`gamma::DistributionParams`], maximum-likelihood fitting
//!   of a three-parameter gamma distribution, and clamped sampling.
//! - **`special`** – Log-gamma, digamma, and trigamma functions used by the fit.
//! - **`summary`** – Descriptive statistics for analysis reports.
//! - **`model`** – [`model::TimingModel`], built once from a log and then
//!   shared read-only by any number of samplers.

use thiserror::Error;

pub mod extract;
pub mod gamma;
pub mod model;
pub mod special;
pub mod summary;

/// Default minimum number of samples accepted by [`gamma::fit`].
pub const DEFAULT_MIN_SAMPLES: usize = 8;

/// Errors raised while fitting or building a timing model.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TimingError {
    /// Too few samples for a stable maximum-likelihood fit.
    #[error("insufficient samples for {what}: need at least {needed}, got {got}")]
    InsufficientSamples {
        what: String,
        needed: usize,
        got: usize,
    },

    /// All samples are identical, so no gamma distribution can be fitted.
    #[error("samples for {what} have zero spread")]
    DegenerateSamples { what: String },

    /// A sample was NaN or infinite.
    #[error("non-finite sample in {what}")]
    NonFiniteSample { what: String },

    /// A model needs at least one interval phase.
    #[error("phase count must be at least 1")]
    InvalidPhaseCount,

    /// Parameters violate `shape > 0`, `scale > 0`, finite `location`.
    #[error("invalid gamma parameters: shape={shape}, location={location}, scale={scale}")]
    InvalidParams {
        shape: f64,
        location: f64,
        scale: f64,
    },
}
