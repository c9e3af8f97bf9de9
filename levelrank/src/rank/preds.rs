/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Predicates implementing stopping conditions.
//!
//! Each pass of the [monolithic step](super::monolithic::monolithic_step)
//! evaluates a [predicate](Predicate) after each iteration, and stops if the
//! predicate is true. The predicates in this module can be combined using
//! the `and` and `or` methods provided by the [`Predicate`] trait.
//!
//! # Examples
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use predicates::prelude::*;
//! use levelrank::rank::preds::{MaxIter, PredParams, Tolerance};
//!
//! let predicate = Tolerance::try_from(1E-6)?.or(MaxIter::from(100));
//! assert!(predicate.eval(&PredParams { iteration: 100, error: 1.0 }));
//! assert!(predicate.eval(&PredParams { iteration: 1, error: 1E-7 }));
//! assert!(!predicate.eval(&PredParams { iteration: 1, error: 1.0 }));
//! #     Ok(())
//! # }
//! ```

use anyhow::ensure;
use predicates::{Predicate, reflection::PredicateReflection};
use std::fmt::Display;

#[doc(hidden)]
/// This structure is passed to stopping predicates to provide the
/// information that is needed to evaluate them.
#[derive(Debug)]
pub struct PredParams {
    pub iteration: usize,
    pub error: f64,
}

/// Stops after at most the provided number of iterations.
#[derive(Debug, Clone)]
pub struct MaxIter {
    max_iter: usize,
}

impl MaxIter {
    pub const DEFAULT_MAX_ITER: usize = usize::MAX;
}

impl From<usize> for MaxIter {
    fn from(max_iter: usize) -> Self {
        MaxIter { max_iter }
    }
}

impl Default for MaxIter {
    fn default() -> Self {
        Self::from(Self::DEFAULT_MAX_ITER)
    }
}

impl Display for MaxIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("(max iter: {})", self.max_iter))
    }
}

impl PredicateReflection for MaxIter {}

impl Predicate<PredParams> for MaxIter {
    fn eval(&self, pred_params: &PredParams) -> bool {
        pred_params.iteration >= self.max_iter
    }
}

/// Stops when the error between successive approximations falls below a
/// given threshold.
///
/// The error is the norm of the difference between successive
/// approximations selected by the
/// [tolerance scaling](super::ToleranceScaling) of the computation.
#[derive(Debug, Clone)]
pub struct Tolerance {
    threshold: f64,
}

impl Tolerance {
    pub const DEFAULT_THRESHOLD: f64 = 1E-6;

    /// Returns a tolerance predicate without checking the threshold.
    ///
    /// Thresholds computed internally may be zero (e.g., when scaling a
    /// zero global tolerance), which simply means iterating until the
    /// maximum number of iterations.
    pub(crate) fn new_unchecked(threshold: f64) -> Self {
        Tolerance { threshold }
    }
}

impl TryFrom<Option<f64>> for Tolerance {
    type Error = anyhow::Error;
    fn try_from(threshold: Option<f64>) -> anyhow::Result<Self> {
        Ok(match threshold {
            Some(threshold) => {
                ensure!(!threshold.is_nan());
                ensure!(threshold > 0.0, "The threshold must be positive");
                Tolerance { threshold }
            }
            None => Self::default(),
        })
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = anyhow::Error;
    fn try_from(threshold: f64) -> anyhow::Result<Self> {
        Some(threshold).try_into()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_THRESHOLD)
    }
}

impl Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("(error < {})", self.threshold))
    }
}

impl PredicateReflection for Tolerance {}

impl Predicate<PredParams> for Tolerance {
    fn eval(&self, pred_params: &PredParams) -> bool {
        pred_params.error < self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_threshold() {
        assert!(Tolerance::try_from(0.0).is_err());
        assert!(Tolerance::try_from(-1.0).is_err());
        assert!(Tolerance::try_from(f64::NAN).is_err());
        assert!(Tolerance::try_from(None).is_ok());
    }

    #[test]
    fn test_max_iter() {
        let pred = MaxIter::from(3);
        assert!(!pred.eval(&PredParams {
            iteration: 2,
            error: 0.0
        }));
        assert!(pred.eval(&PredParams {
            iteration: 3,
            error: 0.0
        }));
    }
}
