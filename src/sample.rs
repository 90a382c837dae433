//! Sampling a function over one period
//!
//! [`sample`] evaluates anything implementing [`Evaluate`] at evenly spaced positions over
//! `[-T/2, T/2]`, both ends included, and returns the positions and values as a [`SampleSet`].
//!
//! Sampling stops at the first position where evaluation fails or is not a finite number; that
//! position is named in the returned [`Error::Evaluation`]. No partial sample set is returned.
//!
//! ```rust
//! use fourier_series::{compute_series, sample, expr::{Expr, Symbol}, DEFAULT_SAMPLE_COUNT};
//!
//! let t = Symbol::new("t");
//! let f: Expr = "-2*t^2".parse().unwrap();
//! let period = 2.0 * std::f64::consts::PI;
//!
//! // The original signal
//! let signal = sample(&f.in_terms_of(&t), period, DEFAULT_SAMPLE_COUNT).unwrap();
//!
//! // And its approximation
//! let series = compute_series(&f, &t, period, 6).unwrap();
//! let approximation = sample(&series, period, DEFAULT_SAMPLE_COUNT).unwrap();
//!
//! assert_eq!(signal.positions(), approximation.positions());
//! assert_eq!(signal.positions()[0], -std::f64::consts::PI);
//! ```
use crate::{
    error::{Error, Result},
    expr::Univariate,
    series::{validate_period, FourierSeries},
    value::{Linspace, Value},
};

/// Number of samples taken when the caller has no preference
pub const DEFAULT_SAMPLE_COUNT: usize = 64;

/// A real function of one real argument that may fail to evaluate
pub trait Evaluate<T: Value> {
    /// Value at `t`
    ///
    /// # Errors
    /// Returns [`Error::Evaluation`] if there is no finite value at `t`
    fn try_y(&self, t: T) -> Result<T>;
}

impl<T: Value> Evaluate<T> for FourierSeries<T> {
    fn try_y(&self, t: T) -> Result<T> {
        let y = self.y(t);
        if y.is_real() {
            Ok(y)
        } else {
            Err(Error::Evaluation {
                position: format!("{} = {t}", self.variable()),
                reason: format!("series evaluates to {y}"),
            })
        }
    }
}

impl<T: Value> Evaluate<T> for Univariate<'_, T> {
    fn try_y(&self, t: T) -> Result<T> {
        self.y(t)
    }
}

impl<T: Value, E: Evaluate<T> + ?Sized> Evaluate<T> for &E {
    fn try_y(&self, t: T) -> Result<T> {
        (**self).try_y(t)
    }
}

/// Sample positions over one period: `count` evenly spaced values on `[-T/2, T/2]`.
///
/// # Errors
/// Returns [`Error::InvalidParameter`] if `period` is not finite and positive, `count` is zero,
/// or `period` is too small for `count` distinct, evenly spaced positions
pub fn positions<T: Value>(period: T, count: usize) -> Result<Linspace<T>> {
    validate_period(period)?;
    if count == 0 {
        return Err(Error::invalid("sample_count", "must be at least 1"));
    }

    let half = period / T::two();
    let xs = Linspace::new(-half, half, count);
    if count > 1 {
        // Subnormal periods lose the spacing to rounding
        let span = half + half;
        let covered = xs.step() * T::from_positive_int(count - 1);
        let slack = span * T::epsilon() * T::from_positive_int(count);
        if half == T::zero() || xs.step() <= T::zero() || covered.abs_sub(span) > slack {
            return Err(Error::invalid(
                "period",
                format!("{period} is too small to hold {count} evenly spaced samples"),
            ));
        }
    }

    Ok(xs)
}

/// Evaluates `expression` at `sample_count` evenly spaced positions over `[-T/2, T/2]`.
///
/// # Errors
/// - [`Error::InvalidParameter`] if `period` is not finite and positive, or `sample_count` is zero
/// - [`Error::Evaluation`] at the first position where evaluation fails
pub fn sample<T, E>(expression: &E, period: T, sample_count: usize) -> Result<SampleSet<T>>
where
    T: Value,
    E: Evaluate<T> + ?Sized,
{
    let xs = positions(period, sample_count)?;

    let mut set = SampleSet {
        positions: Vec::with_capacity(sample_count),
        values: Vec::with_capacity(sample_count),
    };

    for x in xs {
        let y = expression.try_y(x).inspect_err(|e| {
            tracing::trace!(position = %x, error = %e, "sampling aborted");
        })?;

        set.positions.push(x);
        set.values.push(y);
    }

    tracing::trace!(count = set.len(), %period, "sampled");
    Ok(set)
}

/// Positions and values of a sampled function.
///
/// Positions are strictly increasing and evenly spaced; both sequences have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet<T: Value = f64> {
    positions: Vec<T>,
    values: Vec<T>,
}

impl<T: Value> SampleSet<T> {
    /// Sample positions, in increasing order
    pub fn positions(&self) -> &[T] {
        &self.positions
    }

    /// Values at each position
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false for a set returned by [`sample`]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `(position, value)` pairs
    pub fn points(&self) -> Vec<(T, T)> {
        self.iter().collect()
    }

    /// Iterator over `(position, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.positions.iter().copied().zip(self.values.iter().copied())
    }

    /// Splits the set into its positions and values
    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.positions, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_all_close, assert_close, compute_series, function};
    use std::f64::consts::PI;

    #[test]
    fn test_positions() {
        function!(f(t) = t^2);
        let set = sample(&f.in_terms_of(&t), 2.0 * PI, DEFAULT_SAMPLE_COUNT).unwrap();

        assert_eq!(set.len(), 64);
        assert_eq!(set.values().len(), 64);
        assert_eq!(set.positions()[0], -PI);
        assert_eq!(set.positions()[63], PI);
        assert!(set.positions().windows(2).all(|w| w[0] < w[1]));

        let step = 2.0 * PI / 63.0;
        for w in set.positions().windows(2) {
            assert_close!(w[1] - w[0], step);
        }
    }

    #[test]
    fn test_single_sample() {
        function!(f(t) = t);
        let set = sample(&f.in_terms_of(&t), 4.0, 1).unwrap();
        assert_eq!(set.points(), vec![(-2.0, -2.0)]);
    }

    #[test]
    fn test_constant_series_samples() {
        function!(f(t) = 3);
        for order in 0..=5 {
            let series = compute_series(&f, &t, 2.0 * PI, order).unwrap();
            let set = sample(&series, 2.0 * PI, 10).unwrap();
            assert_all_close!(set.values(), &[3.0; 10]);
        }
    }

    #[test]
    fn test_series_matches_function_at_smooth_points() {
        function!(f(t) = cos(t) + 2 sin(2 t));
        let series = compute_series(&f, &t, 2.0 * PI, 3).unwrap();

        let expected = sample(&f.in_terms_of(&t), 2.0 * PI, 32).unwrap();
        let actual = sample(&series, 2.0 * PI, 32).unwrap();
        assert_all_close!(actual.values(), expected.values(), tol = 1e-12);
    }

    #[test]
    fn test_invalid_parameters() {
        function!(f(t) = t);
        let bound = f.in_terms_of(&t);
        assert!(sample(&bound, 2.0, 0).unwrap_err().is_invalid_parameter());
        assert!(sample(&bound, 0.0, 10).unwrap_err().is_invalid_parameter());
        assert!(sample(&bound, -2.0, 10).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_subnormal_period_is_rejected() {
        function!(f(t) = t);
        let bound = f.in_terms_of(&t);

        // Half of the smallest subnormal rounds to zero
        assert!(sample(&bound, 5e-324, 4).unwrap_err().is_invalid_parameter());

        // Twenty subnormal steps cannot be split evenly fourteen ways
        assert!(sample(&bound, 20.0 * 5e-324, 15).unwrap_err().is_invalid_parameter());

        // A single sample needs no spacing
        let set = sample(&bound, 5e-324, 1).unwrap();
        assert_eq!(set.len(), 1);

        // Small but normal periods keep full spacing
        let set = sample(&bound, 1e-300, 64).unwrap();
        assert!(set.positions().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_evaluation_failure_aborts() {
        // 1/t is infinite at the centre sample of an odd-sized grid
        function!(f(t) = 1 / t);
        match sample(&f.in_terms_of(&t), 2.0, 5) {
            Err(Error::Evaluation { position, .. }) => assert_eq!(position, "t = 0"),
            other => panic!("expected an evaluation error, got {other:?}"),
        }

        function!(g(t) = ln(t));
        assert!(matches!(sample(&g.in_terms_of(&t), 2.0, 8), Err(Error::Evaluation { .. })));
    }

    #[test]
    fn test_into_parts() {
        function!(f(t) = 2 t);
        let set = sample(&f.in_terms_of(&t), 2.0, 3).unwrap();
        let (xs, ys) = set.into_parts();
        assert_eq!(xs, vec![-1.0, 0.0, 1.0]);
        assert_eq!(ys, vec![-2.0, 0.0, 2.0]);
    }
}
