//! Functions for measuring how well a partial series approximates its function
//!
//! - [`mean_squared_error`]: Average squared difference between observed and predicted values. Lower is better.
//! - [`spread`]: Difference between maximum and minimum values in a dataset.
//!
//! # Examples
//!
//! ```rust
//! use fourier_series::{compute_series, sample, function, statistics::mean_squared_error};
//!
//! function!(f(t) = t);
//! let period = 2.0 * std::f64::consts::PI;
//! let series = compute_series(&f, &t, period, 8).unwrap();
//!
//! let y = sample(&f.in_terms_of(&t), period, 256).unwrap();
//! let y_fit = sample(&series, period, 256).unwrap();
//!
//! let mse = mean_squared_error(y.values().iter().copied(), y_fit.values().iter().copied());
//! println!("MSE = {mse}");
//! ```
use crate::value::Value;

/// Computes the spread (range) of a sequence of values.
///
/// # Notes
/// - Returns `T::neg_infinity() - T::infinity()` if `data` is empty
///
/// # Examples
/// ```rust
/// let values = vec![2.0, 5.0, 1.0, 9.0];
/// let r = fourier_series::statistics::spread(values.iter().copied());
/// assert_eq!(r, 8.0); // 9 - 1
/// ```
pub fn spread<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut min = T::infinity();
    let mut max = T::neg_infinity();
    for value in data {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }
    max - min
}

/// Computes the mean squared error (MSE) between two sets of values.
///
/// For a series sampled densely over one period this approximates the squared L² distance
/// `(1/T) ∫ (f - S_N)²`, which never grows as harmonics are added.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// MSE = (Σ (y_i - y_fit_i)²) / N
/// where
///   y_i = observed values, y_fit_i = predicted values,
///   N = number of observations
/// ```
/// </div>
///
/// Returns NaN if either set is empty.
///
/// # Example
/// ```
/// # use fourier_series::statistics::mean_squared_error;
/// let y: Vec<f64> = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.0, 2.0, 5.0];
/// let mse = mean_squared_error(y.into_iter(), y_fit.into_iter());
/// assert!((mse - 4.0 / 3.0).abs() < 1e-12);
/// ```
pub fn mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    let mut total = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.zip(y_fit) {
        total += Value::powi(y - y_fit, 2);
        n += T::one();
    }
    total / n
}
