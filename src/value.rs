//! Numeric types and iteration utilities for series evaluation.
//!
//! This module defines the [`Value`] trait, which abstracts the numeric
//! types that can be used for coefficients, periods and samples, ensuring
//! compatibility with nalgebra, floating-point operations, and formatting.
//!
//! # Traits
//!
//! - [`Value`]: Extends `Float`, `Scalar`, and `ComplexField` to provide:
//!   - A canonical `two()` constant.
//!   - `try_cast` for safe type conversion with error handling.
//!   - `powi` for integer exponentiation.
//!
//! # Iterators
//!
//! - [`Linspace`]: `n` evenly spaced values over a closed interval, both endpoints included.
//!
//! # Example
//!
//! ```rust
//! use fourier_series::value::{Linspace, Value};
//!
//! // 5 values from -1.0 to 1.0
//! let xs: Vec<f64> = Linspace::new(-1.0, 1.0, 5).collect();
//! assert_eq!(xs, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
//!
//! // Using Value trait methods
//! let two = f64::two();
//! let squared = two.powi(2);
//! ```
use std::ops::Range;

use crate::error::Error;

/// Numeric type for series and samples
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Returns the absolute difference between two values.
    #[must_use]
    fn abs_sub(self, other: Self) -> Self {
        nalgebra::ComplexField::abs(self - other)
    }

    /// Check if the value is negative
    fn is_sign_negative(&self) -> bool {
        self < &Self::zero()
    }

    /// Check if the value is neither infinite nor NaN
    fn is_real(&self) -> bool {
        num_traits::float::FloatCore::is_finite(*self)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// Iterator over `count` evenly spaced values in a closed interval.
///
/// Follows the usual `linspace` conventions:
/// - The first value is exactly `start`
/// - The last value is exactly `end` (when `count > 1`)
/// - A single value yields just `start`
#[derive(Debug, Clone)]
pub struct Linspace<T: Value> {
    start: T,
    end: T,
    step: T,
    count: usize,
    index: usize,
}
impl<T: Value> Linspace<T> {
    /// Creates a new iterator over `count` values from `start` to `end`, inclusive
    pub fn new(start: T, end: T, count: usize) -> Self {
        let step = if count > 1 {
            (end - start) / T::from_positive_int(count - 1)
        } else {
            T::zero()
        };

        Self {
            start,
            end,
            step,
            count,
            index: 0,
        }
    }

    /// Distance between two consecutive values
    pub fn step(&self) -> T {
        self.step
    }
}
impl<T: Value> Iterator for Linspace<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let i = self.index;
        self.index += 1;

        if i + 1 == self.count && self.count > 1 {
            Some(self.end)
        } else {
            Some(self.start + self.step * T::from_positive_int(i))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}
impl<T: Value> ExactSizeIterator for Linspace<T> {}

/// Extension trait for accessing the `x` and `y` coordinates of a type.
///
/// This trait is intended for any type that conceptually represents a 2D
/// coordinate or point. Implementations should provide accessors that return
/// the respective coordinate values.
///
/// # Examples
///
/// ```
/// # use fourier_series::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// println!("{:?}", data.y());
/// ```
pub trait CoordExt<T: Value> {
    /// Returns an iterator over the x-coordinates of this value.
    fn x_iter(&self) -> impl Iterator<Item = T>;

    /// Returns an iterator over the y-coordinates of this value.
    fn y_iter(&self) -> impl Iterator<Item = T>;

    /// Returns the x-coordinate of this value.
    fn x(&self) -> Vec<T> {
        self.x_iter().collect()
    }

    /// Returns the y-coordinate of this value.
    fn y(&self) -> Vec<T> {
        self.y_iter().collect()
    }

    /// Returns the range of y-coordinates of this value.
    fn y_range(&self) -> Option<Range<T>> {
        let y_min = self.y_iter().fold(None, |acc: Option<(T, T)>, y| {
            Some(match acc {
                Some((min, max)) => (
                    nalgebra::RealField::min(min, y),
                    nalgebra::RealField::max(max, y),
                ),
                None => (y, y),
            })
        });
        y_min.map(|(start, end)| start..end)
    }

    /// Converts the coordinates of this value to `f64`.
    ///
    /// # Errors
    /// Returns an error if any of the coordinates cannot be converted to `f64`.
    fn as_f64(&self) -> crate::error::Result<Vec<(f64, f64)>> {
        self.x_iter()
            .zip(self.y_iter())
            .map(|(x, y)| {
                let x_f64 = f64::try_cast(x)?;
                let y_f64 = f64::try_cast(y)?;
                Ok((x_f64, y_f64))
            })
            .collect()
    }
}
impl<T: Value> CoordExt<T> for Vec<(T, T)> {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}
impl<T: Value> CoordExt<T> for &[(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let xs: Vec<f64> = Linspace::new(-std::f64::consts::PI, std::f64::consts::PI, 64).collect();
        assert_eq!(xs.len(), 64);
        assert_eq!(xs[0], -std::f64::consts::PI);
        assert_eq!(xs[63], std::f64::consts::PI);
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert_eq!(Linspace::new(0.0, 1.0, 0).count(), 0);
        assert_eq!(Linspace::new(-2.0, 2.0, 1).collect::<Vec<_>>(), vec![-2.0]);
        assert_eq!(Linspace::new(-2.0, 2.0, 2).collect::<Vec<_>>(), vec![-2.0, 2.0]);
    }

    #[test]
    fn test_linspace_exact_size() {
        let mut it = Linspace::new(0.0, 1.0, 11);
        assert_eq!(it.len(), 11);
        it.next();
        assert_eq!(it.len(), 10);
        assert!((it.step() - 0.1).abs() < 1e-15);
    }

    #[test]
    fn test_coord_ext() {
        let data = vec![(0.0, 3.0), (1.0, -1.0), (2.0, 2.0)];
        assert_eq!(data.x(), vec![0.0, 1.0, 2.0]);
        assert_eq!(data.y_range(), Some(-1.0..3.0));
        assert_eq!(data.as_f64().unwrap(), data);
    }
}
