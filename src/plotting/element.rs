use std::ops::Range;

use crate::{
    expr::Univariate,
    sample::{positions, Evaluate, SampleSet},
    series::FourierSeries,
    statistics::spread,
    value::{CoordExt, Linspace, Value},
};

/// Number of points a function is evaluated at when the plot has no x-values of its own
pub const DEFAULT_PLOT_SAMPLES: usize = 256;

/// Elements that can be plotted
#[derive(Debug, Clone, PartialEq)]
pub enum PlottingElement<T: Value> {
    /// A partial series, sampled, labelled with its equation
    Series(Vec<(T, T)>, String),

    /// The function being approximated, sampled
    Signal(Vec<(T, T)>, String),

    /// Raw data points
    Data(Vec<(T, T)>, Option<String>),
}

impl<T: Value> PlottingElement<T> {
    /// Creates a new plotting element from raw data
    pub fn from_data(data: impl Iterator<Item = (T, T)>, label: Option<String>) -> Self {
        Self::Data(data.collect(), label)
    }

    /// Creates a new plotting element from a series, evaluated at `xs`.
    ///
    /// With no `xs`, the series is evaluated over its own period.
    pub fn from_series(series: &FourierSeries<T>, xs: &[T]) -> Self {
        let data = if xs.is_empty() {
            positions(series.period(), DEFAULT_PLOT_SAMPLES)
                .map(|xs| series.solve(xs))
                .unwrap_or_default()
        } else {
            series.solve(xs.iter().copied())
        };

        Self::Series(data, series.to_string())
    }

    /// Creates a new plotting element from a function, evaluated at `xs`.
    ///
    /// With no `xs`, the function is evaluated over `[-π, π]`.
    /// Positions where the function has no finite value are left out.
    pub fn from_signal(signal: &Univariate<'_, T>, xs: &[T]) -> Self {
        let data = if xs.is_empty() {
            Linspace::new(-T::pi(), T::pi(), DEFAULT_PLOT_SAMPLES)
                .filter_map(|x| signal.try_y(x).ok().map(|y| (x, y)))
                .collect()
        } else {
            xs.iter()
                .filter_map(|&x| signal.try_y(x).ok().map(|y| (x, y)))
                .collect()
        };

        Self::Signal(data, signal.to_string())
    }

    /// Creates a new plotting element from the samples of a function
    pub fn from_samples(samples: &SampleSet<T>, label: impl Into<String>) -> Self {
        Self::Signal(samples.points(), label.into())
    }

    /// The points of this element
    #[must_use]
    pub fn points(&self) -> &[(T, T)] {
        match self {
            PlottingElement::Series(data, _)
            | PlottingElement::Signal(data, _)
            | PlottingElement::Data(data, _) => data,
        }
    }

    /// Returns the legend label for this element
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            PlottingElement::Series(_, label) | PlottingElement::Signal(_, label) => Some(label),
            PlottingElement::Data(_, label) => label.as_deref(),
        }
    }

    /// Returns the x-values for this element
    #[must_use]
    pub fn x_values(&self) -> Vec<T> {
        self.points().x()
    }

    /// Returns the x-axis range for this element
    #[must_use]
    pub fn x_range(&self) -> Range<T> {
        let data = self.points();
        match (data.first(), data.last()) {
            (Some((x_min, _)), Some((x_max, _))) if x_min < x_max => *x_min..*x_max,
            (Some((x, _)), _) => (*x - T::one())..(*x + T::one()),
            _ => T::zero()..T::one(),
        }
    }

    /// Returns the y-axis range for this element, padded by a tenth of its spread
    #[must_use]
    pub fn y_range(&self) -> Range<T> {
        self.points().y_range().map_or(T::zero()..T::one(), padded)
    }
}

/// Widens a range by a tenth of its width on each side, or by 1 if it is empty
pub(crate) fn padded<T: Value>(range: Range<T>) -> Range<T> {
    let width = spread([range.start, range.end].into_iter());
    let padding = if width > T::zero() {
        width / T::from_positive_int(10)
    } else {
        T::one()
    };

    (range.start - padding)..(range.end + padding)
}

/// A trait for types that can be converted to a plotting element
pub trait AsPlottingElement<T: Value> {
    /// Converts this to a plotting element.
    ///
    /// Functions are evaluated at `xs`; an empty `xs` lets the element choose its own.
    fn as_plotting_element(&self, xs: &[T]) -> PlottingElement<T>;
}

impl<T: Value> AsPlottingElement<T> for FourierSeries<T> {
    fn as_plotting_element(&self, xs: &[T]) -> PlottingElement<T> {
        PlottingElement::from_series(self, xs)
    }
}

impl<T: Value> AsPlottingElement<T> for Univariate<'_, T> {
    fn as_plotting_element(&self, xs: &[T]) -> PlottingElement<T> {
        PlottingElement::from_signal(self, xs)
    }
}

impl<T: Value> AsPlottingElement<T> for SampleSet<T> {
    fn as_plotting_element(&self, _: &[T]) -> PlottingElement<T> {
        PlottingElement::Data(self.points(), None)
    }
}

impl<T: Value> AsPlottingElement<T> for (&SampleSet<T>, &str) {
    fn as_plotting_element(&self, _: &[T]) -> PlottingElement<T> {
        PlottingElement::from_samples(self.0, self.1)
    }
}

impl<T: Value> AsPlottingElement<T> for PlottingElement<T> {
    fn as_plotting_element(&self, _: &[T]) -> PlottingElement<T> {
        self.clone()
    }
}

impl<T: Value> AsPlottingElement<T> for &PlottingElement<T> {
    fn as_plotting_element(&self, _: &[T]) -> PlottingElement<T> {
        (*self).clone()
    }
}

impl<T: Value> AsPlottingElement<T> for &[(T, T)] {
    fn as_plotting_element(&self, _: &[T]) -> PlottingElement<T> {
        PlottingElement::from_data(self.iter().copied(), None)
    }
}

impl<T: Value> AsPlottingElement<T> for Vec<(T, T)> {
    fn as_plotting_element(&self, _: &[T]) -> PlottingElement<T> {
        PlottingElement::Data(self.clone(), None)
    }
}

impl<T: Value> AsPlottingElement<T> for (&Vec<(T, T)>, &str) {
    fn as_plotting_element(&self, _: &[T]) -> PlottingElement<T> {
        PlottingElement::Data(self.0.clone(), Some(self.1.to_string()))
    }
}

impl<T: Value> AsPlottingElement<T> for (&[(T, T)], &str) {
    fn as_plotting_element(&self, _: &[T]) -> PlottingElement<T> {
        PlottingElement::Data(self.0.to_vec(), Some(self.1.to_string()))
    }
}
