use std::ops::Range;

use crate::{
    plotting::{PlotOptions, PlottingElement},
    series::FourierSeries,
    value::Value,
};

pub mod plotters;

/// Most points drawn for a raw data element; denser data is thinned evenly
const MAX_DATA_POINTS: usize = 200;

/// Trait for plot backends
///
/// Elements are collected by the `add_*` methods and drawn onto a root in [`PlotBackend::finalize`],
/// so one backend value describes one image or one animation frame.
pub trait PlotBackend: Sized {
    /// Error type for the plot backend
    type Error: std::error::Error;

    /// Root type for the plot backend
    type Root<'r>;

    /// Color type for the plot backend
    type Color: Clone;

    /// Get the next color in the palette
    fn next_color(&mut self) -> Self::Color;

    /// Create a new plot with the given options and resolved axis ranges
    ///
    /// # Errors
    /// Returns an error if the ranges cannot be represented by the backend.
    fn new_plot<T: Value>(
        options: &PlotOptions<T>,
        x_range: Range<T>,
        y_range: Range<T>,
    ) -> Result<Self, Self::Error>;

    /// Add a line to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_line<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        width: u32,
        color: Self::Color,
    ) -> Result<(), Self::Error>;

    /// Add a dashed line to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_dashed_line<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        width: u32,
        sizing: (u32, u32),
        color: Self::Color,
    ) -> Result<(), Self::Error>;

    /// Draw everything onto the root and present it
    ///
    /// # Errors
    /// Returns an error if drawing fails.
    fn finalize(self, root: &Self::Root<'_>) -> Result<(), Self::Error>;

    /// Add a plotting element to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_element<T: Value>(&mut self, element: &PlottingElement<T>) -> Result<(), Self::Error> {
        match element {
            PlottingElement::Series(data, equation) => {
                let color = self.next_color();
                self.add_line(data, equation, 2, color)
            }

            PlottingElement::Signal(data, label) => {
                let color = self.next_color();
                self.add_dashed_line(data, label, 1, (6, 3), color)
            }

            PlottingElement::Data(data, label) => {
                let color = self.next_color();
                let step_size = data.len().div_ceil(MAX_DATA_POINTS).max(1);
                let data: Vec<(T, T)> = data.iter().step_by(step_size).copied().collect();
                self.add_line(&data, label.as_deref().unwrap_or("Data"), 1, color)
            }
        }
    }

    /// Add a series, evaluated at `x`, to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_series<T: Value>(&mut self, series: &FourierSeries<T>, x: &[T]) -> Result<(), Self::Error> {
        self.add_element(&PlottingElement::from_series(series, x))
    }

    /// Add raw data to the plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    fn add_data<T: Value>(&mut self, data: &[(T, T)], label: Option<String>) -> Result<(), Self::Error> {
        self.add_element(&PlottingElement::from_data(data.iter().copied(), label))
    }
}
