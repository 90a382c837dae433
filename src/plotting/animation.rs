//! Rendering partial sums, one harmonic at a time
use std::{ops::Range, path::Path};

use crate::{
    expr::{Expr, Symbol},
    plotting::{
        element::padded,
        plotters::{self, Backend, Root},
        Plot, PlotOptions, PlottingElement,
    },
    sample::{sample, SampleSet},
    series::FourierSeries,
    value::{CoordExt, Value},
};

/// Number of samples the demo plots are drawn from
pub const DEMO_SAMPLE_COUNT: usize = 100;

/// Error raised while rendering an animation or demo plot
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// The series could not be computed or sampled
    #[error(transparent)]
    Series(#[from] crate::Error),

    /// The plot could not be drawn
    #[error(transparent)]
    Plot(#[from] plotters::Error),
}

/// Options for [`animate`] and [`demo`]
#[derive(Debug, Clone)]
pub struct AnimationOptions {
    /// Size of the output image in pixels
    pub size: (u32, u32),

    /// How long each frame is shown, in milliseconds
    pub frame_delay: u32,

    /// Number of points each curve is sampled at
    pub sample_count: usize,

    /// Whether to draw grid lines
    pub grid: bool,
}
impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            size: (800, 600),
            frame_delay: 500,
            sample_count: DEMO_SAMPLE_COUNT,
            grid: true,
        }
    }
}

/// Title of the frame showing the partial sum up to harmonic `order`
#[must_use]
pub fn frame_title(order: usize) -> String {
    format!("Fourier series for N = {order}")
}

/// The curves of one frame: the sampled function and a sampled partial sum
struct Frame<'a, T: Value> {
    variable: &'a Symbol,
    signal: &'a PlottingElement<T>,
    partial: &'a FourierSeries<T>,
    samples: SampleSet<T>,
}

impl<T: Value> Frame<'_, T> {
    fn draw(
        &self,
        root: &Root<'_>,
        options: &AnimationOptions,
        y_range: Option<Range<T>>,
    ) -> Result<(), plotters::Error> {
        let plot_options = PlotOptions {
            title: frame_title(self.partial.order()),
            x_label: Some(self.variable.name().to_string()),
            size: options.size,
            y_range,
            grid: options.grid,
            ..PlotOptions::default()
        };

        let series = PlottingElement::Series(self.samples.points(), self.partial.to_string());
        let mut plot = Plot::<Backend, T>::new(plot_options, self.signal);
        plot.with_element(&series);
        plot.finish(root)
    }
}

/// Renders the partial sums of `function`'s series as an animated GIF at `path`.
///
/// Frame `n` overlays the sampled function with the partial sum up to harmonic `n`, for
/// `n = 1..=order` (a single frame for `order = 0`). All frames share one y-axis range.
/// Rendering is sequential; the pacing is the GIF's frame delay.
///
/// Returns the full series.
///
/// # Errors
/// - [`AnimationError::Series`] if the series cannot be computed, or either curve cannot be sampled
/// - [`AnimationError::Plot`] if the output cannot be written
pub fn animate<T: Value>(
    function: &Expr<T>,
    variable: &Symbol,
    period: T,
    order: usize,
    path: &Path,
    options: &AnimationOptions,
) -> Result<FourierSeries<T>, AnimationError> {
    let series = crate::compute_series(function, variable, period, order)?;

    let signal = sample(&function.in_terms_of(variable), period, options.sample_count)?;
    let signal = PlottingElement::from_samples(&signal, function.in_terms_of(variable).to_string());

    //
    // Sample every partial sum first so all frames share the same axes
    let partials: Vec<FourierSeries<T>> = (order.min(1)..=order).map(|n| series.truncate(n)).collect();
    let mut frames = Vec::with_capacity(partials.len());
    for partial in &partials {
        frames.push(Frame {
            variable,
            signal: &signal,
            partial,
            samples: sample(partial, period, options.sample_count)?,
        });
    }

    let y_range = frames
        .iter()
        .map(|frame| frame.samples.points().y_range())
        .chain(std::iter::once(signal.points().y_range()))
        .flatten()
        .reduce(|a, b| nalgebra::RealField::min(a.start, b.start)..nalgebra::RealField::max(a.end, b.end))
        .map(padded);

    let root = Root::gif(path, options.size, options.frame_delay)?;
    for frame in &frames {
        root.clear()?;
        frame.draw(&root, options, y_range.clone())?;
        tracing::debug!(n = frame.partial.order(), path = %path.display(), "rendered frame");
    }

    tracing::info!(frames = frames.len(), path = %path.display(), "wrote animation");
    Ok(series)
}

/// Computes `function`'s series up to harmonic `order` and plots it over the sampled function
/// as a PNG at `path`, titled `Fourier series for N = {order}`.
///
/// Returns the series.
///
/// # Errors
/// - [`AnimationError::Series`] if the series cannot be computed, or either curve cannot be sampled
/// - [`AnimationError::Plot`] if the output cannot be written
pub fn demo<T: Value>(
    function: &Expr<T>,
    variable: &Symbol,
    period: T,
    order: usize,
    path: &Path,
    options: &AnimationOptions,
) -> Result<FourierSeries<T>, AnimationError> {
    let series = crate::compute_series(function, variable, period, order)?;

    let signal = sample(&function.in_terms_of(variable), period, options.sample_count)?;
    let signal = PlottingElement::from_samples(&signal, function.in_terms_of(variable).to_string());

    let frame = Frame {
        variable,
        signal: &signal,
        partial: &series,
        samples: sample(&series, period, options.sample_count)?,
    };

    let root = Root::new(path, options.size)?;
    frame.draw(&root, options, None)?;

    tracing::info!(path = %path.display(), "wrote plot");
    Ok(series)
}
