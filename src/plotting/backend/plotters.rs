//! Plotting backend using the `plotters` crate
//!
//! Everything is coerced to `f64` for plotting purposes.
//!
//! Uses the bitmap backend to create PNG files, or animated GIFs with [`Root::gif`].
//! Text is rendered with the system's sans-serif font.
use std::{ops::Range, path::Path};

use plotters::{coord::Shift, prelude::*};

use crate::{
    plotting::{palette::ColorSource, PlotBackend, PlotOptions},
    value::{CoordExt, Value},
};

const MAX_LBL_WIDTH: usize = 120;

/// Drawing errors raised by the bitmap backend
pub type DrawError = DrawingAreaErrorKind<<BitMapBackend<'static> as DrawingBackend>::ErrorType>;

/// A drawing area root for plotters
pub struct Root<'a>(DrawingArea<BitMapBackend<'a>, Shift>);
impl<'a> AsRef<DrawingArea<BitMapBackend<'a>, Shift>> for Root<'a> {
    fn as_ref(&self) -> &DrawingArea<BitMapBackend<'a>, Shift> {
        &self.0
    }
}
impl<'a> Root<'a> {
    /// Create a new drawing area root for plotters
    ///
    /// Will create a PNG file at the given path with the given size
    ///
    /// # Errors
    /// Returns an error if the drawing area cannot be cleared
    pub fn new(path: &'a Path, size: (u32, u32)) -> Result<Self, Error> {
        let backend = BitMapBackend::new(path, size);
        let root = Self(IntoDrawingArea::into_drawing_area(backend));
        root.clear()?;
        Ok(root)
    }

    /// Create a new drawing area root for an animation
    ///
    /// Will create a GIF file at the given path; every finalized plot becomes one frame,
    /// shown for `frame_delay` milliseconds.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created
    pub fn gif(path: &'a Path, size: (u32, u32), frame_delay: u32) -> Result<Self, Error> {
        let backend =
            BitMapBackend::gif(path, size, frame_delay).map_err(|e| Error::Open(e.to_string()))?;
        let root = Self(IntoDrawingArea::into_drawing_area(backend));
        root.clear()?;
        Ok(root)
    }

    /// Fill the whole area with white, ready for the next frame
    ///
    /// # Errors
    /// Returns an error if the area cannot be drawn on
    pub fn clear(&self) -> Result<(), Error> {
        self.0.fill(&WHITE)?;
        Ok(())
    }
}

struct Line {
    points: Vec<(f64, f64)>,
    label: String,
    style: ShapeStyle,
    dashes: Option<(u32, u32)>,
}

/// Plotters backend for plotting
pub struct Backend {
    title: String,
    x_label: Option<String>,
    y_label: Option<String>,

    x_range: Range<f64>,
    y_range: Range<f64>,

    grid: bool,
    hide_legend: bool,
    x_axis_labels: Option<usize>,
    y_axis_labels: Option<usize>,

    palette: ColorSource<RGBAColor>,
    lines: Vec<Line>,
}

impl Backend {
    fn push_line<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        style: ShapeStyle,
        dashes: Option<(u32, u32)>,
    ) -> Result<(), Error> {
        let (y_min, y_max) = (self.y_range.start, self.y_range.end);
        let points = data
            .as_f64()
            .map_err(|_| Error::Cast)?
            .into_iter()
            .map(|(x, y)| (x, y.clamp(y_min, y_max)))
            .collect();

        self.lines.push(Line {
            points,
            label: shorten(label),
            style,
            dashes,
        });
        Ok(())
    }
}

impl PlotBackend for Backend {
    type Error = Error;
    type Color = RGBAColor;
    type Root<'r> = Root<'r>;

    fn next_color(&mut self) -> Self::Color {
        self.palette.next_color().unwrap_or(BLACK.to_rgba())
    }

    fn new_plot<T: Value>(
        options: &PlotOptions<T>,
        x_range: Range<T>,
        y_range: Range<T>,
    ) -> Result<Self, Self::Error> {
        //
        // T(Range) -> f64(Range)
        let x_range: Range<f64> = cast(x_range.start)?..cast(x_range.end)?;
        let y_range: Range<f64> = cast(y_range.start)?..cast(y_range.end)?;

        Ok(Self {
            title: options.title.clone(),
            x_label: options.x_label.clone(),
            y_label: options.y_label.clone(),

            x_range,
            y_range,

            grid: options.grid,
            hide_legend: options.hide_legend,
            x_axis_labels: options.x_axis_labels,
            y_axis_labels: options.y_axis_labels,

            palette: ColorSource::default(),
            lines: Vec::new(),
        })
    }

    fn add_line<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        width: u32,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let style = ShapeStyle::from(color).stroke_width(width);
        self.push_line(data, label, style, None)
    }

    fn add_dashed_line<T: Value>(
        &mut self,
        data: &[(T, T)],
        label: &str,
        width: u32,
        sizing: (u32, u32),
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let style = ShapeStyle::from(color).stroke_width(width);
        self.push_line(data, label, style, Some(sizing))
    }

    fn finalize(self, root: &Root<'_>) -> Result<(), Self::Error> {
        let mut builder = ChartBuilder::on(root.as_ref());
        builder.margin(10).x_label_area_size(30).y_label_area_size(60);

        if !self.title.is_empty() {
            builder.caption(&self.title, (FontFamily::SansSerif, 18).into_font());
        }

        if let Some(0) = self.x_axis_labels {
            builder.x_label_area_size(1);
        }

        if let Some(0) = self.y_axis_labels {
            builder.y_label_area_size(1);
        }

        let mut context = builder.build_cartesian_2d(self.x_range.clone(), self.y_range.clone())?;

        //
        // Mesh and axes
        let mut mesh = context.configure_mesh();
        mesh.label_style((FontFamily::SansSerif, 12))
            .x_label_formatter(&format_tick)
            .y_label_formatter(&format_tick);

        if !self.grid {
            mesh.disable_mesh();
        }

        if let Some(x_label) = &self.x_label {
            mesh.x_desc(x_label);
        }

        if let Some(y_label) = &self.y_label {
            mesh.y_desc(y_label);
        }

        if let Some(x_labels) = self.x_axis_labels {
            mesh.x_labels(x_labels);
        }

        if let Some(y_labels) = self.y_axis_labels {
            mesh.y_labels(y_labels);
        }

        mesh.draw()?;

        for line in self.lines {
            let style = line.style;
            let annotation = match line.dashes {
                Some((size, spacing)) => {
                    context.draw_series(DashedLineSeries::new(line.points, size, spacing, style))?
                }
                None => context.draw_series(LineSeries::new(line.points, style))?,
            };

            annotation
                .label(line.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        if !self.hide_legend {
            //
            // Legend
            context
                .configure_series_labels()
                .label_font((FontFamily::SansSerif, 12))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(SeriesLabelPosition::LowerRight)
                .draw()?;
        }

        root.as_ref().present()?;
        Ok(())
    }
}

/// Shorten label and add [...] if too long
fn shorten(label: &str) -> String {
    if label.chars().count() > MAX_LBL_WIDTH {
        let mut s: String = label.chars().take(MAX_LBL_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn format_tick(v: &f64) -> String {
    if v.abs() < 1e-12 || (1e-3..1e3).contains(&v.abs()) {
        format!("{v:.2}")
    } else {
        format!("{v:.2e}")
    }
}

fn cast<T: Value>(value: T) -> Result<f64, Error> {
    num_traits::cast(value).ok_or(Error::Cast)
}

/// Error occurring during plotting
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error drawing the plot
    #[error("Error drawing plot: {0}")]
    Draw(#[from] DrawError),

    /// Error creating the output file
    #[error("Could not open plot output: {0}")]
    Open(String),

    /// Error casting a value
    #[error("A value could not be represented as f64")]
    Cast,
}
