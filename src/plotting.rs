//! Plotting series against the functions they approximate
//!
//! Mainly used through the [`crate::plot!`] macro.
//! - The asserts built-in will use this on failure if the `plotting` feature is active!
//!
//! You can also use the [`Plot`] struct directly for more control, or render the
//! harmonic-by-harmonic animation with [`animate`].
//!
//! The [`crate::plot_filename!`] macro can be used to generate a unique filename for each plot.
//! - This is how the asserts get a filename on failure
use std::ops::Range;

use crate::value::Value;

mod backend;
pub use backend::*;

mod element;
pub use element::*;

mod palette;
pub use palette::ColorSource;

mod animation;
pub use animation::*;

/// Options for plotting
#[derive(Debug, Clone)]
pub struct PlotOptions<T>
where
    T: Value,
{
    /// Caption for the plot
    pub title: String,

    /// X-axis label
    pub x_label: Option<String>,

    /// Y-axis label
    pub y_label: Option<String>,

    /// Size of the output image in pixels
    pub size: (u32, u32),

    /// X-axis range
    pub x_range: Option<Range<T>>,

    /// Y-axis range
    pub y_range: Option<Range<T>>,

    /// Whether to draw grid lines
    pub grid: bool,

    /// Whether to hide the legend
    pub hide_legend: bool,

    /// Number of labels to show on the x-axis (if supported by the backend)
    pub x_axis_labels: Option<usize>,

    /// Number of labels to show on the y-axis (if supported by the backend)
    pub y_axis_labels: Option<usize>,
}
impl<T: Value> Default for PlotOptions<T> {
    fn default() -> Self {
        Self {
            title: "Graph Output".into(),
            x_label: None,
            y_label: None,
            size: (800, 600),
            x_range: None,
            y_range: None,
            grid: true,
            hide_legend: false,
            x_axis_labels: None,
            y_axis_labels: None,
        }
    }
}

/// Helper trait so the macros can name the value type through the first element
pub trait WithTypeFrom<T: Value> {
    /// Get default plot options for this type
    fn options_with_type_from(&self) -> PlotOptions<T>;

    /// Create a new plot with this as the primary element
    fn plot_with_type_from<P: PlotBackend>(&self, options: PlotOptions<T>) -> Plot<P, T>;

    /// Adds this element to the given plot
    fn add_to_plot_with_type_from<P: PlotBackend>(&self, plot: &mut Plot<P, T>)
    where
        Self: Sized;
}
impl<E, T> WithTypeFrom<T> for E
where
    E: AsPlottingElement<T>,
    T: Value,
{
    fn options_with_type_from(&self) -> PlotOptions<T> {
        PlotOptions::default()
    }

    fn plot_with_type_from<P: PlotBackend>(&self, options: PlotOptions<T>) -> Plot<P, T> {
        Plot::new(options, self)
    }

    fn add_to_plot_with_type_from<P: PlotBackend>(&self, plot: &mut Plot<P, T>)
    where
        Self: Sized,
    {
        plot.with_element(self);
    }
}

/// A plot of one or more elements (series, functions, data) using a given backend.
///
/// The first element decides the x-values every later function is evaluated at.
/// Axis ranges cover every element unless set in the [`PlotOptions`].
pub struct Plot<P, T>
where
    P: PlotBackend,
    T: Value,
{
    options: PlotOptions<T>,
    xs: Vec<T>,
    elements: Vec<PlottingElement<T>>,
    backend: std::marker::PhantomData<P>,
}

impl<P, T> Plot<P, T>
where
    P: PlotBackend,
    T: Value,
{
    /// Create a new plot with the given options and primary element.
    pub fn new(options: PlotOptions<T>, prime: &impl AsPlottingElement<T>) -> Self {
        // Bootstrap the x-values from the range override, if any
        let xs: Vec<T> = options.x_range.as_ref().map_or_else(Vec::new, |r| {
            crate::value::Linspace::new(r.start, r.end, DEFAULT_PLOT_SAMPLES).collect()
        });

        let prime = prime.as_plotting_element(&xs);
        let xs = if xs.is_empty() { prime.x_values() } else { xs };

        Self {
            options,
            xs,
            elements: vec![prime],
            backend: std::marker::PhantomData,
        }
    }

    /// Add another plotting element to this plot, evaluated at the primary element's x-values.
    pub fn with_element(&mut self, element: &impl AsPlottingElement<T>) -> &mut Self {
        let element = element.as_plotting_element(&self.xs);
        self.elements.push(element);
        self
    }

    /// The elements added so far
    pub fn elements(&self) -> &[PlottingElement<T>] {
        &self.elements
    }

    /// The axis ranges the plot will be drawn with
    pub fn ranges(&self) -> (Range<T>, Range<T>) {
        let union = |a: Range<T>, b: Range<T>| {
            nalgebra::RealField::min(a.start, b.start)..nalgebra::RealField::max(a.end, b.end)
        };

        let x_range = self.options.x_range.clone().unwrap_or_else(|| {
            self.elements
                .iter()
                .map(PlottingElement::x_range)
                .reduce(union)
                .unwrap_or(T::zero()..T::one())
        });

        let y_range = self.options.y_range.clone().unwrap_or_else(|| {
            self.elements
                .iter()
                .map(PlottingElement::y_range)
                .reduce(union)
                .unwrap_or(T::zero()..T::one())
        });

        (x_range, y_range)
    }

    /// Draw the plot onto `root` and present it.
    ///
    /// # Errors
    /// Returns an error if the plot cannot be drawn.
    pub fn finish(self, root: &P::Root<'_>) -> Result<(), P::Error> {
        let (x_range, y_range) = self.ranges();
        let mut plot = P::new_plot(&self.options, x_range, y_range)?;
        for element in &self.elements {
            plot.add_element(element)?;
        }
        plot.finalize(root)
    }
}

/// Plot a `FourierSeries`, a function or a set of points to a PNG file, returning its path.
///
/// Generates a filename based on the source file and line number.
/// - Creates the necessary directories if they don't exist.
/// - Prints the path of the generated file to stdout.
/// - If prefix is specified, it is prepended to the filename.
///
/// Options are [`PlotOptions`] fields, overridden by name.
///
/// # Panics
/// Panics if the plot cannot be drawn.
///
/// # Examples
/// ```no_run
/// # use fourier_series::{compute_series, function, plot};
/// function!(f(t) = -2 t^2);
/// let series = compute_series(&f, &t, 2.0 * std::f64::consts::PI, 6).unwrap();
///
/// plot!(series);
/// plot!([series, f.in_terms_of(&t)]);
/// plot!(series, { title: "My Plot".to_string(), grid: false });
/// plot!([series, f.in_terms_of(&t)], { title: "My Plot".to_string() }, prefix = "custom");
/// ```
#[macro_export]
macro_rules! plot {
    ([$prime:expr $(, $($element:expr),+ $(,)? )? ], { $( $name:ident : $value:expr ),* $(,)? } $( , prefix = $prefix:expr )?) => {{
        use $crate::plotting::WithTypeFrom;

        let prime = &$prime;
        #[allow(unused_mut)] let mut options = prime.options_with_type_from();
        $( options.$name = $value; )*

        #[allow(unused)] let mut prefix: Option<String> = None; $( prefix = Some($prefix.to_string()); )?
        let path = $crate::plot_filename!(prefix);

        let root = $crate::plotting::plotters::Root::new(&path, options.size).expect("Failed to create plot output");

        #[allow(unused_mut)] let mut plot = prime.plot_with_type_from::<$crate::plotting::plotters::Backend>(options);

        $(
            $(
                let element = &$element;
                element.add_to_plot_with_type_from(&mut plot);
            )+
        )?

        plot.finish(&root).expect("Failed to draw plot");
        drop(root);

        println!("Wrote plot to {}", path.display());
        path
    }};

    ([$prime:expr $(, $($element:expr),+ $(,)? )? ] $( , prefix = $prefix:expr )?) => {
        $crate::plot!([$prime $(, $($element),+ )? ], {} $(, prefix = $prefix)?)
    };

    ($prime:expr, { $( $name:ident : $value:expr ),* $(,)? } $( , prefix = $prefix:expr )?) => {
        $crate::plot!([$prime], { $( $name: $value ),*} $(, prefix = $prefix)?)
    };

    ($prime:expr $( , prefix = $prefix:expr )?) => {
        $crate::plot!([$prime] $(, prefix = $prefix)?)
    };
}

/// Generate a filename for a plot: `target/plot_output/{file}_line_{line}.png`
///
/// Creates the necessary directories if they don't exist. The base directory is
/// `$TARGET_DIR`, or `target` if unset.
///
/// `plot_filename!(Some("prefix"))` will prepend `prefix_` to the filename.
/// `plot_filename!(prefix, "gif")` changes the extension.
#[macro_export]
macro_rules! plot_filename {
    ($prefix:expr) => {
        $crate::plot_filename!($prefix, "png")
    };

    ($prefix:expr, $extension:expr) => {{
        let prefix: Option<String> = $prefix.map(|s| s.to_string());
        let prefix = match prefix {
            Some(p) if !p.is_empty() => format!("{p}_"),
            _ => String::new(),
        };

        let file = file!().replace(['/', '\\'], "_");
        let line = line!();

        let target_dir = ::std::env::var("TARGET_DIR").unwrap_or_else(|_| "target".into());
        let plots_dir = ::std::path::Path::new(&target_dir).join("plot_output");
        let _ = ::std::fs::create_dir_all(&plots_dir);

        let filename = format!("{prefix}{file}_line_{line}.{}", $extension);

        plots_dir.join(filename)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_series, function};
    use std::f64::consts::PI;

    #[test]
    fn test_plot_collects_elements() {
        function!(f(t) = -2 t^2);
        let series = compute_series(&f, &t, 2.0 * PI, 2).unwrap();
        let signal = f.in_terms_of(&t);

        let mut plot = Plot::<crate::plotting::plotters::Backend, f64>::new(PlotOptions::default(), &series);
        plot.with_element(&signal);

        let elements = plot.elements();
        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[0], PlottingElement::Series(..)));
        assert!(matches!(elements[1], PlottingElement::Signal(..)));
        assert_eq!(elements[0].x_values(), elements[1].x_values());

        // The signal reaches -2π² at the ends; the range covers it
        let (x_range, y_range) = plot.ranges();
        assert_eq!(x_range, -PI..PI);
        assert!(y_range.start < -2.0 * PI * PI);
    }

    #[test]
    fn test_plot_range_overrides() {
        let data = vec![(0.0, 0.0), (1.0, 1.0)];
        let options = PlotOptions {
            x_range: Some(-1.0..2.0),
            y_range: Some(-5.0..5.0),
            ..Default::default()
        };

        let plot = Plot::<crate::plotting::plotters::Backend, f64>::new(options, &data);
        assert_eq!(plot.ranges(), (-1.0..2.0, -5.0..5.0));
    }

    #[test]
    fn test_plot_filename() {
        let path = crate::plot_filename!(Some("prefix"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("prefix_src_plotting.rs_line_"), "{name}");
        assert!(name.ends_with(".png"));

        let path = crate::plot_filename!(None::<&str>, "gif");
        assert_eq!(path.extension().unwrap(), "gif");
    }
}
