/// Asserts that two floating-point values are approximately equal.
///
/// Passes when `|a - b| <= tol · max(1, |a|, |b|)`. The default tolerance is `1024·ε` for the
/// value's type; pass `tol = ...` to override it.
///
/// # Parameters
/// - `$a`: First value.
/// - `$b`: Second value.
/// - `tol = $tol`: *(optional)* Relative tolerance.
/// - `$msg`: *(optional)* Custom failure message, with `format!` arguments.
///
/// # Panics
/// Panics if the values are not close.
///
/// # Examples
/// ```
/// # use fourier_series::assert_close;
/// assert_close!(1.0 + 1e-16, 1.0, "Nearly equal");
/// assert_close!(std::f64::consts::PI, 3.1416, tol = 1e-5);
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr, tol = $tol:expr $(, $($msg:tt)+)?) => {{
        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($($msg)+); )?

        if let Err(e) = $crate::test::check_close($a, $b, $tol) {
            panic!("{msg}: {e}");
        }
    }};

    ($a:expr, $b:expr $(, $($msg:tt)+)?) => {{
        let (a, b) = ($a, $b);
        $crate::assert_close!(a, b, tol = $crate::test::default_tolerance(&a) $(, $($msg)+)?);
    }};
}

/// Asserts that two slices of floating-point values are element-wise close.
///
/// Element-wise [`crate::assert_close`], with the same optional `tol = ...`.
///
/// # Parameters
/// - `$src`: Source slice (implements `iter()`).
/// - `$dst`: Destination slice (same length as `$src`).
/// - `tol = $tol`: *(optional)* Relative tolerance.
/// - `$msg`: *(optional)* Custom failure message. Defaults to `"{len} elements"`.
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements is not close.
///
/// # Examples
/// ```
/// # use fourier_series::assert_all_close;
/// let a = vec![1.0, 2.0, 3.0];
/// let b = vec![1.0 + 1e-16, 2.0, 3.0];
///
/// assert_all_close!(a, b); // OK
/// assert_all_close!(a, b, tol = 1e-6, "Vectors must match"); // Custom tolerance and message
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr, tol = $tol:expr $(, $($msg:tt)+)?) => {{
        let (src, dst) = (&$src, &$dst);

        #[allow(unused_assignments, unused_mut)]
        let mut msg = format!("{} elements", src.len());
        $( msg = format!($($msg)+); )?

        assert_eq!(src.len(), dst.len(), "{msg} - length mismatch");
        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, tol = $tol, "{msg} - src[{i}]");
        }
    }};

    ($src:expr, $dst:expr $(, $($msg:tt)+)?) => {{
        let (src, dst) = (&$src, &$dst);

        #[allow(unused_assignments, unused_mut)]
        let mut msg = format!("{} elements", src.len());
        $( msg = format!($($msg)+); )?

        assert_eq!(src.len(), dst.len(), "{msg} - length mismatch");
        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, "{msg} - src[{i}]");
        }
    }};
}

/// Asserts that a series produces an expected value at a given point.
///
/// # Example
/// ```
/// use fourier_series::{assert_series_y, compute_series, function};
///
/// function!(f(t) = 2 + cos(t));
/// let series = compute_series(&f, &t, 2.0 * std::f64::consts::PI, 1).unwrap();
///
/// assert_series_y!(series, 0.0, 3.0);
/// ```
#[macro_export]
macro_rules! assert_series_y {
    ($series:expr, $t:expr, $expected:expr $(, $($msg:tt)+)?) => {{
        let series: &$crate::FourierSeries<_> = &$series;
        let t = $t;
        let expected = $expected;

        #[allow(unused_mut, unused_assignments)] let mut msg = format!("y({t}) != {expected}");
        $( msg = format!("{msg}: {}", format!($($msg)+)); )?

        $crate::assert_close!(series.y(t), expected, "{msg}");
    }};
}

/// Asserts that the partial sums of a function's series get no worse as harmonics are added.
///
/// Computes the series for every order `0..=max_order` and compares the mean squared error
/// against the function, sampled at `samples` points over one period (default 256).
///
/// If the test fails and the `plotting` feature is enabled, a plot of the function and the
/// offending partial sum is written to `<target/plot_output>`.
///
/// # Syntax
/// `assert_converges!(<Expr>, <Symbol>, <period>, <max_order> [, samples = <n>])`
///
/// # Panics
/// - If the series cannot be computed or the function cannot be sampled
/// - If the error at some order exceeds the error at the order before it
///
/// # Example
/// ```rust
/// # use fourier_series::{assert_converges, function};
/// function!(f(t) = t^3 - t);
/// assert_converges!(f, t, 2.0, 10);
/// ```
#[macro_export]
macro_rules! assert_converges {
    ($function:expr, $variable:expr, $period:expr, $max_order:expr, samples = $samples:expr) => {{
        let function = &$function;
        let variable = &$variable;
        let period = $period;
        let samples: usize = $samples;

        let engine = $crate::CoefficientEngine::new(function, variable, period)
            .unwrap_or_else(|e| panic!("Could not prepare {function}: {e}"));
        let signal = function.in_terms_of(variable);

        let mut previous = None;
        for order in 0..=$max_order {
            let series = engine
                .series(order)
                .unwrap_or_else(|e| panic!("Could not compute the series of {function} at N = {order}: {e}"));
            let mse = series
                .mean_squared_error(&signal, samples)
                .unwrap_or_else(|e| panic!("Could not sample {function}: {e}"));

            if let Some(last) = previous {
                let slack = $crate::test::default_tolerance(&last) * $crate::value::Value::abs(last);
                if mse > last + slack {
                    #[allow(unused_mut)]
                    let mut msg = format!("Series of {function} diverged at N = {order}: MSE {mse} > {last}");

                    #[cfg(feature = "plotting")]
                    {
                        let filename = $crate::plot!(
                            [series, signal],
                            { title: format!("{function}, N = {order}") },
                            prefix = "assert_converges"
                        );
                        msg = format!("{msg}\nFailure plot saved to: {}", filename.display());
                    }

                    panic!("{msg}");
                }
            }

            previous = Some(mse);
        }
    }};

    ($function:expr, $variable:expr, $period:expr, $max_order:expr) => {
        $crate::assert_converges!($function, $variable, $period, $max_order, samples = 256)
    };
}

#[cfg(test)]
mod tests {
    use crate::{compute_series, function};
    use std::f64::consts::PI;

    #[test]
    fn test_assert_close_macro() {
        assert_close!(1.0 + 1e-16, 1.0, "Values should be close");
        assert_close!(100.0, 100.0 + 1e-12);
        assert_close!(1.0, 1.001, tol = 1e-2, "{} and {}", 1.0, 1.001);
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_macro_fails() {
        assert_close!(1.0, 1.001);
    }

    #[test]
    fn test_assert_all_close_macro() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0 + 1e-16, 2.0, 3.0];
        assert_all_close!(a, b, "Vectors must match");
        assert_all_close!(a, [1.01, 2.0, 3.0], tol = 0.1);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_assert_all_close_macro_length() {
        assert_all_close!([1.0, 2.0], [1.0]);
    }

    #[test]
    fn test_assert_series_y_macro() {
        function!(f(t) = 1 - 4 sin(2 t));
        let series = compute_series(&f, &t, 2.0 * PI, 2).unwrap();
        assert_series_y!(series, PI / 4.0, -3.0);
        assert_series_y!(series, 0.0, 1.0, "at the origin");
    }

    #[test]
    fn test_assert_converges_macro() {
        function!(f(t) = -2 t^2);
        assert_converges!(f, t, 2.0 * PI, 6);

        function!(g(t) = t^3 - t);
        assert_converges!(g, t, 2.0, 8, samples = 512);
    }
}
