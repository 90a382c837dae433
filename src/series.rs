//! Truncated Fourier series
//!
//! [`compute_series`] turns a symbolic periodic function into a [`FourierSeries`]:
//! ```text
//! y(t) = a₀/2 + Σₙ [aₙ·cos(nωt) + bₙ·sin(nωt)],   ω = 2π/T,   n = 1..=N
//!
//! aₙ = (2/T) ∫ f(t)·cos(nωt) dt
//! bₙ = (2/T) ∫ f(t)·sin(nωt) dt                    over [-T/2, T/2]
//! ```
//! Coefficients are exact up to rounding: the integrals are evaluated in closed form by
//! [`crate::integrate`], never by quadrature.
//!
//! The series itself is an ordered list of [`SeriesTerm`]s, `(coefficient, harmonic, kind)`:
//! the constant first, then one cosine and one sine term per harmonic in increasing order.
//!
//! ```rust
//! use fourier_series::{compute_series, expr::{Expr, Symbol}};
//!
//! let t = Symbol::new("t");
//! let f: Expr = "-2*t^2".parse().unwrap();
//! let series = compute_series(&f, &t, 2.0 * std::f64::consts::PI, 6).unwrap();
//!
//! assert_eq!(series.harmonic_count(), 7);
//! assert_eq!(series.sine(1), Some(0.0)); // even function
//! println!("{series}");
//! ```
use std::fmt::{self, Display};

use crate::{
    display,
    error::{Error, Result},
    expr::{Expr, Symbol},
    integrate::ExpPolynomial,
    sample::{sample, Evaluate},
    statistics,
    value::Value,
};

/// Coefficients within this fraction of the function's magnitude are rounding noise
const SNAP_TOLERANCE: f64 = 1e-12;

/// Which basis function a [`SeriesTerm`] multiplies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigKind {
    /// The constant term, `a₀/2`
    Constant,

    /// `cos(nωt)`
    Cosine,

    /// `sin(nωt)`
    Sine,
}

/// One `(coefficient, harmonic, kind)` triple of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesTerm<T: Value = f64> {
    /// Multiplier of the basis function
    pub coefficient: T,

    /// Harmonic index `n`; 0 for the constant term
    pub harmonic: usize,

    /// Basis function
    pub kind: TrigKind,
}

impl<T: Value> SeriesTerm<T> {
    /// Value of the term at `t` for fundamental angular frequency `omega`
    pub fn y(&self, omega: T, t: T) -> T {
        let phase = omega * T::from_positive_int(self.harmonic) * t;
        match self.kind {
            TrigKind::Constant => self.coefficient,
            TrigKind::Cosine => self.coefficient * phase.cos(),
            TrigKind::Sine => self.coefficient * phase.sin(),
        }
    }
}

/// Checks that a period is finite and strictly positive
///
/// # Errors
/// Returns [`Error::InvalidParameter`] otherwise
pub fn validate_period<T: Value>(period: T) -> Result<()> {
    if !period.is_real() {
        return Err(Error::invalid("period", format!("must be finite, got {period}")));
    }

    if period <= T::zero() {
        return Err(Error::invalid("period", format!("must be positive, got {period}")));
    }

    Ok(())
}

/// Converts a signed truncation order to `usize`, rejecting negative values.
///
/// ```rust
/// # use fourier_series::series::checked_order;
/// assert_eq!(checked_order(6i64).unwrap(), 6);
/// assert!(checked_order(-1i32).unwrap_err().is_invalid_parameter());
/// ```
///
/// # Errors
/// Returns [`Error::InvalidParameter`] if `order` is negative or does not fit in a `usize`
pub fn checked_order<N: num_traits::PrimInt + Display>(order: N) -> Result<usize> {
    num_traits::cast::<N, usize>(order)
        .ok_or_else(|| Error::invalid("order", format!("must be a non-negative integer, got {order}")))
}

/// Computes the truncated Fourier series of `function` with period `period`, up to harmonic `order`.
///
/// Shorthand for [`CoefficientEngine::new`] followed by [`CoefficientEngine::series`].
///
/// # Errors
/// - [`Error::InvalidParameter`] if `period` is not finite and positive. Raised before any integration.
/// - [`Error::Integration`] if a coefficient has no closed form or is not finite.
pub fn compute_series<T: Value>(
    function: &Expr<T>,
    variable: &Symbol,
    period: T,
    order: usize,
) -> Result<FourierSeries<T>> {
    CoefficientEngine::new(function, variable, period)?.series(order)
}

/// Computes Fourier coefficients of one function, one harmonic at a time.
///
/// The function is lowered into its integrable form once, in [`CoefficientEngine::new`];
/// each coefficient after that is a single closed-form integral.
#[derive(Debug, Clone)]
pub struct CoefficientEngine<T: Value = f64> {
    function: ExpPolynomial<T>,
    variable: Symbol,
    period: T,
    snap_threshold: T,
}

impl<T: Value> CoefficientEngine<T> {
    /// Prepares `function` of `variable` for integration over one period.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] if `period` is not finite and positive
    /// - [`Error::Integration`] if the function is outside the integrable class
    pub fn new(function: &Expr<T>, variable: &Symbol, period: T) -> Result<Self> {
        validate_period(period)?;

        tracing::debug!(%function, %variable, %period, "lowering function");
        let lowered = ExpPolynomial::lower(function, variable)?;
        tracing::trace!(terms = lowered.terms().len(), "lowered function");

        // |aₙ| and |bₙ| are at most 2·max|f|
        let reach = period / T::two();
        let tolerance = nalgebra::RealField::max(
            T::try_cast(SNAP_TOLERANCE)?,
            T::epsilon() * T::from_positive_int(64),
        );
        let snap_threshold = tolerance * T::two() * lowered.magnitude_bound(reach);

        Ok(Self {
            function: lowered,
            variable: variable.clone(),
            period,
            snap_threshold,
        })
    }

    /// The period `T`
    pub fn period(&self) -> T {
        self.period
    }

    /// The integration variable
    pub fn variable(&self) -> &Symbol {
        &self.variable
    }

    /// Angular frequency of harmonic `n`, `2πn/T`
    pub fn angular_frequency(&self, n: usize) -> T {
        T::two_pi() * T::from_positive_int(n) / self.period
    }

    /// `∫ f(t)·e^(-inωt) dt` over one period
    fn transform(&self, n: usize) -> Result<nalgebra::Complex<T>> {
        let half = self.period / T::two();
        let rate = nalgebra::Complex::new(T::zero(), -self.angular_frequency(n));

        let modulated = if n == 0 {
            self.function.clone()
        } else {
            self.function.modulate(rate)
        };

        modulated.integrate(-half, half)
    }

    fn snap(&self, coefficient: T) -> T {
        if Value::abs(coefficient) <= self.snap_threshold {
            T::zero()
        } else {
            coefficient
        }
    }

    /// The constant term, `a₀/2`: the mean of the function over one period.
    ///
    /// # Errors
    /// Returns [`Error::Integration`] if the integral is not finite
    pub fn constant(&self) -> Result<T> {
        let integral = self.transform(0)?;
        Ok(self.snap(integral.re / self.period))
    }

    /// The cosine and sine coefficients `(aₙ, bₙ)` of harmonic `n`.
    ///
    /// For `n = 0` this is `(a₀, 0)`, twice the constant term.
    ///
    /// # Errors
    /// Returns [`Error::Integration`] if an integral is not finite
    pub fn harmonic(&self, n: usize) -> Result<(T, T)> {
        let integral = self.transform(n)?;
        let scale = T::two() / self.period;

        // ∫f·e^(-iθ) = ∫f·cos(θ) - i∫f·sin(θ)
        let a = self.snap(scale * integral.re);
        let b = self.snap(-scale * integral.im);

        tracing::trace!(n, %a, %b, "harmonic");
        Ok((a, b))
    }

    /// Assembles the series truncated at harmonic `order`.
    ///
    /// # Errors
    /// Returns [`Error::Integration`] if any coefficient is not finite. No partial series is returned.
    pub fn series(&self, order: usize) -> Result<FourierSeries<T>> {
        tracing::debug!(variable = %self.variable, period = %self.period, order, "computing series");

        let mut terms = Vec::with_capacity(2 * order + 1);
        terms.push(SeriesTerm {
            coefficient: self.constant()?,
            harmonic: 0,
            kind: TrigKind::Constant,
        });

        for n in 1..=order {
            let (a, b) = self.harmonic(n)?;
            terms.push(SeriesTerm {
                coefficient: a,
                harmonic: n,
                kind: TrigKind::Cosine,
            });
            terms.push(SeriesTerm {
                coefficient: b,
                harmonic: n,
                kind: TrigKind::Sine,
            });
        }

        Ok(FourierSeries {
            variable: self.variable.clone(),
            period: self.period,
            terms,
        })
    }
}

/// A truncated Fourier series in one variable.
///
/// Holds the constant term and one cosine and one sine term for each harmonic `1..=N`,
/// in that order. Zero coefficients are kept, so the layout depends only on `N`.
///
/// Evaluation ([`FourierSeries::y`]) is a fold over the terms.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierSeries<T: Value = f64> {
    variable: Symbol,
    period: T,
    terms: Vec<SeriesTerm<T>>,
}

impl<T: Value> FourierSeries<T> {
    /// Computes the series of `function`; see [`compute_series`]
    ///
    /// # Errors
    /// See [`compute_series`]
    pub fn compute(function: &Expr<T>, variable: &Symbol, period: T, order: usize) -> Result<Self> {
        compute_series(function, variable, period, order)
    }

    /// The variable the series is written in
    pub fn variable(&self) -> &Symbol {
        &self.variable
    }

    /// The period `T`
    pub fn period(&self) -> T {
        self.period
    }

    /// Fundamental angular frequency `ω = 2π/T`
    pub fn angular_frequency(&self) -> T {
        T::two_pi() / self.period
    }

    /// Truncation order `N`
    pub fn order(&self) -> usize {
        self.terms.len() / 2
    }

    /// Number of harmonic contributions, the constant included: `N + 1`
    pub fn harmonic_count(&self) -> usize {
        self.order() + 1
    }

    /// The `(coefficient, harmonic, kind)` triples, constant first
    pub fn terms(&self) -> &[SeriesTerm<T>] {
        &self.terms
    }

    /// The constant term `a₀/2`
    pub fn constant(&self) -> T {
        self.terms.first().map_or_else(T::zero, |t| t.coefficient)
    }

    /// Cosine coefficient `aₙ`, or `None` past the truncation order
    pub fn cosine(&self, n: usize) -> Option<T> {
        self.find(n, TrigKind::Cosine)
    }

    /// Sine coefficient `bₙ`, or `None` past the truncation order
    pub fn sine(&self, n: usize) -> Option<T> {
        self.find(n, TrigKind::Sine)
    }

    fn find(&self, n: usize, kind: TrigKind) -> Option<T> {
        if n == 0 {
            return None;
        }

        let index = 2 * n - 1 + usize::from(kind == TrigKind::Sine);
        self.terms.get(index).map(|t| t.coefficient)
    }

    /// Returns true if every harmonic coefficient is zero
    pub fn is_constant(&self) -> bool {
        self.terms.iter().skip(1).all(|t| t.coefficient == T::zero())
    }

    /// Value of the series at `t`
    pub fn y(&self, t: T) -> T {
        let omega = self.angular_frequency();
        self.terms.iter().fold(T::zero(), |acc, term| acc + term.y(omega, t))
    }

    /// Evaluates the series at each `x`, returning `(x, y)` pairs
    pub fn solve(&self, x: impl IntoIterator<Item = T>) -> Vec<(T, T)> {
        x.into_iter().map(|x| (x, self.y(x))).collect()
    }

    /// The partial series up to harmonic `order`.
    ///
    /// Returns an unchanged copy if `order` is not below the current order.
    #[must_use]
    pub fn truncate(&self, order: usize) -> Self {
        let len = (2 * order + 1).min(self.terms.len());
        Self {
            variable: self.variable.clone(),
            period: self.period,
            terms: self.terms[..len].to_vec(),
        }
    }

    /// The series as a single symbolic expression. Zero terms are omitted.
    pub fn to_expr(&self) -> Expr<T> {
        let omega = self.angular_frequency();
        let t = Expr::var(&self.variable);

        let mut expr: Option<Expr<T>> = None;
        for term in self.terms.iter().filter(|t| t.coefficient != T::zero()) {
            let part = match term.kind {
                TrigKind::Constant => Expr::Const(term.coefficient),
                kind => {
                    let frequency = omega * T::from_positive_int(term.harmonic);
                    let argument = Expr::Const(frequency) * t.clone();
                    let basis = if kind == TrigKind::Cosine { argument.cos() } else { argument.sin() };
                    Expr::Const(term.coefficient) * basis
                }
            };

            expr = Some(match expr {
                Some(sum) => sum + part,
                None => part,
            });
        }

        expr.unwrap_or(Expr::Const(T::zero()))
    }

    /// Mean squared error against `reference`, both sampled at `sample_count` points over one period.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] if `sample_count` is zero
    /// - [`Error::Evaluation`] if `reference` fails at any sample position
    pub fn mean_squared_error<E>(&self, reference: &E, sample_count: usize) -> Result<T>
    where
        E: Evaluate<T> + ?Sized,
    {
        let expected = sample(reference, self.period, sample_count)?;
        let actual = expected.positions().iter().map(|&t| self.y(t));
        Ok(statistics::mean_squared_error(expected.values().iter().copied(), actual))
    }
}

impl<T: Value> Display for FourierSeries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::format_series(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_close, function};
    use std::f64::consts::PI;

    #[test]
    fn test_constant_function() {
        function!(f(t) = 3.5);
        for order in 0..=5 {
            let series = compute_series(&f, &t, 2.0 * PI, order).unwrap();
            assert_eq!(series.harmonic_count(), order + 1);
            assert_close!(series.constant(), 3.5);
            assert!(series.is_constant(), "{series:?}");
        }
    }

    #[test]
    fn test_even_polynomial() {
        function!(f(t) = -2 t^2);
        let series = compute_series(&f, &t, 2.0 * PI, 1).unwrap();

        assert_close!(series.constant(), -2.0 * PI * PI / 3.0);
        assert_close!(series.cosine(1).unwrap(), 8.0);
        assert_eq!(series.sine(1), Some(0.0));
        assert_eq!(series.cosine(2), None);
    }

    #[test]
    fn test_known_coefficients() {
        // t² on [-π, π]: aₙ = 4(-1)ⁿ/n²
        function!(f(t) = t^2);
        let series = compute_series(&f, &t, 2.0 * PI, 8).unwrap();
        for n in 1..=8 {
            let expected = 4.0 * (-1f64).powi(n as i32) / (n * n) as f64;
            assert_close!(series.cosine(n).unwrap(), expected, tol = 1e-10);
            assert_eq!(series.sine(n), Some(0.0));
        }

        // t on [-π, π]: bₙ = 2(-1)ⁿ⁺¹/n
        function!(g(t) = t);
        let series = compute_series(&g, &t, 2.0 * PI, 5).unwrap();
        assert_eq!(series.constant(), 0.0);
        for n in 1..=5 {
            let expected = 2.0 * (-1f64).powi(n as i32 + 1) / n as f64;
            assert_eq!(series.cosine(n), Some(0.0));
            assert_close!(series.sine(n).unwrap(), expected, tol = 1e-10);
        }
    }

    #[test]
    fn test_trig_polynomial_is_exact() {
        // -3cos³(t) + sin⁴(t) = 3/8 - 9/4·cos(t) - 1/2·cos(2t) - 3/4·cos(3t) + 1/8·cos(4t)
        function!(f(t) = -3 cos(t)^3 + sin(t)^4);
        let series = compute_series(&f, &t, 2.0 * PI, 6).unwrap();

        assert_close!(series.constant(), 3.0 / 8.0);
        let expected = [-9.0 / 4.0, -0.5, -0.75, 0.125, 0.0, 0.0];
        for (n, a) in expected.into_iter().enumerate() {
            assert_close!(series.cosine(n + 1).unwrap(), a);
            assert_eq!(series.sine(n + 1), Some(0.0));
        }
    }

    #[test]
    fn test_other_periods() {
        // Square of a sine with period 4: sin²(πt/2) = 1/2 - cos(πt)/2, the second harmonic
        function!(f(t) = sin(pi t / 2)^2);
        let series = compute_series(&f, &t, 4.0, 3).unwrap();
        assert_close!(series.constant(), 0.5);
        assert_eq!(series.cosine(1), Some(0.0));
        assert_close!(series.cosine(2).unwrap(), -0.5);
        assert_eq!(series.cosine(3), Some(0.0));
    }

    #[test]
    fn test_order_zero_is_mean() {
        function!(f(t) = exp(t) + t^3);
        let series = compute_series(&f, &t, 2.0, 0).unwrap();
        assert_eq!(series.terms().len(), 1);
        assert_close!(series.constant(), (1f64.exp() - (-1f64).exp()) / 2.0);
        assert_close!(series.y(0.7), series.constant());
    }

    #[test]
    fn test_term_layout() {
        function!(f(t) = t);
        let series = compute_series(&f, &t, 2.0 * PI, 3).unwrap();
        let layout: Vec<_> = series.terms().iter().map(|t| (t.harmonic, t.kind)).collect();
        assert_eq!(
            layout,
            vec![
                (0, TrigKind::Constant),
                (1, TrigKind::Cosine),
                (1, TrigKind::Sine),
                (2, TrigKind::Cosine),
                (2, TrigKind::Sine),
                (3, TrigKind::Cosine),
                (3, TrigKind::Sine),
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        function!(f(t) = exp(-t) * cos(3 t) + t^2);
        let a = compute_series(&f, &t, 3.0, 7).unwrap();
        let b = compute_series(&f, &t, 3.0, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncate_matches_lower_order() {
        function!(f(t) = -2 t^2 + t);
        let full = compute_series(&f, &t, 2.0 * PI, 6).unwrap();
        for order in 0..=6 {
            let direct = compute_series(&f, &t, 2.0 * PI, order).unwrap();
            assert_eq!(full.truncate(order), direct);
        }
        assert_eq!(full.truncate(10), full);
    }

    #[test]
    fn test_incremental_engine_matches_series() {
        function!(f(t) = t * exp(t / 4));
        let engine = CoefficientEngine::new(&f, &t, 2.0 * PI).unwrap();
        let series = engine.series(4).unwrap();

        assert_eq!(engine.constant().unwrap(), series.constant());
        let (a0, b0) = engine.harmonic(0).unwrap();
        assert_close!(a0, 2.0 * series.constant());
        assert_eq!(b0, 0.0);

        for n in 1..=4 {
            let (a, b) = engine.harmonic(n).unwrap();
            assert_eq!(Some(a), series.cosine(n));
            assert_eq!(Some(b), series.sine(n));
        }
    }

    #[test]
    fn test_mse_non_increasing() {
        function!(f(t) = -2 t^2);
        let signal = f.in_terms_of(&t);

        let mut previous = f64::INFINITY;
        for order in 0..=8 {
            let series = compute_series(&f, &t, 2.0 * PI, order).unwrap();
            let mse = series.mean_squared_error(&signal, 256).unwrap();
            assert!(mse <= previous + 1e-12, "N = {order}: {mse} > {previous}");
            previous = mse;
        }
    }

    #[test]
    fn test_series_expression_round_trip() {
        // A trig polynomial is its own Fourier series
        function!(f(t) = 1 + cos(t) - 0.5 sin(3 t));
        let series = compute_series(&f, &t, 2.0 * PI, 4).unwrap();
        let again = compute_series(&series.to_expr(), &t, 2.0 * PI, 4).unwrap();

        for (a, b) in series.terms().iter().zip(again.terms()) {
            assert_close!(a.coefficient, b.coefficient);
        }
    }

    #[test]
    fn test_invalid_period() {
        function!(f(t) = t);
        for period in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = compute_series(&f, &t, period, 3).unwrap_err();
            assert!(err.is_invalid_parameter(), "{period}: {err}");
        }

        // Validated before the function is even looked at
        function!(g(t) = abs(t));
        assert!(compute_series(&g, &t, -1.0, 3).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_high_degree_polynomials() {
        fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
            let h = (b - a) / n as f64;
            let inner: f64 = (1..n).map(|i| f(a + i as f64 * h) * if i % 2 == 1 { 4.0 } else { 2.0 }).sum();
            (f(a) + f(b) + inner) * h / 3.0
        }

        let t = Symbol::new("t");
        for power in [20, 30, 40] {
            let f: Expr = format!("t^{power}").parse().unwrap();
            let series = compute_series(&f, &t, 2.0 * PI, 3).unwrap();
            for n in 1..=3 {
                let expected = simpson(|x| x.powi(power) * (n as f64 * x).cos(), -PI, PI, 20_000) / PI;
                assert_close!(series.cosine(n).unwrap(), expected, tol = 1e-8, "t^{power}, a{n}");
                assert_eq!(series.sine(n), Some(0.0));
            }
        }
    }

    #[test]
    fn test_checked_order() {
        assert_eq!(checked_order(0u8).unwrap(), 0);
        assert_eq!(checked_order(6i64).unwrap(), 6);
        assert!(checked_order(-1i32).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_unintegrable_function() {
        function!(f(t) = abs(t));
        assert!(matches!(compute_series(&f, &t, 2.0 * PI, 2), Err(Error::Integration(_))));

        function!(g(t) = t + s);
        assert!(matches!(compute_series(&g, &t, 2.0 * PI, 2), Err(Error::Integration(_))));
    }

    #[test]
    fn test_f32() {
        let t = Symbol::new("t");
        let f: Expr<f32> = "-2*t^2".parse().unwrap();
        let series = compute_series(&f, &t, 2.0 * std::f32::consts::PI, 2).unwrap();
        assert!((series.cosine(1).unwrap() - 8.0).abs() < 1e-3);
        assert_eq!(series.sine(1), Some(0.0));
    }
}
