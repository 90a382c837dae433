//! Closed-form definite integration
//!
//! Expressions are lowered into an [`ExpPolynomial`]: a finite sum of terms `c·tᵖ·e^(z·t)` with
//! complex `c` and `z`. That class is closed under addition, multiplication, integer powers and
//! scaling, and it contains every polynomial and every `sin`, `cos` or `exp` of an affine
//! argument, so it covers the usual textbook periodic functions and their products.
//!
//! Each term is integrated exactly by repeated integration by parts,
//! `∫ tᵖ·e^(zt) dt = tᵖ·e^(zt)/z - (p/z)·∫ tᵖ⁻¹·e^(zt) dt`, run in whichever direction keeps
//! rounding errors from growing. See [`ExpTerm::integrate`].
//!
//! ```rust
//! use fourier_series::{expr::{Expr, Symbol}, integrate::ExpPolynomial};
//!
//! let t = Symbol::new("t");
//! let f: Expr = "t*cos(t)^2".parse().unwrap();
//! let lowered = ExpPolynomial::lower(&f, &t).unwrap();
//!
//! // Odd integrand over a symmetric interval
//! let area = lowered.integrate(-1.0, 1.0).unwrap();
//! assert!(area.re.abs() < 1e-12 && area.im.abs() < 1e-12);
//! ```
use nalgebra::Complex;

use crate::{
    error::{Error, Result},
    expr::{Expr, Function, Symbol},
    value::Value,
};

/// Upper bound on the number of terms a lowered expression may expand to
pub const MAX_TERMS: usize = 4096;

/// Largest power of the variable a lowered expression may contain
pub const MAX_POWER: u32 = 64;

/// Most orders the downward recurrence starts above the requested power
const MAX_RECURRENCE: u32 = 1024;

/// A single term `c·tᵖ·e^(z·t)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpTerm<T: Value = f64> {
    /// Complex coefficient `c`
    pub coefficient: Complex<T>,

    /// Power of the variable `p`
    pub power: u32,

    /// Complex rate `z`
    pub rate: Complex<T>,
}

impl<T: Value> ExpTerm<T> {
    /// Value of the term at `t`
    pub fn y(&self, t: T) -> Complex<T> {
        self.coefficient * exp_complex(self.rate, t) * Value::powi(t, power_i32(self.power))
    }

    /// Exact value of `∫ₐᵇ c·tᵖ·e^(zt) dt`
    pub fn integrate(&self, a: T, b: T) -> Complex<T> {
        self.coefficient * (from_origin(self.power, self.rate, b) - from_origin(self.power, self.rate, a))
    }
}

/// `∫₀ˣ tᵖ·e^(zt) dt`, computed as `xᵖ⁺¹ · ∫₀¹ sᵖ·e^(zxs) ds`
fn from_origin<T: Value>(power: u32, rate: Complex<T>, x: T) -> Complex<T> {
    if x == T::zero() {
        return complex(T::zero());
    }

    unit_moment(power, rate * x) * Value::powi(x, power_i32(power).saturating_add(1))
}

/// `Jₚ = ∫₀¹ sᵖ·e^(ws) ds`, by integration by parts:
/// ```text
/// w·Jₖ = e^w - k·Jₖ₋₁,    w·J₀ = e^w - 1
/// ```
/// Rounding errors grow by `k/|w|` per step going up and by `|w|/k` going down. For `|w| >= p`
/// the recurrence runs up from `J₀`; otherwise it runs down from an order high enough that
/// starting at zero has decayed below `ε` by the time it reaches `p`.
fn unit_moment<T: Value>(power: u32, w: Complex<T>) -> Complex<T> {
    let ew = exp_complex(w, T::one());
    let size = modulus(w);

    if size >= nalgebra::RealField::max(T::from_positive_int(power as usize), T::one()) {
        let mut moment = (ew - complex(T::one())) / w;
        for k in 1..=power {
            moment = (ew - moment * T::from_positive_int(k as usize)) / w;
        }
        return moment;
    }

    let mut top = power;
    let mut decay = T::one();
    while decay > T::epsilon() && top < power.saturating_add(MAX_RECURRENCE) {
        top += 1;
        decay *= size / T::from_positive_int(top as usize);
    }

    let mut moment = complex(T::zero());
    for k in (power..top).rev() {
        moment = (ew - w * moment) / T::from_positive_int(k as usize + 1);
    }
    moment
}

/// A finite sum of `c·tᵖ·e^(z·t)` terms; the integrable form of an [`Expr`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExpPolynomial<T: Value = f64> {
    terms: Vec<ExpTerm<T>>,
}

impl<T: Value> ExpPolynomial<T> {
    /// The zero function
    #[must_use]
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// A constant function
    pub fn constant(value: T) -> Self {
        Self::from_term(ExpTerm {
            coefficient: complex(value),
            power: 0,
            rate: complex(T::zero()),
        })
    }

    /// The identity function `t`
    #[must_use]
    pub fn identity() -> Self {
        Self::from_term(ExpTerm {
            coefficient: complex(T::one()),
            power: 1,
            rate: complex(T::zero()),
        })
    }

    /// `e^(z·t)`
    pub fn exponential(coefficient: Complex<T>, rate: Complex<T>) -> Self {
        Self::from_term(ExpTerm {
            coefficient,
            power: 0,
            rate,
        })
    }

    fn from_term(term: ExpTerm<T>) -> Self {
        let mut p = Self::zero();
        p.push(term);
        p
    }

    /// The terms of the sum
    #[must_use]
    pub fn terms(&self) -> &[ExpTerm<T>] {
        &self.terms
    }

    /// Lowers `expr` into a sum of exponential-polynomial terms in `variable`.
    ///
    /// # Errors
    /// Returns [`Error::Integration`] if the expression is outside the closed class:
    /// - other free symbols
    /// - division by an expression of the variable
    /// - non-integer, negative or very large powers of the variable
    /// - `sin`, `cos` or `exp` of a non-affine argument, or `tan`, `ln`, `sqrt`, `abs` of the variable
    /// - an expansion larger than [`MAX_TERMS`], or with a power of the variable above [`MAX_POWER`]
    pub fn lower(expr: &Expr<T>, variable: &Symbol) -> Result<Self> {
        if !expr.contains(variable) {
            return constant_of(expr).map(Self::constant);
        }

        match expr {
            Expr::Const(_) | Expr::Pi | Expr::E => constant_of(expr).map(Self::constant),
            Expr::Var(_) => Ok(Self::identity()),

            Expr::Add(a, b) => Ok(Self::lower(a, variable)?.add(&Self::lower(b, variable)?)),
            Expr::Sub(a, b) => Ok(Self::lower(a, variable)?.add(&Self::lower(b, variable)?.scale(-T::one()))),
            Expr::Neg(a) => Ok(Self::lower(a, variable)?.scale(-T::one())),
            Expr::Mul(a, b) => Self::lower(a, variable)?.mul(&Self::lower(b, variable)?),

            Expr::Div(a, b) => {
                if b.contains(variable) {
                    return Err(Error::Integration(format!(
                        "division by `{b}`, which depends on `{variable}`"
                    )));
                }

                let divisor = constant_of(b)?;
                if divisor == T::zero() {
                    return Err(Error::Integration(format!("division by zero in `{expr}`")));
                }

                Ok(Self::lower(a, variable)?.scale(T::one() / divisor))
            }

            Expr::Pow(base, exponent) => {
                if exponent.contains(variable) {
                    // aᶠ⁽ᵗ⁾ = e^(ln(a)·f(t))
                    if base.contains(variable) {
                        return Err(Error::Integration(format!("no closed form for `{expr}`")));
                    }

                    let base = constant_of(base)?;
                    if base <= T::zero() {
                        return Err(Error::Integration(format!(
                            "`{expr}` needs a positive base"
                        )));
                    }

                    let rate = Self::lower(exponent, variable)?.scale(base.ln());
                    return Self::exp_of(&rate, expr);
                }

                let n = constant_of(exponent)?;
                let n = integer_power(n).ok_or_else(|| {
                    Error::Integration(format!(
                        "`{expr}` is not a non-negative integer power (at most {MAX_POWER})"
                    ))
                })?;

                Self::lower(base, variable)?.pow(n)
            }

            Expr::Call(function, argument) => {
                let inner = Self::lower(argument, variable)?;
                match function {
                    Function::Exp => Self::exp_of(&inner, expr),

                    Function::Sin | Function::Cos => {
                        let (slope, intercept) = inner.as_affine().ok_or_else(|| {
                            Error::Integration(format!("`{function}` of non-affine argument in `{expr}`"))
                        })?;

                        // e^(±i(αt + β)) halves
                        let rotation = Complex::new(intercept.cos(), intercept.sin());
                        let rate = Complex::new(T::zero(), slope);
                        let half = complex(T::one() / T::two());

                        let (up, down) = match function {
                            Function::Cos => (rotation * half, rotation.conj() * half),
                            _ => {
                                let two_i = Complex::new(T::zero(), T::two());
                                (rotation / two_i, -(rotation.conj() / two_i))
                            }
                        };

                        Ok(Self::exponential(up, rate).add(&Self::exponential(down, -rate)))
                    }

                    Function::Tan | Function::Ln | Function::Sqrt | Function::Abs => Err(Error::Integration(
                        format!("no closed form for `{function}` of `{argument}`"),
                    )),
                }
            }
        }
    }

    /// `e^(self)` for an affine real exponent
    fn exp_of(exponent: &Self, expr: &Expr<T>) -> Result<Self> {
        let (slope, intercept) = exponent
            .as_affine()
            .ok_or_else(|| Error::Integration(format!("`exp` of non-affine argument in `{expr}`")))?;

        Ok(Self::exponential(complex(intercept.exp()), complex(slope)))
    }

    /// Splits a real `αt + β` into `(α, β)`.
    ///
    /// Returns `None` if any term has an exponential part, a power above 1, or an imaginary part.
    pub fn as_affine(&self) -> Option<(T, T)> {
        let mut slope = T::zero();
        let mut intercept = T::zero();

        for term in &self.terms {
            if term.rate != complex(T::zero()) || term.coefficient.im != T::zero() {
                return None;
            }

            match term.power {
                0 => intercept += term.coefficient.re,
                1 => slope += term.coefficient.re,
                _ => return None,
            }
        }

        Some((slope, intercept))
    }

    /// Sum of two functions
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut sum = self.clone();
        for term in &other.terms {
            sum.push(*term);
        }
        sum
    }

    /// Function scaled by a real factor
    #[must_use]
    pub fn scale(&self, factor: T) -> Self {
        let mut scaled = Self::zero();
        for term in &self.terms {
            scaled.push(ExpTerm {
                coefficient: term.coefficient * factor,
                ..*term
            });
        }
        scaled
    }

    /// Multiplies every term by `e^(z·t)`
    #[must_use]
    pub fn modulate(&self, rate: Complex<T>) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|term| ExpTerm {
                    rate: term.rate + rate,
                    ..*term
                })
                .collect(),
        }
    }

    /// Product of two functions
    ///
    /// # Errors
    /// Returns [`Error::Integration`] if the product expands past [`MAX_TERMS`], or a power of the
    /// variable past [`MAX_POWER`]
    pub fn mul(&self, other: &Self) -> Result<Self> {
        let mut product = Self::zero();
        for a in &self.terms {
            for b in &other.terms {
                let power = a
                    .power
                    .checked_add(b.power)
                    .filter(|&p| p <= MAX_POWER)
                    .ok_or_else(|| Error::Integration(format!("expansion raises the variable past power {MAX_POWER}")))?;

                product.push(ExpTerm {
                    coefficient: a.coefficient * b.coefficient,
                    power,
                    rate: a.rate + b.rate,
                });
            }

            if product.terms.len() > MAX_TERMS {
                return Err(Error::Integration(format!("expansion exceeds {MAX_TERMS} terms")));
            }
        }

        Ok(product)
    }

    /// Raises the function to a non-negative integer power
    ///
    /// # Errors
    /// Returns [`Error::Integration`] if the expansion exceeds [`MAX_TERMS`] or [`MAX_POWER`]
    pub fn pow(&self, n: u32) -> Result<Self> {
        let mut result = Self::constant(T::one());
        let mut base = self.clone();
        let mut n = n;

        while n > 0 {
            if n & 1 == 1 {
                result = result.mul(&base)?;
            }

            n >>= 1;
            if n > 0 {
                base = base.mul(&base)?;
            }
        }

        Ok(result)
    }

    /// Value of the function at `t`
    pub fn y(&self, t: T) -> Complex<T> {
        self.terms.iter().fold(complex(T::zero()), |acc, term| acc + term.y(t))
    }

    /// Exact value of the definite integral over `[a, b]`
    ///
    /// # Errors
    /// Returns [`Error::Integration`] if the result is not finite
    pub fn integrate(&self, a: T, b: T) -> Result<Complex<T>> {
        let total = self
            .terms
            .iter()
            .fold(complex(T::zero()), |acc, term| acc + term.integrate(a, b));

        if total.re.is_real() && total.im.is_real() {
            Ok(total)
        } else {
            Err(Error::Integration(format!(
                "integral over [{a}, {b}] is not finite"
            )))
        }
    }

    /// Upper bound on `|f(t)|` for `|t| <= reach`
    pub fn magnitude_bound(&self, reach: T) -> T {
        self.terms.iter().fold(T::zero(), |acc, term| {
            let growth = (Value::abs(term.rate.re) * reach).exp();
            acc + modulus(term.coefficient) * Value::powi(reach, power_i32(term.power)) * growth
        })
    }

    /// Adds a term, merging it into an existing term with the same power and rate
    fn push(&mut self, term: ExpTerm<T>) {
        if term.coefficient == complex(T::zero()) {
            return;
        }

        let existing = self
            .terms
            .iter_mut()
            .find(|t| t.power == term.power && same_rate(t.rate, term.rate));

        match existing {
            Some(t) => {
                t.coefficient += term.coefficient;
                if t.coefficient == complex(T::zero()) {
                    self.terms.retain(|t| t.coefficient != complex(T::zero()));
                }
            }
            None => self.terms.push(term),
        }
    }
}

fn constant_of<T: Value>(expr: &Expr<T>) -> Result<T> {
    if let Some(Expr::Var(symbol)) = first_symbol(expr) {
        return Err(Error::Integration(format!(
            "`{expr}` depends on `{symbol}`, which is not the integration variable"
        )));
    }

    expr.constant_value()
        .ok_or_else(|| Error::Integration(format!("`{expr}` is not a finite constant")))
}

fn first_symbol<T: Value>(expr: &Expr<T>) -> Option<&Expr<T>> {
    match expr {
        Expr::Var(_) => Some(expr),
        Expr::Const(_) | Expr::Pi | Expr::E => None,
        Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
            first_symbol(a).or_else(|| first_symbol(b))
        }
        Expr::Neg(a) | Expr::Call(_, a) => first_symbol(a),
    }
}

fn integer_power<T: Value>(n: T) -> Option<u32> {
    if num_traits::float::FloatCore::fract(n) != T::zero() {
        return None;
    }

    num_traits::cast::<T, u32>(n).filter(|&n| n <= MAX_POWER)
}

fn same_rate<T: Value>(a: Complex<T>, b: Complex<T>) -> bool {
    if a == b {
        return true;
    }

    let scale = nalgebra::RealField::max(
        T::one(),
        nalgebra::RealField::max(modulus_squared(a), modulus_squared(b)),
    );
    let tolerance = T::epsilon() * T::from_positive_int(64);
    modulus_squared(a - b) <= tolerance * tolerance * scale
}

fn complex<T: Value>(re: T) -> Complex<T> {
    Complex::new(re, T::zero())
}

fn modulus_squared<T: Value>(z: Complex<T>) -> T {
    z.re * z.re + z.im * z.im
}

fn modulus<T: Value>(z: Complex<T>) -> T {
    modulus_squared(z).sqrt()
}

/// `e^(z·t)`
fn exp_complex<T: Value>(z: Complex<T>, t: T) -> Complex<T> {
    let magnitude = (z.re * t).exp();
    let phase = z.im * t;
    Complex::new(magnitude * phase.cos(), magnitude * phase.sin())
}

fn power_i32(p: u32) -> i32 {
    i32::try_from(p).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    fn lower(src: &str) -> ExpPolynomial {
        let expr: Expr = src.parse().unwrap();
        ExpPolynomial::lower(&expr, &Symbol::new("t")).unwrap()
    }

    fn integral(src: &str, a: f64, b: f64) -> Complex<f64> {
        lower(src).integrate(a, b).unwrap()
    }

    #[test]
    fn test_lowering_matches_evaluation() {
        let t = Symbol::new("t");
        for src in [
            "-2*t^2",
            "-3*cos(t)^3 + sin(t)^4",
            "exp(-t/2)*sin(3*t + 1)",
            "(t - 1)^3*cos(2*t)",
            "2^t",
            "7",
        ] {
            let expr: Expr = src.parse().unwrap();
            let lowered = ExpPolynomial::lower(&expr, &t).unwrap();
            for x in [-2.5, -1.0, 0.0, 0.3, 2.0] {
                let y = lowered.y(x);
                assert_close!(y.re, expr.evaluate(&t, x).unwrap(), tol = 1e-12, "{src} at {x}");
                assert_close!(y.im, 0.0, tol = 1e-12, "{src} at {x}");
            }
        }
    }

    #[test]
    fn test_polynomial_integrals() {
        let pi = std::f64::consts::PI;
        assert_close!(integral("1", -1.0, 1.0).re, 2.0);
        assert_close!(integral("t^2", -1.0, 2.0).re, 3.0);
        assert_close!(integral("-2*t^2", -pi, pi).re, -4.0 * pi.powi(3) / 3.0);
    }

    #[test]
    fn test_trig_integrals() {
        let pi = std::f64::consts::PI;
        assert_close!(integral("sin(t)", 0.0, pi).re, 2.0);
        assert_close!(integral("cos(t)^2", -pi, pi).re, pi);
        assert_close!(integral("t*sin(t)", -pi, pi).re, 2.0 * pi);
        assert_close!(integral("t^2*cos(t)", -pi, pi).re, -4.0 * pi);
    }

    #[test]
    fn test_exponential_integrals() {
        let e = std::f64::consts::E;
        assert_close!(integral("exp(t)", 0.0, 1.0).re, e - 1.0);
        assert_close!(integral("t*exp(t)", 0.0, 3.0).re, 2.0 * 3f64.exp() + 1.0);

        // Small rate takes the downward recurrence
        assert_close!(integral("exp(t/1000)", -1.0, 1.0).re, 2000.0 * (0.001f64).sinh());
    }

    #[test]
    fn test_like_terms_merge() {
        // cos² + sin² collapses to a single constant term
        let p = lower("cos(t)^2 + sin(t)^2");
        assert_eq!(p.terms().len(), 1);
        assert_close!(p.terms()[0].coefficient.re, 1.0);

        // cos(t)^20 expands to 21 distinct frequencies, not 2^20 products
        assert_eq!(lower("cos(t)^20").terms().len(), 21);
    }

    #[test]
    fn test_affine_detection() {
        assert_eq!(lower("3*t + 2").as_affine(), Some((3.0, 2.0)));
        assert_eq!(lower("t^2").as_affine(), None);
        assert_eq!(lower("cos(t)").as_affine(), None);
    }

    #[test]
    fn test_unsupported_expressions() {
        let t = Symbol::new("t");
        for src in ["abs(t)", "ln(t)", "sin(t^2)", "1/t", "t^0.5", "t^-1", "sqrt(t)", "t*s", "exp(cos(t))", "t^t", "t/0"] {
            let expr: Expr = src.parse().unwrap();
            match ExpPolynomial::lower(&expr, &t) {
                Err(Error::Integration(_)) => {}
                other => panic!("{src}: expected an integration error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_constant_subexpressions_may_use_any_function() {
        // Only the variable's dependence has to be integrable
        let p = lower("ln(2)*t + sqrt(4)");
        assert_eq!(p.as_affine(), Some((2f64.ln(), 2.0)));
    }

    #[test]
    fn test_expansion_limit() {
        let t = Symbol::new("t");
        let expr: Expr = "(t + cos(t) + sin(3*t) + exp(t))^64".parse().unwrap();
        assert!(matches!(ExpPolynomial::lower(&expr, &t), Err(Error::Integration(_))));
    }

    /// Composite Simpson's rule on `n` intervals
    fn simpson(f: impl Fn(f64) -> Complex<f64>, a: f64, b: f64, n: usize) -> Complex<f64> {
        let h = (b - a) / n as f64;
        let mut sum = f(a) + f(b);
        for i in 1..n {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += f(a + h * i as f64) * weight;
        }
        sum * (h / 3.0)
    }

    #[test]
    fn test_terms_match_quadrature_up_to_max_power() {
        let pi = std::f64::consts::PI;
        for power in [0, 1, 2, 5, 10, 20, 30, 40, 50, MAX_POWER] {
            // Rates on both sides of |z|·reach = p, where the recurrence changes direction
            let pivot = f64::from(power) / pi;
            let rates = [
                Complex::new(0.0, 1.0),
                Complex::new(0.0, 3.0),
                Complex::new(0.0, 65.0),
                Complex::new(0.0, pivot * 0.98),
                Complex::new(0.0, pivot * 1.02),
                Complex::new(0.001, 0.0),
                Complex::new(-1.5, 0.0),
                Complex::new(2.0, 3.0),
            ];

            for rate in rates {
                let term = ExpTerm {
                    coefficient: Complex::new(1.0, 0.0),
                    power,
                    rate,
                };

                for (a, b) in [(-pi, pi), (-2.5, 0.5)] {
                    let integrand = |t: f64| term.y(t);
                    let expected = simpson(integrand, a, b, 20_000);
                    let scale = simpson(|t| Complex::new(integrand(t).norm(), 0.0), a, b, 20_000).re;

                    let error = (term.integrate(a, b) - expected).norm() / scale;
                    assert!(error < 1e-8, "t^{power}·e^({rate}t) on [{a}, {b}]: relative error {error:e}");
                }
            }
        }
    }

    #[test]
    fn test_high_power_moments() {
        let pi = std::f64::consts::PI;

        // ∫ t^30·cos(t) over [-π, π], to 17 digits
        assert_close!(integral("t^30*cos(t)", -pi, pi).re, -164_918_732_640_479.27, tol = 1e-12);

        // Small rates integrate like the plain power
        assert_close!(integral("t^64*exp(t/1000000000)", -1.0, 1.0).re, 2.0 / 65.0, tol = 1e-12);
    }

    #[test]
    fn test_power_limit() {
        let t = Symbol::new("t");
        for src in ["((((((t^64)^64)^64)^64)^64)^64)", "t^40 * t^40", "(t^2 + 1)^33", "t^65"] {
            let expr: Expr = src.parse().unwrap();
            match ExpPolynomial::lower(&expr, &t) {
                Err(Error::Integration(_)) => {}
                other => panic!("{src}: expected an integration error, got {other:?}"),
            }
        }

        let expr: Expr = "t^32 * t^32".parse().unwrap();
        assert_eq!(ExpPolynomial::lower(&expr, &t).unwrap().terms()[0].power, MAX_POWER);
    }

    #[test]
    fn test_magnitude_bound() {
        let p = lower("-2*t^2 + 3");
        assert_close!(p.magnitude_bound(2.0), 11.0);
    }
}
