//! Utilities for displaying and formatting series
//!
//! Turns a [`FourierSeries`] into a human-readable equation:
//! ```text
//! y(t) = -6.58 + 8.00cos(t) - 2.00cos(2t) + 0.89cos(3t)
//! ω = 3.14, y(t) = 0.50 - 0.50cos(2ωt)
//! ```
//!
//! # Key Concepts
//! - **[`Term`]**: A single series term with a sign and body.
//! - **[`Sign`]**: Tracks whether a term is positive or negative.
//!
//! # Helpers
//! - [`format_coefficient`]: Formats a numeric coefficient, skipping zeros.
//! - [`format_harmonic`]: Renders the basis function of one term, like `cos(3ωt)`.
//! - [`coefficient_label`]: Names a coefficient, like `a₃`.
use std::fmt::Write;

use crate::{
    series::{FourierSeries, SeriesTerm, TrigKind},
    value::Value,
};

pub mod unicode;

/// Default precision for formatting coefficients
pub const DEFAULT_PRECISION: usize = 2;

/// Default range in which scientific notation is not used
#[must_use]
pub fn default_fixed_range<T: Value>() -> Option<std::ops::Range<T>> {
    const RANGE: std::ops::Range<f64> = 1e-3..1e3;
    let s = T::try_cast(RANGE.start).ok()?;
    let e = T::try_cast(RANGE.end).ok()?;
    Some(s..e)
}

/// Represents the sign of a series term.
///
/// Used when formatting series to determine how a term
/// should be connected to the rest of the equation (e.g., with `+` or `-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}

impl Sign {
    /// Determines the sign from a numeric coefficient.
    ///
    /// # Example
    /// ```
    /// # use fourier_series::display::Sign;
    /// assert_eq!(Sign::from_coef(3.0), Sign::Positive);
    /// assert_eq!(Sign::from_coef(-2.0), Sign::Negative);
    /// ```
    pub fn from_coef<T: Value>(coef: T) -> Self {
        if coef.is_sign_negative() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// `+` for `Positive`, `-` for `Negative`.
    #[must_use]
    pub fn char(&self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// A single term of a series for display purposes: `"8.00cos(t)"` with [`Sign::Positive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The sign of the term
    pub sign: Sign,

    /// The unsigned body of the term
    pub body: String,
}

impl Term {
    /// Creates a new term with the given sign and body.
    ///
    /// # Example
    /// ```
    /// # use fourier_series::display::{Term, Sign};
    /// let term = Term::new(Sign::Negative, "2.00cos(2t)".to_string());
    /// assert_eq!(term.sign, Sign::Negative);
    /// ```
    #[must_use]
    pub fn new(sign: Sign, body: String) -> Self {
        Self { sign, body }
    }

    /// Formats one series term, or `None` if its coefficient displays as zero.
    ///
    /// `unit_frequency` drops the `ω` from the argument when the fundamental frequency is 1.
    pub fn from_series_term<T: Value>(
        term: &SeriesTerm<T>,
        variable: &str,
        unit_frequency: bool,
        precision: usize,
    ) -> Option<Self> {
        let coef = format_coefficient(term.coefficient, term.harmonic, precision)?;
        let basis = format_harmonic(term.kind, term.harmonic, variable, unit_frequency);
        Some(Self::new(Sign::from_coef(term.coefficient), format!("{coef}{basis}")))
    }
}

/// Formats a numeric coefficient for display in a series term.
///
/// - Returns `None` if the coefficient is zero or effectively zero (≤ epsilon).
/// - Returns an empty string on a harmonic term (`harmonic != 0`) whose magnitude displays as 1.
/// - Formats as a decimal if the absolute value is between `1e-3` and `1e3`.
/// - Formats in scientific notation otherwise.
///
/// The sign is not included; see [`Sign::from_coef`].
///
/// # Example
/// ```
/// # use fourier_series::display::format_coefficient;
/// assert_eq!(format_coefficient(0.0, 1, 2), None);
/// assert_eq!(format_coefficient(-2.5, 1, 2), Some("2.50".to_string()));
/// assert_eq!(format_coefficient(1.0, 1, 2), Some(String::new()));
/// assert_eq!(format_coefficient(1e5, 0, 2), Some("1.00e5".to_string()));
/// ```
pub fn format_coefficient<T: Value>(coef: T, harmonic: usize, precision: usize) -> Option<String> {
    let abs = Value::abs(coef);

    if coef == T::zero() || abs <= T::epsilon() {
        return None;
    }

    let formatted = unicode::float(abs, default_fixed_range(), precision);
    if harmonic != 0 && formatted == unicode::float(T::one(), default_fixed_range(), precision) {
        return Some(String::new());
    }

    Some(formatted)
}

/// Renders the basis function of a term: `""`, `cos(t)`, `sin(3ωt)`, ...
///
/// # Example
/// ```
/// # use fourier_series::{display::format_harmonic, series::TrigKind};
/// assert_eq!(format_harmonic(TrigKind::Cosine, 1, "t", true), "cos(t)");
/// assert_eq!(format_harmonic(TrigKind::Sine, 3, "x", false), "sin(3ωx)");
/// assert_eq!(format_harmonic(TrigKind::Constant, 0, "t", false), "");
/// ```
#[must_use]
pub fn format_harmonic(kind: TrigKind, harmonic: usize, variable: &str, unit_frequency: bool) -> String {
    let function = match kind {
        TrigKind::Constant => return String::new(),
        TrigKind::Cosine => "cos",
        TrigKind::Sine => "sin",
    };

    let mut argument = String::new();
    if harmonic != 1 {
        let _ = write!(argument, "{harmonic}");
    }
    if !unit_frequency {
        argument.push('ω');
    }
    argument.push_str(variable);

    format!("{function}({argument})")
}

/// Names the coefficient of a term: `a₀/2`, `a₃`, `b₃`
#[must_use]
pub fn coefficient_label(kind: TrigKind, harmonic: usize) -> String {
    let index = unicode::subscript(&harmonic.to_string());
    match kind {
        TrigKind::Constant => format!("a{index}/2"),
        TrigKind::Cosine => format!("a{index}"),
        TrigKind::Sine => format!("b{index}"),
    }
}

/// Writes the full series into the provided buffer.
///
/// The output is `"y(t) = ..."`, prefixed with `"ω = ..., "` unless the fundamental angular
/// frequency is 1. Terms whose coefficients display as zero are skipped; if none remain the
/// right-hand side is `0`.
///
/// # Behavior
/// - The first nonzero term is written without a leading `+`.
/// - Subsequent terms are prepended with `+` or `-` depending on the sign.
///
/// # Errors
/// Returns an error if writing to `buffer` fails.
pub fn format_series<B: std::fmt::Write, T: Value>(
    buffer: &mut B,
    series: &FourierSeries<T>,
) -> std::fmt::Result {
    let omega = series.angular_frequency();
    let unit_frequency = omega.abs_sub(T::one()) <= T::epsilon() * T::from_positive_int(4);
    let variable = series.variable().name();

    let mut terms = series
        .terms()
        .iter()
        .filter_map(|term| Term::from_series_term(term, variable, unit_frequency, DEFAULT_PRECISION));

    if !unit_frequency {
        let omega = unicode::float(omega, default_fixed_range(), DEFAULT_PRECISION);
        write!(buffer, "ω = {omega}, ")?;
    }

    write!(buffer, "y({variable}) = ")?;

    // The first term carries no leading '+'
    let Some(first) = terms.next() else {
        return write!(buffer, "0");
    };
    if first.sign == Sign::Negative {
        write!(buffer, "{}", first.sign.char())?;
    }
    write!(buffer, "{}", first.body)?;

    for term in terms {
        write!(buffer, " {} {}", term.sign.char(), term.body)?;
    }

    Ok(())
}
