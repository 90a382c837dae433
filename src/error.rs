//! Error types for Fourier series computation
//!
//! This module defines the common errors encountered when computing,
//! sampling or parsing a series, along with a convenient `Result` alias.

/// Errors that can occur while computing or sampling a Fourier series.
///
/// Every failure aborts the current computation; nothing is retried and no
/// partial series or sample set is returned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter was outside its valid domain.
    ///
    /// Raised for a non-positive or non-finite period, a negative truncation order,
    /// or a sample count of zero. Always raised before any integration is attempted.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The definite integral of a coefficient has no closed form we can produce.
    ///
    /// The integrator handles sums of `c·tᵖ·exp(αt)·{sin,cos}(ωt)` terms, which covers
    /// polynomials, trig and exponential functions of an affine argument, and their products.
    /// Anything else (e.g. `abs(t)`, `ln(t)`, `sin(t^2)`) lands here.
    #[error("Integration failed: {0}")]
    Integration(String),

    /// An expression could not be evaluated to a finite real number at a sample position.
    #[error("Evaluation failed at {position}: {reason}")]
    Evaluation {
        /// Position at which evaluation failed, formatted for display
        position: String,
        /// Why the evaluation failed
        reason: String,
    },

    /// An expression string could not be parsed.
    #[error("Parse error at offset {position}: {message}")]
    Parse {
        /// Byte offset into the source text
        position: usize,
        /// Description of the problem
        message: String,
    },

    /// A numeric value could not be cast to the target type. This is usually a custom type much smaller than f64/f32
    #[error("Failed to cast value to target type")]
    CastFailed,
}

impl Error {
    /// Shorthand for an [`Error::InvalidParameter`]
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns true for [`Error::InvalidParameter`]
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

/// Result type for Fourier series computation
pub type Result<T> = std::result::Result<T, Error>;
