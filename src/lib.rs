//! # Fourier Series
//! ## Integrals in closed form, so the harmonics come out exact
//!
//! A periodic function can be written as a sum of sines and cosines. Cutting that sum off after
//! `N` harmonics gives a truncated Fourier series, which is what this crate computes, evaluates,
//! samples and (with the `plotting` feature) draws.
//!
//! Coefficients are not estimated from samples: they come from definite integrals over one period,
//! worked out symbolically for the functions that have a closed form (polynomials, sines, cosines,
//! exponentials, and products and powers of those). Sampling happens afterwards, for display.
//!
//! The simplest use-case is to approximate a function and check the approximation:
//! ```rust
//! use fourier_series::{compute_series, sample, assert_close, function};
//! use std::f64::consts::PI;
//!
//! function!(f(t) = -2 t^2);
//! let series = compute_series(&f, &t, 2.0 * PI, 6).unwrap();
//!
//! // The constant term is the mean of the function over one period
//! assert_close!(series.constant(), -2.0 * PI * PI / 3.0);
//! assert_close!(series.cosine(1).unwrap(), 8.0);
//!
//! // Sample both over [-π, π] to compare them
//! let approximation = sample(&series, 2.0 * PI, 64).unwrap();
//! assert_eq!(approximation.len(), 64);
//!
//! println!("{series}"); // y(t) = -6.58 + 8.00cos(t) - 2.00cos(2t) + 0.89cos(3t) - ...
//! ```
//!
//! # Core Concepts
//! - An [`expr::Expr`] is the periodic function, as an expression tree in one free variable.
//!     - The variable is always an explicit [`expr::Symbol`]; nothing assumes it is called `t`.
//!     - Expressions can be parsed from text, built with methods and operators, or written with [`function!`].
//! - The **period** `T` is the length of the interval the function repeats over. Integrals and samples
//!   cover `[-T/2, T/2]`.
//! - The **order** `N` is the number of harmonics kept.
//! - A [`FourierSeries`] is the result: an ordered list of [`SeriesTerm`]s, each a coefficient,
//!   a harmonic index and a [`TrigKind`].
//!     - [`CoefficientEngine`] computes the same thing one harmonic at a time.
//! - A [`SampleSet`] is a function or series evaluated at evenly spaced points over one period.
//!     - Sampling stops at the first point without a finite value. See [`sample`].
//!
//! # Errors
//! Everything fallible returns [`Result`], with an [`Error`] naming the parameter, the integral or the
//! sample position that failed. Invalid parameters are rejected before any integration is attempted.
//!
//! # Logging
//! Computations emit [`tracing`] events: one `debug` event per series, `trace` events per harmonic
//! and on sampling failures. Nothing is printed unless a subscriber is installed.
//!
//! # Testing utilities
//!
//! This crate includes assertion macros for series, see [`test`]. With the `plotting` feature,
//! a failing [`assert_converges!`] writes a plot of the partial sum next to the function.
//!
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // I don't care about this one
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]


#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plotting;

pub mod display;
pub mod error;
pub mod expr;
pub mod integrate;
pub mod sample;
pub mod series;
pub mod statistics;
pub mod value;

pub use error::{Error, Result};
pub use expr::{Expr, Symbol};
pub use sample::{sample, Evaluate, SampleSet, DEFAULT_SAMPLE_COUNT};
pub use series::{compute_series, CoefficientEngine, FourierSeries, SeriesTerm, TrigKind};

pub use nalgebra;
