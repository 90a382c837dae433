//! Symbolic expressions in one free variable
//!
//! An [`Expr`] is the periodic function handed to the coefficient engine. It is an immutable
//! expression tree built from constants, a named variable, arithmetic, and a handful of
//! elementary functions.
//!
//! The free variable is never global: every operation that needs it takes a [`Symbol`].
//!
//! # Building expressions
//! ```rust
//! use fourier_series::expr::{Expr, Symbol};
//!
//! let t = Symbol::new("t");
//!
//! // -2t²
//! let x: Expr = Expr::var(&t);
//! let f = -2.0 * x.powi(2);
//!
//! // Or from text
//! let g: Expr = "-2*t^2".parse().unwrap();
//! assert_eq!(f.evaluate(&t, 3.0).unwrap(), g.evaluate(&t, 3.0).unwrap());
//!
//! // Pretty printing
//! assert_eq!(format!("{g:#}"), "-2t²");
//! ```
use std::fmt::{self, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::{
    display::unicode,
    error::{Error, Result},
    value::Value,
};

mod parse;

/// Name of a free variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);
impl Symbol {
    /// Creates a new symbol with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name of the symbol
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}
impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Elementary functions an expression can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// sin(x)
    Sin,
    /// cos(x)
    Cos,
    /// tan(x)
    Tan,
    /// eˣ
    Exp,
    /// Natural logarithm
    Ln,
    /// √x
    Sqrt,
    /// |x|
    Abs,
}
impl Function {
    /// Name used when parsing and displaying
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
        }
    }

    /// Looks a function up by name. `log` is accepted as an alias for `ln`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "exp" => Self::Exp,
            "ln" | "log" => Self::Ln,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            _ => return None,
        })
    }

    /// Applies the function to a number
    ///
    /// Domain errors produce NaN rather than panicking.
    pub fn apply<T: Value>(self, x: T) -> T {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Exp => x.exp(),
            Self::Ln if x < T::zero() => T::nan(),
            Self::Ln => x.ln(),
            Self::Sqrt if x < T::zero() => T::nan(),
            Self::Sqrt => x.sqrt(),
            Self::Abs => Value::abs(x),
        }
    }
}
impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A symbolic expression in one free variable.
///
/// Expressions are immutable trees; the builder methods consume and return new trees.
///
/// `Display` prints a parseable ASCII form (`-2*t^2`); the alternate form (`{:#}`)
/// prints a compact unicode form (`-2t²`).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<T: Value = f64> {
    /// A numeric constant
    Const(T),

    /// π, kept symbolic for display
    Pi,

    /// Euler's number, kept symbolic for display
    E,

    /// A free variable
    Var(Symbol),

    /// a + b
    Add(Box<Expr<T>>, Box<Expr<T>>),

    /// a - b
    Sub(Box<Expr<T>>, Box<Expr<T>>),

    /// a · b
    Mul(Box<Expr<T>>, Box<Expr<T>>),

    /// a / b
    Div(Box<Expr<T>>, Box<Expr<T>>),

    /// -a
    Neg(Box<Expr<T>>),

    /// aᵇ
    Pow(Box<Expr<T>>, Box<Expr<T>>),

    /// f(a)
    Call(Function, Box<Expr<T>>),
}

impl<T: Value> Expr<T> {
    /// A numeric constant
    pub fn constant(value: T) -> Self {
        Self::Const(value)
    }

    /// The variable named by `symbol`
    pub fn var(symbol: &Symbol) -> Self {
        Self::Var(symbol.clone())
    }

    /// π
    #[must_use]
    pub fn pi() -> Self {
        Self::Pi
    }

    /// Applies an elementary function to this expression
    #[must_use]
    pub fn call(self, function: Function) -> Self {
        Self::Call(function, Box::new(self))
    }

    /// sin(self)
    #[must_use]
    pub fn sin(self) -> Self {
        self.call(Function::Sin)
    }

    /// cos(self)
    #[must_use]
    pub fn cos(self) -> Self {
        self.call(Function::Cos)
    }

    /// tan(self)
    #[must_use]
    pub fn tan(self) -> Self {
        self.call(Function::Tan)
    }

    /// exp(self)
    #[must_use]
    pub fn exp(self) -> Self {
        self.call(Function::Exp)
    }

    /// ln(self)
    #[must_use]
    pub fn ln(self) -> Self {
        self.call(Function::Ln)
    }

    /// sqrt(self)
    #[must_use]
    pub fn sqrt(self) -> Self {
        self.call(Function::Sqrt)
    }

    /// abs(self)
    #[must_use]
    pub fn abs(self) -> Self {
        self.call(Function::Abs)
    }

    /// self ^ exponent
    #[must_use]
    pub fn pow(self, exponent: impl Into<Expr<T>>) -> Self {
        Self::Pow(Box::new(self), Box::new(exponent.into()))
    }

    /// self ^ n for an integer n
    #[must_use]
    pub fn powi(self, n: i32) -> Self {
        let n = T::try_cast(n).unwrap_or_else(|_| T::nan());
        self.pow(Self::Const(n))
    }

    /// Returns true if `symbol` appears anywhere in the expression
    pub fn contains(&self, symbol: &Symbol) -> bool {
        match self {
            Self::Const(_) | Self::Pi | Self::E => false,
            Self::Var(s) => s == symbol,
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) | Self::Pow(a, b) => {
                a.contains(symbol) || b.contains(symbol)
            }
            Self::Neg(a) | Self::Call(_, a) => a.contains(symbol),
        }
    }

    /// Returns true if the expression has no free variables at all
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Const(_) | Self::Pi | Self::E => true,
            Self::Var(_) => false,
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) | Self::Pow(a, b) => {
                a.is_constant() && b.is_constant()
            }
            Self::Neg(a) | Self::Call(_, a) => a.is_constant(),
        }
    }

    /// Evaluates an expression with no free variables.
    ///
    /// Returns `None` if a variable is present or the result is not a finite number.
    pub fn constant_value(&self) -> Option<T> {
        let value = self.eval(None).ok()?;
        value.is_real().then_some(value)
    }

    /// Evaluates the expression with `variable` bound to `value`.
    ///
    /// # Errors
    /// Returns [`Error::Evaluation`] if any other variable is present, or if the result is not
    /// a finite real number (e.g. `ln(-1)` or `1/0`).
    pub fn evaluate(&self, variable: &Symbol, value: T) -> Result<T> {
        let y = self.eval(Some((variable, value)))?;
        if y.is_real() {
            Ok(y)
        } else {
            Err(Error::Evaluation {
                position: format!("{variable} = {value}"),
                reason: format!("{self} is not a finite real number ({y})"),
            })
        }
    }

    /// Binds the expression to its free variable, producing a function of one argument.
    ///
    /// The result can be sampled with [`crate::sample`].
    pub fn in_terms_of<'a>(&'a self, variable: &'a Symbol) -> Univariate<'a, T> {
        Univariate {
            expr: self,
            variable,
        }
    }

    fn eval(&self, binding: Option<(&Symbol, T)>) -> Result<T> {
        Ok(match self {
            Self::Const(c) => *c,
            Self::Pi => T::pi(),
            Self::E => T::e(),
            Self::Var(s) => match binding {
                Some((variable, value)) if variable == s => value,
                _ => {
                    return Err(Error::Evaluation {
                        position: binding.map_or_else(String::new, |(v, x)| format!("{v} = {x}")),
                        reason: format!("unbound symbol `{s}`"),
                    })
                }
            },
            Self::Add(a, b) => a.eval(binding)? + b.eval(binding)?,
            Self::Sub(a, b) => a.eval(binding)? - b.eval(binding)?,
            Self::Mul(a, b) => a.eval(binding)? * b.eval(binding)?,
            Self::Div(a, b) => a.eval(binding)? / b.eval(binding)?,
            Self::Neg(a) => -a.eval(binding)?,
            Self::Pow(a, b) => pow(a.eval(binding)?, b.eval(binding)?),
            Self::Call(f, a) => f.apply(a.eval(binding)?),
        })
    }

    /// Binding strength, used to decide where parentheses are needed
    fn precedence(&self) -> u8 {
        match self {
            Self::Add(..) | Self::Sub(..) => 1,
            Self::Mul(..) | Self::Div(..) => 2,
            Self::Neg(_) => 3,
            Self::Pow(..) => 4,
            Self::Const(c) if Value::is_sign_negative(c) => 3,
            Self::Const(_) | Self::Pi | Self::E | Self::Var(_) | Self::Call(..) => 5,
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            f.write_str("(")?;
            self.fmt_node(f)?;
            f.write_str(")")
        } else {
            self.fmt_node(f)
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = f.alternate();
        match self {
            Self::Const(c) => write!(f, "{c}"),
            Self::Pi if pretty => f.write_str("π"),
            Self::Pi => f.write_str("pi"),
            Self::E => f.write_str("e"),
            Self::Var(s) => write!(f, "{s}"),
            Self::Add(a, b) => {
                a.fmt_child(f, 1)?;
                f.write_str(" + ")?;
                b.fmt_child(f, 2)
            }
            Self::Sub(a, b) => {
                a.fmt_child(f, 1)?;
                f.write_str(" - ")?;
                b.fmt_child(f, 2)
            }
            Self::Mul(a, b) => {
                a.fmt_child(f, 2)?;
                // Coefficient juxtaposition: 2t, 3cos(t)
                if !(pretty
                    && matches!(**a, Self::Const(_))
                    && matches!(**b, Self::Var(_) | Self::Call(..) | Self::Pow(..) | Self::Pi))
                {
                    f.write_str("*")?;
                }
                b.fmt_child(f, 3)
            }
            Self::Div(a, b) => {
                a.fmt_child(f, 2)?;
                f.write_str("/")?;
                b.fmt_child(f, 3)
            }
            Self::Neg(a) => {
                f.write_str("-")?;
                a.fmt_child(f, 3)
            }
            Self::Pow(a, b) => {
                a.fmt_child(f, 5)?;
                match (pretty, b.as_ref()) {
                    (true, Self::Const(n)) if num_traits::float::FloatCore::fract(*n) == T::zero() => {
                        f.write_str(&unicode::superscript(&n.to_string()))
                    }
                    _ => {
                        f.write_str("^")?;
                        b.fmt_child(f, 4)
                    }
                }
            }
            Self::Call(func, a) => {
                write!(f, "{func}(")?;
                a.fmt_node(f)?;
                f.write_str(")")
            }
        }
    }
}

/// Real power with the usual conventions for integer exponents of negative bases
fn pow<T: Value>(base: T, exponent: T) -> T {
    if num_traits::float::FloatCore::fract(exponent) == T::zero() {
        if let Some(n) = num_traits::cast::<T, i32>(exponent) {
            return Value::powi(base, n);
        }
    }

    if base < T::zero() {
        T::nan()
    } else {
        base.powf(exponent)
    }
}

impl<T: Value> Display for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f)
    }
}

impl<T: Value> From<T> for Expr<T> {
    fn from(value: T) -> Self {
        Self::Const(value)
    }
}

impl<T: Value> From<&Symbol> for Expr<T> {
    fn from(symbol: &Symbol) -> Self {
        Self::Var(symbol.clone())
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<T: Value, R: Into<Expr<T>>> $trait<R> for Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: R) -> Self::Output {
                Expr::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }

        impl $trait<Expr<f64>> for f64 {
            type Output = Expr<f64>;

            fn $method(self, rhs: Expr<f64>) -> Self::Output {
                Expr::$variant(Box::new(Expr::Const(self)), Box::new(rhs))
            }
        }

        impl $trait<Expr<f32>> for f32 {
            type Output = Expr<f32>;

            fn $method(self, rhs: Expr<f32>) -> Self::Output {
                Expr::$variant(Box::new(Expr::Const(self)), Box::new(rhs))
            }
        }
    };
}
impl_binary_op!(Add, add, Add);
impl_binary_op!(Sub, sub, Sub);
impl_binary_op!(Mul, mul, Mul);
impl_binary_op!(Div, div, Div);

impl<T: Value> Neg for Expr<T> {
    type Output = Expr<T>;

    fn neg(self) -> Self::Output {
        Expr::Neg(Box::new(self))
    }
}

/// An expression bound to its free variable; a real function of one argument.
///
/// Created with [`Expr::in_terms_of`].
#[derive(Debug, Clone, Copy)]
pub struct Univariate<'a, T: Value = f64> {
    expr: &'a Expr<T>,
    variable: &'a Symbol,
}
impl<'a, T: Value> Univariate<'a, T> {
    /// The underlying expression
    #[must_use]
    pub fn expr(&self) -> &'a Expr<T> {
        self.expr
    }

    /// The bound variable
    #[must_use]
    pub fn variable(&self) -> &'a Symbol {
        self.variable
    }

    /// Evaluates the expression at `x`
    ///
    /// # Errors
    /// See [`Expr::evaluate`]
    pub fn y(&self, x: T) -> Result<T> {
        self.expr.evaluate(self.variable, x)
    }
}
impl<T: Value> Display for Univariate<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f({}) = ", self.variable)?;
        if f.alternate() {
            write!(f, "{:#}", self.expr)
        } else {
            write!(f, "{}", self.expr)
        }
    }
}
