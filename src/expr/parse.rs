//! Text form of [`Expr`]
//!
//! Grammar, loosest binding first:
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary | power)*     juxtaposition multiplies: `2 t`, `3cos(t)`
//! unary   := ('-' | '+') unary | power
//! power   := atom (('^' | '**') unary)?             right associative, so `-t^2` is `-(t^2)`
//! atom    := number | constant | call | symbol | '(' sum ')'
//! ```
//! `pi`, `π` and `e` are the named constants; any other identifier not followed by `(` is a symbol.
use std::str::FromStr;

use super::{Expr, Function, Symbol};
use crate::{
    error::{Error, Result},
    value::Value,
};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn parse_error(position: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        position,
        message: message.into(),
    }
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }

            '0'..='9' | '.' => {
                let mut end = start;
                let mut seen_exponent = false;
                while let Some(&(i, c)) = chars.peek() {
                    let is_exponent = !seen_exponent
                        && matches!(c, 'e' | 'E')
                        && starts_exponent(&src[i + c.len_utf8()..]);
                    if c.is_ascii_digit() || c == '.' {
                        chars.next();
                    } else if is_exponent {
                        seen_exponent = true;
                        chars.next();
                        if let Some(&(_, '+' | '-')) = chars.peek() {
                            chars.next();
                        }
                    } else {
                        break;
                    }
                    end = chars.peek().map_or(src.len(), |&(i, _)| i);
                }

                let text = &src[start..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| parse_error(start, format!("invalid number `{text}`")))?;
                Token::Number(value)
            }

            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Ident(name)
            }

            '*' => {
                chars.next();
                if let Some(&(_, '*')) = chars.peek() {
                    chars.next();
                    Token::Caret
                } else {
                    Token::Star
                }
            }

            _ => {
                chars.next();
                match c {
                    '+' => Token::Plus,
                    '-' | '−' => Token::Minus,
                    '/' => Token::Slash,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    _ => return Err(parse_error(start, format!("unexpected character `{c}`"))),
                }
            }
        };

        tokens.push((start, token));
    }

    Ok(tokens)
}

/// True if the text following an `e` continues a number's exponent (`1e5`, `2e-3`)
fn starts_exponent(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some('+' | '-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    index: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(_, t)| t)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.index).map_or(self.end, |(p, _)| *p)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).map(|(_, t)| t.clone());
        self.index += 1;
        token
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<()> {
        let position = self.position();
        match self.advance() {
            Some(ref t) if t == expected => Ok(()),
            Some(t) => Err(parse_error(position, format!("expected {what}, found {t:?}"))),
            None => Err(parse_error(position, format!("expected {what}, found end of input"))),
        }
    }

    fn sum<T: Value>(&mut self) -> Result<Expr<T>> {
        let mut lhs: Expr<T> = self.product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    lhs = lhs + self.product()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    lhs = lhs - self.product()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn product<T: Value>(&mut self) -> Result<Expr<T>> {
        let mut lhs: Expr<T> = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    lhs = lhs * self.unary()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    lhs = lhs / self.unary()?;
                }
                Some(Token::Number(_) | Token::Ident(_) | Token::LParen) => {
                    lhs = lhs * self.power()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary<T: Value>(&mut self) -> Result<Expr<T>> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                let operand: Expr<T> = self.unary()?;
                Ok(match operand {
                    Expr::Const(c) => Expr::Const(-c),
                    other => -other,
                })
            }
            Some(Token::Plus) => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power<T: Value>(&mut self) -> Result<Expr<T>> {
        let base: Expr<T> = self.atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.advance();
            let exponent: Expr<T> = self.unary()?;
            Ok(base.pow(exponent))
        } else {
            Ok(base)
        }
    }

    fn atom<T: Value>(&mut self) -> Result<Expr<T>> {
        let position = self.position();
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Const(T::try_cast(n)?)),

            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    let function = Function::from_name(&name)
                        .ok_or_else(|| parse_error(position, format!("unknown function `{name}`")))?;
                    self.advance();
                    let argument: Expr<T> = self.sum()?;
                    self.expect(&Token::RParen, "`)`")?;
                    return Ok(argument.call(function));
                }

                Ok(match name.as_str() {
                    "pi" | "π" => Expr::Pi,
                    "e" => Expr::E,
                    _ if Function::from_name(&name).is_some() => {
                        return Err(parse_error(position, format!("`{name}` must be called, as in `{name}(t)`")))
                    }
                    _ => Expr::Var(Symbol::new(name)),
                })
            }

            Some(Token::LParen) => {
                let inner: Expr<T> = self.sum()?;
                self.expect(&Token::RParen, "`)`")?;
                Ok(inner)
            }

            Some(t) => Err(parse_error(position, format!("unexpected {t:?}"))),
            None => Err(parse_error(position, "unexpected end of input")),
        }
    }
}

impl<T: Value> FromStr for Expr<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tokens = tokenize(s)?;
        if tokens.is_empty() {
            return Err(parse_error(0, "empty expression"));
        }

        let mut parser = Parser {
            tokens,
            index: 0,
            end: s.len(),
        };

        let expr: Self = parser.sum()?;
        match parser.peek() {
            None => Ok(expr),
            Some(t) => Err(parse_error(parser.position(), format!("unexpected trailing {t:?}"))),
        }
    }
}
