//! Quick-entry amount expressions
//!
//! The amount field accepts arithmetic expressions like `12+3.5*2` so a
//! user can total a receipt while typing. Input is restricted to digits,
//! `+ - * /`, decimal points, and parentheses, then evaluated with the
//! usual precedence rules.

use thiserror::Error;

/// Why an amount expression failed to evaluate
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmountError {
    /// Empty input
    #[error("expression is empty")]
    Empty,
    /// Character outside the allowed set
    #[error("expression contains invalid characters")]
    InvalidCharacter,
    /// Structurally invalid expression
    #[error("expression is malformed")]
    Malformed,
    /// Evaluation produced NaN or infinity (e.g. division by zero)
    #[error("expression does not evaluate to a finite number")]
    NotFinite,
}

/// Evaluate a quick-entry amount expression
///
/// Whitespace is stripped first; a plain number like `"12.50"` is a valid
/// expression of itself.
pub fn evaluate(input: &str) -> Result<f64, AmountError> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return Err(AmountError::Empty);
    }

    if !cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '.' | '(' | ')'))
    {
        return Err(AmountError::InvalidCharacter);
    }

    let mut parser = Parser {
        input: cleaned.as_bytes(),
        pos: 0,
    };

    let value = parser.expression()?;
    if parser.pos != parser.input.len() {
        return Err(AmountError::Malformed);
    }

    if !value.is_finite() {
        return Err(AmountError::NotFinite);
    }

    Ok(value)
}

/// Recursive-descent parser over the cleaned byte string
struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, AmountError> {
        let mut value = self.term()?;

        while let Some(op) = self.peek() {
            match op {
                b'+' => {
                    self.bump();
                    value += self.term()?;
                }
                b'-' => {
                    self.bump();
                    value -= self.term()?;
                }
                _ => break,
            }
        }

        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, AmountError> {
        let mut value = self.factor()?;

        while let Some(op) = self.peek() {
            match op {
                b'*' => {
                    self.bump();
                    value *= self.factor()?;
                }
                b'/' => {
                    self.bump();
                    value /= self.factor()?;
                }
                _ => break,
            }
        }

        Ok(value)
    }

    // factor := '-' factor | '(' expression ')' | number
    fn factor(&mut self) -> Result<f64, AmountError> {
        match self.peek() {
            Some(b'-') => {
                self.bump();
                Ok(-self.factor()?)
            }
            Some(b'(') => {
                self.bump();
                let value = self.expression()?;
                if self.bump() != Some(b')') {
                    return Err(AmountError::Malformed);
                }
                Ok(value)
            }
            _ => self.number(),
        }
    }

    fn number(&mut self) -> Result<f64, AmountError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit() || b == b'.') {
            self.pos += 1;
        }

        if start == self.pos {
            return Err(AmountError::Malformed);
        }

        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or(AmountError::Malformed)
    }
}
