//! Restricted arithmetic expression evaluator
//!
//! Turns a raw keystroke buffer into a number. Only numeric literals, the
//! four binary operators, parentheses, and a unary sign are accepted:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-')? (number | '(' expr ')')
//! number := digits ('.' digits)?
//! ```
//!
//! The grammar is parsed directly by recursive descent rather than by
//! filtering a general-purpose syntax tree, so nothing outside the grammar
//! is reachable. Division by a zero divisor is classified as
//! [`FxCalcError::DivisionByZero`], distinct from a malformed-input
//! [`FxCalcError::ParseError`]; it is never silently propagated as infinity.
//!
//! [`evaluate`] itself is strict: apart from whitespace, any character
//! outside the arithmetic alphabet is a `ParseError`. Callers holding a raw
//! keystroke buffer (which may carry currency codes, flags, or other UI
//! artifacts) run it through [`sanitize`] first.

use crate::error::{FxCalcError, Result};

/// Characters the grammar is built from
const ALLOWED: &str = "0123456789+-*/().";

/// Strip every character outside the arithmetic alphabet
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| ALLOWED.contains(*c)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => {}
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' => tokens.push(Token::Star),
            '/' => tokens.push(Token::Slash),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '0'..='9' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i < chars.len() && chars[i] == '.' {
                    i += 1;
                    let frac_start = i;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    if i == frac_start {
                        return Err(FxCalcError::ParseError(
                            "expected digits after decimal point".to_string(),
                        ));
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal.parse::<f64>().map_err(|e| {
                    FxCalcError::ParseError(format!("invalid number {literal:?}: {e}"))
                })?;
                tokens.push(Token::Number(value));
                continue;
            }
            '.' => {
                return Err(FxCalcError::ParseError(
                    "number cannot start with a decimal point".to_string(),
                ));
            }
            c => {
                return Err(FxCalcError::ParseError(format!("unexpected character {c:?}")));
            }
        }
        i += 1;
    }

    Ok(tokens)
}

/// Recursive-descent parser over the token stream, evaluating as it goes
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(tok) = self.peek() {
            match tok {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64> {
        let mut value = self.factor()?;
        while let Some(tok) = self.peek() {
            match tok {
                Token::Star => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(FxCalcError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// factor := ('+' | '-')? (number | '(' expr ')')
    fn factor(&mut self) -> Result<f64> {
        let sign = match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                1.0
            }
            Some(Token::Minus) => {
                self.pos += 1;
                -1.0
            }
            _ => 1.0,
        };

        match self.advance() {
            Some(Token::Number(n)) => Ok(sign * n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(sign * value),
                    _ => Err(FxCalcError::ParseError("unbalanced parentheses".to_string())),
                }
            }
            Some(tok) => Err(FxCalcError::ParseError(format!(
                "expected number or '(', found {tok:?}"
            ))),
            None => Err(FxCalcError::ParseError("unexpected end of expression".to_string())),
        }
    }
}

/// Evaluate an expression string.
///
/// Empty (or whitespace-only) input evaluates to `0` rather than failing.
/// Anything outside the grammar is a [`FxCalcError::ParseError`]; a zero
/// divisor in a well-formed expression is a [`FxCalcError::DivisionByZero`].
pub fn evaluate(input: &str) -> Result<f64> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Ok(0.0);
    }

    let mut parser = Parser::new(&tokens);
    let value = parser.expr()?;

    if parser.pos != tokens.len() {
        return Err(FxCalcError::ParseError(format!(
            "trailing input at token {}",
            parser.pos
        )));
    }

    Ok(value)
}
