//! Error types for every stage of the calculator pipeline.
//!
//! Each stage has its own enum so callers and tests can tell a bad character
//! from a bad token sequence from a bad number. [`CalcError`] wraps all of them
//! for the engine's single entry point.

use std::fmt;
use thiserror::Error;

/// Shown in place of a result whenever evaluation fails, whatever the cause.
pub const ERROR_DISPLAY: &str = "Error";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("malformed number '{text}' at {pos}")]
    MalformedNumber { text: String, pos: usize },
    #[error("unknown function '{name}' at {pos}")]
    UnknownIdentifier { name: String, pos: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    EmptyInput,
    UnexpectedToken,
    UnexpectedEnd,
    UnmatchedParen,
    TrailingInput,
    NestingTooDeep,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SyntaxErrorKind::EmptyInput => "empty expression",
            SyntaxErrorKind::UnexpectedToken => "unexpected token",
            SyntaxErrorKind::UnexpectedEnd => "unexpected end of input",
            SyntaxErrorKind::UnmatchedParen => "unmatched parenthesis",
            SyntaxErrorKind::TrailingInput => "unexpected tokens at end of expression",
            SyntaxErrorKind::NestingTooDeep => "expression nested too deeply",
        };
        f.write_str(text)
    }
}

/// A malformed token sequence. `pos` is the character offset of the
/// offending token in the source.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("syntax error at {pos}: {kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub pos: usize,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, pos: usize) -> Self {
        SyntaxError { kind, pos }
    }
}

/// Which mathematical rule a [`EvalError::DomainError`] broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    NegativeRoot,
    ComplexPower,
    InverseTrig,
    Logarithm,
    NonFinite,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Domain::NegativeRoot => "even or fractional root of a negative number",
            Domain::ComplexPower => "power has no real result",
            Domain::InverseTrig => "asin/acos argument outside [-1, 1]",
            Domain::Logarithm => "logarithm of a non-positive number",
            Domain::NonFinite => "result is not a finite number",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("domain error: {0}")]
    DomainError(Domain),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("input is {len} characters long, limit is {max}")]
    InputTooLong { len: usize, max: usize },
}

impl CalcError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, CalcError::Syntax(_))
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, CalcError::Eval(EvalError::DomainError(_)))
    }

    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, CalcError::Eval(EvalError::DivisionByZero))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
