//! # keycalc
//!
//! Evaluation core for a scientific keypad calculator. Input is whatever the
//! keypad field holds, for example `√(3,27) + sin(30) × 2^-1`, and is read
//! through a closed grammar: nothing outside it is ever executed.
//!
//! Supported input:
//! * numbers `12`, `0.5` and the constant `π`
//! * `+`, `-`, `×` (or `*`), `÷` (or `/`), `^` (right-associative)
//! * square root `√25`, `√(25)` and nth root `√(n, x)`
//! * `sin`, `cos`, `tan` taking degrees; `asin`, `acos`, `atan` returning degrees
//! * `log`, the base-10 logarithm
//!
//! ```
//! use keycalc::Engine;
//!
//! let mut engine = Engine::new();
//! let result = engine.evaluate("2^3^2").unwrap();
//! assert_eq!(result.value, 512.0);
//! assert_eq!(engine.last_answer(), "512");
//!
//! assert!(engine.evaluate("5÷0").is_err());
//! ```

pub mod calc_engine;
pub mod config;
pub mod error;
pub mod format;

pub use calc_engine::evaluator::{evaluate, EvaluationTrace, Evaluator, Step};
pub use calc_engine::parser::{parse, Parser};
pub use calc_engine::tokenizer::{tokenize, Function, Spanned, Token};
pub use calc_engine::ast::{BinOp, Expr};
pub use calc_engine::{Engine, Evaluation};
pub use config::{Config, EngineConfig, ShellConfig};
pub use error::{CalcError, ConfigError, Domain, EvalError, LexError, SyntaxError, SyntaxErrorKind, ERROR_DISPLAY};
