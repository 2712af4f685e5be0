pub mod ast;
pub mod evaluator;
pub mod parser;
pub mod tokenizer;

use crate::config::EngineConfig;
use crate::error::CalcError;
use crate::format::format_rounded;
use evaluator::{EvaluationTrace, Evaluator, Step};
use parser::Parser;
use tracing::{debug, trace};

/// A successful calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    /// What the keypad field shows; also what "Ans" inserts.
    pub display: String,
}

/// One calculator session: evaluates input and remembers the last answer.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    last_answer: String,
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            config,
            last_answer: String::new(),
        }
    }

    pub fn evaluate(&mut self, input: &str) -> Result<Evaluation, CalcError> {
        let mut trace = EvaluationTrace::new(false);
        self.run(input, &mut trace)
    }

    /// Same as [`Engine::evaluate`], also returning every intermediate step.
    pub fn evaluate_traced(&mut self, input: &str) -> Result<(Evaluation, Vec<Step>), CalcError> {
        let mut trace = EvaluationTrace::new(true);
        let evaluation = self.run(input, &mut trace)?;
        Ok((evaluation, trace.steps))
    }

    pub fn last_answer(&self) -> &str {
        &self.last_answer
    }

    pub fn clear(&mut self) {
        debug!("last answer cleared");
        self.last_answer.clear();
    }

    fn run(&mut self, input: &str, trace: &mut EvaluationTrace) -> Result<Evaluation, CalcError> {
        let result = self.compute(input, trace);
        match &result {
            Ok(evaluation) => {
                debug!(input, result = %evaluation.display, "evaluated");
                self.last_answer = evaluation.display.clone();
            }
            Err(e) => debug!(input, error = %e, "evaluation failed"),
        }
        result
    }

    fn compute(&self, input: &str, trace: &mut EvaluationTrace) -> Result<Evaluation, CalcError> {
        let len = input.chars().count();
        if len > self.config.max_input_len {
            return Err(CalcError::InputTooLong {
                len,
                max: self.config.max_input_len,
            });
        }

        let tokens = tokenizer::tokenize(input)?;
        trace!(count = tokens.len(), "tokenized");

        let tree = Parser::new(tokens)
            .with_max_depth(self.config.max_depth)
            .parse()?;

        let evaluator = Evaluator {
            odd_roots_of_negatives: self.config.odd_roots_of_negatives,
        };
        let value = evaluator.evaluate_traced(&tree, trace)?;

        Ok(Evaluation {
            value,
            display: format_rounded(value, self.config.display_precision),
        })
    }
}
