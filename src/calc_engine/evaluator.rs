use super::ast::{BinOp, Expr};
use super::tokenizer::Function;
use crate::error::{Domain, EvalError};
use crate::format::format_number;

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub operation: String,
    pub result: f64,
}

/// Records intermediate results in evaluation order when `detailed_mode`
/// is set; otherwise every call is a no-op.
#[derive(Debug, Default)]
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

type EvalResult = Result<f64, EvalError>;

/// Walks an expression tree. Holds only settings, never per-call state, so
/// evaluating the same tree twice always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    pub odd_roots_of_negatives: bool,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator {
            odd_roots_of_negatives: true,
        }
    }
}

impl Evaluator {
    pub fn evaluate(&self, node: &Expr) -> EvalResult {
        self.eval(node, &mut EvaluationTrace::new(false))
    }

    pub fn evaluate_traced(&self, node: &Expr, trace: &mut EvaluationTrace) -> EvalResult {
        self.eval(node, trace)
    }

    fn eval(&self, node: &Expr, trace: &mut EvaluationTrace) -> EvalResult {
        match node {
            Expr::Literal(value) => finite(*value),
            Expr::BinaryOp { op, left, right } => {
                let left = self.eval(left, trace)?;
                let right = self.eval(right, trace)?;
                let result = binary(*op, left, right)?;
                trace.add_step(
                    format!("{} {} {}", format_number(left), op.symbol(), format_number(right)),
                    result,
                );
                Ok(result)
            }
            Expr::UnaryMinus(operand) => {
                let value = self.eval(operand, trace)?;
                let result = -value;
                trace.add_step(format!("-({})", format_number(value)), result);
                Ok(result)
            }
            Expr::Sqrt(radicand) => {
                let value = self.eval(radicand, trace)?;
                if value < 0.0 {
                    return Err(EvalError::DomainError(Domain::NegativeRoot));
                }
                let result = finite(value.sqrt())?;
                trace.add_step(format!("√{}", format_number(value)), result);
                Ok(result)
            }
            Expr::NthRoot { degree, radicand } => {
                let n = self.eval(degree, trace)?;
                let x = self.eval(radicand, trace)?;
                let result = self.nth_root(n, x)?;
                trace.add_step(
                    format!("√({}, {})", format_number(n), format_number(x)),
                    result,
                );
                Ok(result)
            }
            Expr::Call { function, argument } => {
                let value = self.eval(argument, trace)?;
                let result = call(*function, value)?;
                trace.add_step(format!("{}({})", function, format_number(value)), result);
                Ok(result)
            }
        }
    }

    fn nth_root(&self, n: f64, x: f64) -> EvalResult {
        // x^(1/n) with n = 0 divides by zero before any root is taken.
        if n == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        // Negative degree: 0^(1/n) is zero to a negative power.
        if x == 0.0 && n < 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        if x < 0.0 {
            let odd_integer = n.fract() == 0.0 && n % 2.0 != 0.0;
            if !(self.odd_roots_of_negatives && odd_integer) {
                return Err(EvalError::DomainError(Domain::NegativeRoot));
            }
            return Ok(-positive_root(n, -x)?);
        }
        positive_root(n, x)
    }
}

fn positive_root(n: f64, x: f64) -> EvalResult {
    let root = if n == 2.0 { x.sqrt() } else { x.powf(n.recip()) };
    let root = finite(root)?;

    // powf(1/3) of 27 lands a hair above 3; snap to the integer when it is
    // an exact root.
    let rounded = root.round();
    if n.fract() == 0.0 && rounded != root && rounded.powf(n) == x {
        return Ok(rounded);
    }
    Ok(root)
}

fn binary(op: BinOp, left: f64, right: f64) -> EvalResult {
    match op {
        BinOp::Add => finite(left + right),
        BinOp::Sub => finite(left - right),
        BinOp::Mul => finite(left * right),
        BinOp::Div => {
            if right == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            finite(left / right)
        }
        BinOp::Pow => power(left, right),
    }
}

fn power(base: f64, exponent: f64) -> EvalResult {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvalError::DomainError(Domain::ComplexPower));
    }
    finite(base.powf(exponent))
}

fn call(function: Function, x: f64) -> EvalResult {
    let result = match function {
        Function::Sin => x.to_radians().sin(),
        Function::Cos => x.to_radians().cos(),
        Function::Tan => x.to_radians().tan(),
        Function::Asin | Function::Acos => {
            if !(-1.0..=1.0).contains(&x) {
                return Err(EvalError::DomainError(Domain::InverseTrig));
            }
            if function == Function::Asin {
                x.asin().to_degrees()
            } else {
                x.acos().to_degrees()
            }
        }
        Function::Atan => x.atan().to_degrees(),
        Function::Log10 => {
            if x <= 0.0 {
                return Err(EvalError::DomainError(Domain::Logarithm));
            }
            x.log10()
        }
    };
    finite(result)
}

fn finite(value: f64) -> EvalResult {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::DomainError(Domain::NonFinite))
    }
}

/// Evaluates a tree with default settings.
pub fn evaluate(node: &Expr) -> EvalResult {
    Evaluator::default().evaluate(node)
}
