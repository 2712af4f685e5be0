use super::tokenizer::Function;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Pow => '^',
        }
    }
}

/// Expression tree produced by the parser. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryMinus(Box<Expr>),
    Sqrt(Box<Expr>),
    NthRoot {
        degree: Box<Expr>,
        radicand: Box<Expr>,
    },
    Call {
        function: Function,
        argument: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn nth_root(degree: Expr, radicand: Expr) -> Self {
        Expr::NthRoot {
            degree: Box::new(degree),
            radicand: Box::new(radicand),
        }
    }

    pub fn call(function: Function, argument: Expr) -> Self {
        Expr::Call {
            function,
            argument: Box::new(argument),
        }
    }
}

/// Fully parenthesized rendering, handy for checking how input was grouped.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::UnaryMinus(operand) => write!(f, "(-{})", operand),
            Expr::Sqrt(radicand) => write!(f, "√({})", radicand),
            Expr::NthRoot { degree, radicand } => write!(f, "√({}, {})", degree, radicand),
            Expr::Call { function, argument } => write!(f, "{}({})", function, argument),
        }
    }
}
