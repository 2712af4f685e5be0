use super::ast::{BinOp, Expr};
use super::tokenizer::{Spanned, Token};
use crate::error::{SyntaxError, SyntaxErrorKind};

pub const DEFAULT_MAX_DEPTH: usize = 128;

type ParseResult = Result<Expr, SyntaxError>;

/// Recursive-descent parser over the closed calculator grammar:
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/') unary)*
/// unary   := ('-' | '+') unary | power
/// power   := primary ('^' unary)?
/// primary := number | '(' expr ')' | function '(' expr ')'
///          | '√' '(' expr ',' expr ')' | '√' primary
/// ```
pub struct Parser {
    tokens: Vec<Spanned>,
    current: usize,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Spanned>) -> Self {
        if !matches!(tokens.last(), Some(Spanned { token: Token::End, .. })) {
            let pos = tokens.last().map_or(0, |s| s.pos + 1);
            tokens.push(Spanned { token: Token::End, pos });
        }
        Parser {
            tokens,
            current: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parse(&mut self) -> ParseResult {
        if self.peek() == &Token::End {
            return Err(self.error(SyntaxErrorKind::EmptyInput));
        }
        let result = self.expr()?;
        match self.peek() {
            Token::End => Ok(result),
            Token::RParen => Err(self.error(SyntaxErrorKind::UnmatchedParen)),
            _ => Err(self.error(SyntaxErrorKind::TrailingInput)),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current].token
    }

    fn pos(&self) -> usize {
        self.tokens[self.current].pos
    }

    fn advance(&mut self) {
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, self.pos())
    }

    fn unexpected(&self) -> SyntaxError {
        match self.peek() {
            Token::End => self.error(SyntaxErrorKind::UnexpectedEnd),
            _ => self.error(SyntaxErrorKind::UnexpectedToken),
        }
    }

    fn nested(&mut self, rule: fn(&mut Self) -> ParseResult) -> ParseResult {
        if self.depth >= self.max_depth {
            return Err(self.error(SyntaxErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn expect_close(&mut self, open_pos: usize) -> Result<(), SyntaxError> {
        match self.peek() {
            Token::RParen => {
                self.advance();
                Ok(())
            }
            Token::End => Err(SyntaxError::new(SyntaxErrorKind::UnmatchedParen, open_pos)),
            _ => Err(self.error(SyntaxErrorKind::UnexpectedToken)),
        }
    }

    fn expr(&mut self) -> ParseResult {
        let mut left = self.term()?;

        loop {
            let op = match self.peek() {
                Token::Op('+') => BinOp::Add,
                Token::Op('-') => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.term()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn term(&mut self) -> ParseResult {
        let mut left = self.nested(Self::unary)?;

        loop {
            let op = match self.peek() {
                Token::Op('*') => BinOp::Mul,
                Token::Op('/') => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.nested(Self::unary)?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    // A sign applies to the whole power that follows it: -2^2 is -(2^2).
    fn unary(&mut self) -> ParseResult {
        match self.peek() {
            Token::Op('-') => {
                self.advance();
                let operand = self.nested(Self::unary)?;
                Ok(Expr::UnaryMinus(Box::new(operand)))
            }
            Token::Op('+') => {
                self.advance();
                self.nested(Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> ParseResult {
        let base = self.nested(Self::primary)?;

        if self.peek() == &Token::Op('^') {
            self.advance();
            // Right-associative: the exponent is parsed as a full unary,
            // which itself may contain another power.
            let exponent = self.nested(Self::unary)?;
            Ok(Expr::binary(BinOp::Pow, base, exponent))
        } else {
            Ok(base)
        }
    }

    fn primary(&mut self) -> ParseResult {
        match self.peek().clone() {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::Literal(n))
            }
            Token::LParen => {
                let open_pos = self.pos();
                self.advance();
                let inner = self.expr()?;
                self.expect_close(open_pos)?;
                Ok(inner)
            }
            Token::Ident(function) => {
                self.advance();
                if self.peek() != &Token::LParen {
                    return Err(self.unexpected());
                }
                let open_pos = self.pos();
                self.advance();
                let argument = self.expr()?;
                self.expect_close(open_pos)?;
                Ok(Expr::call(function, argument))
            }
            Token::Root => {
                self.advance();
                self.root()
            }
            _ => Err(self.unexpected()),
        }
    }

    fn root(&mut self) -> ParseResult {
        if self.peek() == &Token::LParen && self.has_top_level_comma() {
            let open_pos = self.pos();
            self.advance();
            let degree = self.expr()?;
            if self.peek() != &Token::Comma {
                return Err(self.unexpected());
            }
            self.advance();
            let radicand = self.expr()?;
            self.expect_close(open_pos)?;
            return Ok(Expr::nth_root(degree, radicand));
        }

        let radicand = self.nested(Self::primary)?;
        Ok(Expr::Sqrt(Box::new(radicand)))
    }

    // Scans from the current '(' to its matching ')' looking for a comma at
    // depth one, so √((1,2)) is not mistaken for an nth root.
    fn has_top_level_comma(&self) -> bool {
        let mut depth = 0usize;
        for spanned in &self.tokens[self.current..] {
            match spanned.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return false;
                    }
                }
                Token::Comma if depth == 1 => return true,
                Token::End => return false,
                _ => {}
            }
        }
        false
    }
}

/// Parses a token sequence with the default nesting limit.
pub fn parse(tokens: Vec<Spanned>) -> ParseResult {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::tokenizer::{tokenize, Function};

    fn parse_str(input: &str) -> ParseResult {
        parse(tokenize(input).unwrap())
    }

    fn grouping(input: &str) -> String {
        parse_str(input).unwrap().to_string()
    }

    fn kind(input: &str) -> SyntaxErrorKind {
        parse_str(input).unwrap_err().kind
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(grouping("1+2*3"), "(1 + (2 * 3))");
        assert_eq!(grouping("8-3-2"), "((8 - 3) - 2)");
        assert_eq!(grouping("8/4/2"), "((8 / 4) / 2)");
        assert_eq!(grouping("2^3^2"), "(2 ^ (3 ^ 2))");
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_eq!(grouping("-2^2"), "(-(2 ^ 2))");
        assert_eq!(grouping("2^-1"), "(2 ^ (-1))");
        assert_eq!(grouping("3*-2"), "(3 * (-2))");
        assert_eq!(grouping("--4"), "(-(-4))");
        assert_eq!(grouping("+4"), "4");
    }

    #[test]
    fn test_root_forms() {
        assert_eq!(grouping("√25"), "√(25)");
        assert_eq!(grouping("√(25)"), "√(25)");
        assert_eq!(grouping("√(3,27)"), "√(3, 27)");
        assert_eq!(grouping("√(1+2, 4*2)"), "√((1 + 2), (4 * 2))");
        assert_eq!(grouping("√9^2"), "(√(9) ^ 2)");
        assert_eq!(grouping("√√16"), "√(√(16))");
    }

    #[test]
    fn test_root_comma_is_found_past_nested_parens() {
        assert_eq!(grouping("√((1+2), 8)"), "√((1 + 2), 8)");
        assert_eq!(grouping("√((9))"), "√(9)");
        assert_eq!(kind("√((1, 2))"), SyntaxErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(
            parse_str("log(100)").unwrap(),
            Expr::call(Function::Log10, Expr::Literal(100.0))
        );
        assert_eq!(grouping("sin(30)+1"), "(sin(30) + 1)");
        assert_eq!(kind("sin 30"), SyntaxErrorKind::UnexpectedToken);
        assert_eq!(kind("cos(1, 2)"), SyntaxErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(kind(""), SyntaxErrorKind::EmptyInput);
        assert_eq!(kind("  "), SyntaxErrorKind::EmptyInput);
        assert_eq!(kind("2++"), SyntaxErrorKind::UnexpectedEnd);
        assert_eq!(kind("2*"), SyntaxErrorKind::UnexpectedEnd);
        assert_eq!(kind("*2"), SyntaxErrorKind::UnexpectedToken);
        assert_eq!(kind("2 3"), SyntaxErrorKind::TrailingInput);
        assert_eq!(kind("1,2"), SyntaxErrorKind::TrailingInput);
        assert_eq!(kind("√(2,"), SyntaxErrorKind::UnexpectedEnd);
        assert_eq!(kind("√-4"), SyntaxErrorKind::UnexpectedToken);
        assert_eq!(kind("()"), SyntaxErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_unmatched_parens_report_position() {
        let err = parse_str("2*(3+4").unwrap_err();
        assert_eq!(err, SyntaxError::new(SyntaxErrorKind::UnmatchedParen, 2));

        let err = parse_str("(2))").unwrap_err();
        assert_eq!(err, SyntaxError::new(SyntaxErrorKind::UnmatchedParen, 3));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(kind(&deep), SyntaxErrorKind::NestingTooDeep);

        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert!(parse_str(&shallow).is_ok());

        let tokens = tokenize("----1").unwrap();
        let err = Parser::new(tokens).with_max_depth(3).parse().unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::NestingTooDeep);
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let input = "√(3, 27) + sin(30) × -2^2";
        assert_eq!(parse_str(input).unwrap(), parse_str(input).unwrap());
    }
}
