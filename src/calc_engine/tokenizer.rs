use crate::error::LexError;
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Log10,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "asin" => Function::Asin,
            "acos" => Function::Acos,
            "atan" => Function::Atan,
            "log" => Function::Log10,
            _ => return None,
        };
        Some(function)
    }

    /// The name as typed on the keypad.
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Log10 => "log",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(Function),
    /// One of `+ - * / ^`; `×` and `÷` are normalized to `*` and `/`.
    Op(char),
    Root,
    LParen,
    RParen,
    Comma,
    End,
}

/// A token and the character offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Splits calculator input into tokens. The returned sequence always ends
/// with [`Token::End`] positioned one past the last character.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().enumerate().peekable();
    let mut len = 0;

    while let Some(&(pos, c)) = chars.peek() {
        len = pos + 1;
        let single = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            '+' | '-' | '*' | '/' | '^' => Some(Token::Op(c)),
            '×' => Some(Token::Op('*')),
            '÷' => Some(Token::Op('/')),
            '√' => Some(Token::Root),
            'π' => Some(Token::Number(PI)),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push(Spanned { token, pos });
            chars.next();
            continue;
        }

        match c {
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        num_str.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                len = pos + num_str.chars().count();

                if !is_decimal(&num_str) {
                    return Err(LexError::MalformedNumber { text: num_str, pos });
                }
                let value = num_str
                    .parse::<f64>()
                    .map_err(|_| LexError::MalformedNumber { text: num_str.clone(), pos })?;
                tokens.push(Spanned { token: Token::Number(value), pos });
            }
            c if c.is_alphabetic() => {
                // The whole alphabetic run is matched at once, so "asin" can
                // never split into "a" + "sin".
                let mut ident = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_alphabetic() {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                len = pos + ident.chars().count();

                match Function::from_name(&ident) {
                    Some(func) => tokens.push(Spanned { token: Token::Ident(func), pos }),
                    None => return Err(LexError::UnknownIdentifier { name: ident, pos }),
                }
            }
            _ => return Err(LexError::UnexpectedChar { ch: c, pos }),
        }
    }

    tokens.push(Spanned { token: Token::End, pos: len });
    Ok(tokens)
}

// [0-9]+(\.[0-9]+)?
fn is_decimal(text: &str) -> bool {
    let mut parts = text.split('.');
    let int_ok = parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    let frac_ok = match parts.next() {
        None => true,
        Some(p) => !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()),
    };
    int_ok && frac_ok && parts.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_keypad_symbols_are_normalized() {
        assert_eq!(
            kinds("4×5÷2"),
            vec![
                Token::Number(4.0),
                Token::Op('*'),
                Token::Number(5.0),
                Token::Op('/'),
                Token::Number(2.0),
                Token::End,
            ]
        );
    }

    #[test]
    fn test_root_and_pi() {
        assert_eq!(
            kinds("√(3, π)"),
            vec![
                Token::Root,
                Token::LParen,
                Token::Number(3.0),
                Token::Comma,
                Token::Number(PI),
                Token::RParen,
                Token::End,
            ]
        );
    }

    #[test]
    fn test_function_names_match_whole_words() {
        assert_eq!(kinds("asin(1)")[0], Token::Ident(Function::Asin));
        assert_eq!(kinds("atan(1)")[0], Token::Ident(Function::Atan));
        assert_eq!(kinds("log(1)")[0], Token::Ident(Function::Log10));
        assert!(matches!(
            tokenize("a(1)"),
            Err(LexError::UnknownIdentifier { .. })
        ));
        assert!(matches!(
            tokenize("sinh(1)"),
            Err(LexError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(kinds("12.75")[0], Token::Number(12.75));
        assert!(matches!(
            tokenize("1.2.3"),
            Err(LexError::MalformedNumber { pos: 0, .. })
        ));
        assert!(matches!(tokenize("5."), Err(LexError::MalformedNumber { .. })));
        assert!(matches!(tokenize(".5"), Err(LexError::MalformedNumber { .. })));
    }

    #[test]
    fn test_rejects_foreign_characters() {
        assert_eq!(
            tokenize("__import__('os')"),
            Err(LexError::UnexpectedChar { ch: '_', pos: 0 })
        );
        assert_eq!(
            tokenize("2 % 3"),
            Err(LexError::UnexpectedChar { ch: '%', pos: 2 })
        );
    }

    #[test]
    fn test_positions_count_characters() {
        let tokens = tokenize(" √ 9 × 2").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|s| s.pos).collect();
        assert_eq!(positions, vec![1, 3, 5, 7, 8]);
    }

    #[test]
    fn test_blank_input_is_only_end() {
        assert_eq!(kinds("   "), vec![Token::End]);
    }
}
