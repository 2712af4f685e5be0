//! Text rendering for results and echoed expressions.

/// Shortest decimal that reads back as the same `f64`. Never uses exponent
/// notation, so the text can be typed back into an expression.
pub fn format_number(x: f64) -> String {
    // -0 would otherwise print as "-0"
    let x = if x == 0.0 { 0.0 } else { x };
    format!("{}", x)
}

/// Like [`format_number`], but rounded to at most `precision` fractional
/// digits with trailing zeros removed.
pub fn format_rounded(x: f64, precision: Option<usize>) -> String {
    let Some(digits) = precision else {
        return format_number(x);
    };

    let s = format!("{:.*}", digits, x);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Normalizes spacing: one space around binary operators, one after each
/// comma, none elsewhere. Signs stay attached to their operand.
pub fn format_with_spaces(expr: &str) -> String {
    let mut result = String::new();
    let mut last_char: Option<char> = None;

    for c in expr.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '+' | '-' if is_sign_position(last_char) => result.push(c),
            '+' | '-' | '*' | '/' | '^' | '×' | '÷' => {
                result.push(' ');
                result.push(c);
                result.push(' ');
            }
            ',' => result.push_str(", "),
            _ => result.push(c),
        }
        last_char = Some(c);
    }

    result
}

fn is_sign_position(last_char: Option<char>) -> bool {
    match last_char {
        None => true,
        Some(c) => "+-*/^×÷(,√".contains(c),
    }
}
