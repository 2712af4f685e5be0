const HELP_LINES: &[&str] = &[
    "keycalc - scientific keypad calculator",
    "",
    "Basic Operations:",
    "  +     : Addition        (e.g., 5 + 3 = 8)",
    "  -     : Subtraction     (e.g., 10 - 4 = 6)",
    "  × or *: Multiplication  (e.g., 6 × 7 = 42)",
    "  ÷ or /: Division        (e.g., 15 ÷ 3 = 5)",
    "  ^     : Exponentiation  (e.g., 2 ^ 3 ^ 2 = 512)",
    "",
    "Roots:",
    "  √x, √(x)  : Square root       (e.g., √25 = 5)",
    "  √(n, x)   : nth root of x     (e.g., √(3, 27) = 3)",
    "",
    "Functions:",
    "  sin(x), cos(x), tan(x)    : x in degrees",
    "  asin(x), acos(x), atan(x) : result in degrees",
    "  log(x)                    : Base-10 logarithm",
    "",
    "Constants:",
    "  π     : 3.141592653589793",
    "",
    "Keys:",
    "  Tab          : insert the last answer (Ans)",
    "  ←/→ Home/End : move the cursor",
    "  ↑/↓          : browse history",
    "  Ctrl-C       : quit",
    "",
    "Commands:",
    "  details <expr> : show step-by-step evaluation",
    "  ac             : clear the field and the last answer",
    "  clear          : clear history",
    "  help           : show this text",
    "  quit           : exit",
];

pub fn help_lines() -> &'static [&'static str] {
    HELP_LINES
}
