use keycalc::config::ShellConfig;
use keycalc::format::{format_number, format_with_spaces};
use keycalc::{CalcError, Engine, Evaluation, Step, ERROR_DISPLAY};
use std::time::{Duration, Instant};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub struct HistoryEntry {
    pub input: String,
    pub result: Result<Evaluation, CalcError>,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Nothing,
    Quit,
    Help,
    HistoryCleared,
    AllCleared,
    MissingExpression,
    Evaluated,
}

/// Edit-field state of the interactive shell. Cursor positions count
/// grapheme clusters, not bytes.
pub struct App {
    pub engine: Engine,
    pub input: String,
    pub cursor_position: usize,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub history_size: usize,
    pub details: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(engine: Engine, shell: &ShellConfig) -> Self {
        App {
            engine,
            input: String::new(),
            cursor_position: 0,
            history: Vec::new(),
            cursor_history: 0,
            history_size: shell.history_size.max(1),
            details: shell.details,
            should_quit: false,
        }
    }

    pub fn submit(&mut self) -> Submitted {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return Submitted::Nothing;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                self.should_quit = true;
                return Submitted::Quit;
            }
            "clear" | "reset" => {
                self.history.clear();
                self.cursor_history = 0;
                self.clear_input();
                return Submitted::HistoryCleared;
            }
            "ac" => {
                self.engine.clear();
                self.clear_input();
                return Submitted::AllCleared;
            }
            "help" => {
                self.clear_input();
                return Submitted::Help;
            }
            _ => {}
        }

        let (detailed_mode, processed_input) = split_details(&input);
        let detailed_mode = detailed_mode || self.details;

        if processed_input.is_empty() {
            self.clear_input();
            return Submitted::MissingExpression;
        }

        let start_time = Instant::now();
        let (result, detailed_steps) = if detailed_mode {
            match self.engine.evaluate_traced(processed_input) {
                Ok((evaluation, steps)) => (Ok(evaluation), steps),
                Err(e) => (Err(e), Vec::new()),
            }
        } else {
            (self.engine.evaluate(processed_input), Vec::new())
        };
        let duration = start_time.elapsed();

        // Like the keypad: a result replaces the expression in the field, an
        // error leaves the field empty.
        let next_input = match &result {
            Ok(evaluation) => evaluation.display.clone(),
            Err(_) => String::new(),
        };

        if self.history.len() >= self.history_size {
            self.history.remove(0);
        }
        self.history.push(HistoryEntry {
            input: processed_input.to_string(),
            result,
            detailed_steps,
            detailed_mode,
            duration,
        });

        self.cursor_history = self.history.len();
        self.input = next_input;
        self.cursor_position = self.grapheme_count();
        Submitted::Evaluated
    }

    /// The "Ans" key: inserts the last answer at the cursor.
    pub fn insert_answer(&mut self) {
        let answer = self.engine.last_answer().to_string();
        self.insert_str(&answer);
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    fn insert_str(&mut self, text: &str) {
        let byte_idx = self.byte_index(self.cursor_position);
        self.input.insert_str(byte_idx, text);
        self.cursor_position += text.graphemes(true).count();
    }

    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete();
        }
    }

    pub fn delete(&mut self) {
        if self.cursor_position < self.grapheme_count() {
            let start = self.byte_index(self.cursor_position);
            let end = self.byte_index(self.cursor_position + 1);
            self.input.drain(start..end);
        }
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.grapheme_count()),
            _ => {}
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_position = self.grapheme_count();
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len() {
            self.cursor_history += 1;
        }

        if self.cursor_history < self.history.len() {
            self.input = self.history[self.cursor_history].input.clone();
        } else {
            self.input.clear();
        }
        self.cursor_position = self.grapheme_count();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Terminal columns between the start of the field and the cursor.
    pub fn cursor_column(&self) -> usize {
        self.input[..self.byte_index(self.cursor_position)].width()
    }

    fn grapheme_count(&self) -> usize {
        self.input.graphemes(true).count()
    }

    fn byte_index(&self, grapheme_index: usize) -> usize {
        self.input
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

/// Text printed for one evaluated entry. Failures of every kind show as
/// `Error`. The timing line is only added when `show_duration` is set.
pub fn entry_lines(entry: &HistoryEntry, show_duration: bool) -> Vec<String> {
    let formatted_expr = format_with_spaces(&entry.input);
    let mut lines = Vec::new();

    match &entry.result {
        Ok(evaluation) => {
            lines.push(format!("  {} = {}", formatted_expr, evaluation.display));
            if entry.detailed_mode && !entry.detailed_steps.is_empty() {
                lines.push("  Step-by-step evaluation:".to_string());
                for (i, step) in entry.detailed_steps.iter().enumerate() {
                    lines.push(format!(
                        "  Step {}: {} = {}",
                        i + 1,
                        step.operation,
                        format_number(step.result)
                    ));
                }
                if show_duration {
                    lines.push(format!("  ({:.3?})", entry.duration));
                }
            }
        }
        Err(_) => lines.push(format!("  {} = {}", formatted_expr, ERROR_DISPLAY)),
    }
    lines
}

/// Recognizes `details <expr>` and `<expr> details`.
pub fn split_details(input: &str) -> (bool, &str) {
    const PREFIX: &str = "details ";
    const SUFFIX: &str = " details";

    if input.eq_ignore_ascii_case(PREFIX.trim()) {
        return (true, "");
    }
    if let Some(rest) = input
        .get(..PREFIX.len())
        .filter(|head| head.eq_ignore_ascii_case(PREFIX))
        .and_then(|_| input.get(PREFIX.len()..))
    {
        return (true, rest.trim());
    }
    if let Some(cut) = input.len().checked_sub(SUFFIX.len()) {
        if let (Some(head), Some(tail)) = (input.get(..cut), input.get(cut..)) {
            if tail.eq_ignore_ascii_case(SUFFIX) {
                return (true, head.trim());
            }
        }
    }
    (false, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Engine::new(), &ShellConfig::default())
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    #[test]
    fn test_result_replaces_expression() {
        let mut app = app();
        type_str(&mut app, "√(3,27)×2");
        assert_eq!(app.submit(), Submitted::Evaluated);
        assert_eq!(app.input, "6");
        assert_eq!(app.cursor_position, 1);
        assert_eq!(app.engine.last_answer(), "6");
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn test_error_empties_field() {
        let mut app = app();
        type_str(&mut app, "log(0)");
        app.submit();
        assert_eq!(app.input, "");
        assert!(app.history[0].result.as_ref().unwrap_err().is_domain());
    }

    #[test]
    fn test_answer_key_inserts_at_cursor() {
        let mut app = app();
        type_str(&mut app, "4×5");
        app.submit();
        app.clear_input();
        type_str(&mut app, "2×");
        app.insert_answer();
        type_str(&mut app, "+1");
        assert_eq!(app.input, "2×20+1");
        assert_eq!(app.submit(), Submitted::Evaluated);
        assert_eq!(app.input, "41");
    }

    #[test]
    fn test_all_clear_forgets_answer() {
        let mut app = app();
        type_str(&mut app, "2+3");
        app.submit();
        app.clear_input();
        type_str(&mut app, "AC");
        assert_eq!(app.submit(), Submitted::AllCleared);
        assert_eq!(app.engine.last_answer(), "");
        app.insert_answer();
        assert_eq!(app.input, "");
    }

    #[test]
    fn test_editing_multibyte_symbols() {
        let mut app = app();
        type_str(&mut app, "√9÷3");
        app.move_cursor(-1);
        app.backspace();
        assert_eq!(app.input, "√93");
        app.move_home();
        app.delete();
        assert_eq!(app.input, "93");
        app.move_end();
        assert_eq!(app.cursor_position, 2);
        assert_eq!(app.cursor_column(), 2);
    }

    #[test]
    fn test_details_mode_keeps_steps() {
        let mut app = app();
        type_str(&mut app, "details 2+3×4");
        app.submit();
        let entry = &app.history[0];
        assert!(entry.detailed_mode);
        assert_eq!(entry.input, "2+3×4");
        assert_eq!(entry.detailed_steps.len(), 2);
    }

    #[test]
    fn test_history_is_bounded_and_navigable() {
        let mut app = App::new(
            Engine::new(),
            &ShellConfig {
                history_size: 2,
                details: false,
            },
        );
        for expr in ["1+1", "2+2", "3+3"] {
            app.clear_input();
            type_str(&mut app, expr);
            app.submit();
        }
        assert_eq!(app.history.len(), 2);
        app.navigate_history(-1);
        assert_eq!(app.input, "3+3");
        app.navigate_history(-1);
        assert_eq!(app.input, "2+2");
        app.navigate_history(1);
        app.navigate_history(1);
        assert_eq!(app.input, "");
    }

    #[test]
    fn test_commands() {
        let mut app = app();
        type_str(&mut app, "details");
        assert_eq!(app.submit(), Submitted::MissingExpression);
        type_str(&mut app, "quit");
        assert_eq!(app.submit(), Submitted::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_entry_lines() {
        let mut app = app();
        type_str(&mut app, "2+3×4 details");
        app.submit();
        let lines = entry_lines(&app.history[0], false);
        assert_eq!(
            lines,
            vec![
                "  2 + 3 × 4 = 14",
                "  Step-by-step evaluation:",
                "  Step 1: 3 * 4 = 12",
                "  Step 2: 2 + 12 = 14",
            ]
        );
        let timed = entry_lines(&app.history[0], true);
        assert_eq!(timed.len(), 5);
        assert!(timed[4].starts_with("  (") && timed[4].ends_with(')'));

        app.clear_input();
        type_str(&mut app, "2++");
        app.submit();
        assert_eq!(entry_lines(&app.history[1], true), vec!["  2 + + = Error".to_string()]);
    }

    #[test]
    fn test_split_details() {
        assert_eq!(split_details("details 1+1"), (true, "1+1"));
        assert_eq!(split_details("1+1 DETAILS"), (true, "1+1"));
        assert_eq!(split_details("1+1"), (false, "1+1"));
    }
}
