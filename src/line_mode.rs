use crate::app::{entry_lines, App, Submitted};
use crate::render_help::help_lines;
use anyhow::{Context, Result};
use std::io::{stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};

const PROMPT: &str = "Expression: ";

pub fn run_line(app: &mut App) -> Result<()> {
    println!("keycalc - scientific keypad calculator");
    println!("Supports: +, -, ×, ÷, ^, √x, √(n, x), sin, cos, tan, asin, acos, atan, log, π");
    println!("Tab inserts the last answer. Type 'help' for keys and commands, 'quit' to exit.\n");

    let mut stdout = stdout()
        .into_raw_mode()
        .context("failed to switch the terminal to raw mode")?;
    let stdin = stdin();
    let mut keys = stdin.keys();

    while !app.should_quit {
        write!(stdout, "{}{}", ClearLine, PROMPT)?;
        stdout.flush()?;
        let (_, initial_y) = stdout.cursor_pos().context("failed to read cursor position")?;

        loop {
            write!(
                stdout,
                "{}{}{}{}",
                Goto(1, initial_y),
                ClearLine,
                PROMPT,
                app.input
            )?;
            let column = PROMPT.len() + app.cursor_column() + 1;
            write!(stdout, "{}", Goto(column as u16, initial_y))?;
            stdout.flush()?;

            let key = match keys.next() {
                Some(key) => key.context("failed to read key")?,
                None => {
                    app.should_quit = true;
                    break;
                }
            };

            match key {
                Key::Char('\n') => break,
                Key::Char('\t') => app.insert_answer(),
                Key::Char(c) => app.insert_char(c),
                Key::Backspace => app.backspace(),
                Key::Delete => app.delete(),
                Key::Left => app.move_cursor(-1),
                Key::Right => app.move_cursor(1),
                Key::Home => app.move_home(),
                Key::End => app.move_end(),
                Key::Up => app.navigate_history(-1),
                Key::Down => app.navigate_history(1),
                Key::Ctrl('c') | Key::Ctrl('d') => {
                    app.should_quit = true;
                    break;
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }

        let lines: Vec<String> = match app.submit() {
            Submitted::Nothing => Vec::new(),
            Submitted::Quit => break,
            Submitted::Help => help_lines().iter().map(|l| format!("  {}", l)).collect(),
            Submitted::HistoryCleared => vec!["History cleared".to_string()],
            Submitted::AllCleared => vec!["Cleared".to_string()],
            Submitted::MissingExpression => {
                vec!["Please enter a valid expression after 'details'".to_string()]
            }
            Submitted::Evaluated => match app.history.last() {
                Some(entry) => entry_lines(entry, true),
                None => Vec::new(),
            },
        };

        write!(stdout, "\r\n")?;
        for line in lines {
            write!(stdout, "{}\r\n", line)?;
        }
        write!(stdout, "\r\n")?;
    }

    write!(stdout, "\r\nGoodbye!\r\n")?;
    stdout.flush()?;
    Ok(())
}
