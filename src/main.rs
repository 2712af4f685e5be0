mod app;
#[cfg(feature = "line")]
mod line_mode;
mod render_help;

use anyhow::{Context, Result};
use app::{entry_lines, App, Submitted};
use clap::Parser;
use keycalc::{Config, Engine};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Scientific keypad calculator: +, -, ×, ÷, ^, √, trigonometry in degrees
/// and log10.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the default location.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every intermediate step.
    #[arg(short, long)]
    details: bool,

    /// Reject odd roots of negative numbers, e.g. √(3, -8).
    #[arg(long)]
    strict_roots: bool,

    /// Expressions to evaluate in one session. Reads standard input when
    /// none are given.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    expressions: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("failed to load config")?;
    init_logging(config.log_level.as_deref());

    apply_flags(&args, &mut config);

    let mut app = App::new(Engine::with_config(config.engine), &config.shell);

    if !args.expressions.is_empty() {
        return run_batch(&mut app, args.expressions, &mut io::stdout().lock());
    }

    #[cfg(feature = "line")]
    if io::stdin().is_terminal() {
        line_mode::run_line(&mut app)?;
        return Ok(ExitCode::SUCCESS);
    }

    let lines = io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read standard input")?;
    run_batch(&mut app, lines, &mut io::stdout().lock())
}

/// Command-line flags win over the config file.
fn apply_flags(args: &Args, config: &mut Config) {
    if args.strict_roots {
        config.engine.odd_roots_of_negatives = false;
    }
    if args.details {
        config.shell.details = true;
    }
}

fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Evaluates one expression per item in a single session, so the last answer
/// carries over. Exits with failure if any expression failed.
fn run_batch<I>(app: &mut App, expressions: I, out: &mut impl Write) -> Result<ExitCode>
where
    I: IntoIterator<Item = String>,
{
    let mut failed = false;

    for expression in expressions {
        app.clear_input();
        app.input = expression;
        match app.submit() {
            Submitted::Evaluated => {
                if let Some(entry) = app.history.last() {
                    if let Err(e) = &entry.result {
                        tracing::info!(input = %entry.input, error = %e, "expression failed");
                        failed = true;
                    }
                    for line in entry_lines(entry, false) {
                        writeln!(out, "{}", line.trim_start())?;
                    }
                }
            }
            Submitted::Quit => break,
            Submitted::Help => {
                for line in render_help::help_lines() {
                    writeln!(out, "{}", line)?;
                }
            }
            Submitted::MissingExpression => failed = true,
            Submitted::Nothing | Submitted::HistoryCleared | Submitted::AllCleared => {}
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(expressions: &[&str]) -> (String, ExitCode) {
        batch_with(&Config::default(), expressions)
    }

    fn batch_with(config: &Config, expressions: &[&str]) -> (String, ExitCode) {
        let mut app = App::new(Engine::with_config(config.engine.clone()), &config.shell);
        let mut out = Vec::new();
        let code = run_batch(
            &mut app,
            expressions.iter().map(|s| s.to_string()),
            &mut out,
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), code)
    }

    #[test]
    fn test_batch_prints_results() {
        let (out, code) = batch(&["2+3", "√(3,27)", "", "log(100)"]);
        assert_eq!(out, "2 + 3 = 5\n√(3, 27) = 3\nlog(100) = 2\n");
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_batch_reports_failure() {
        let (out, code) = batch(&["5÷0", "1+1"]);
        assert_eq!(out, "5 ÷ 0 = Error\n1 + 1 = 2\n");
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_args_accept_negative_expressions() {
        let args = Args::try_parse_from(["keycalc", "--details", "3", "-2^2"]).unwrap();
        assert!(args.details);
        assert_eq!(args.expressions, vec!["3", "-2^2"]);

        let args = Args::try_parse_from(["keycalc", "--", "-1-1"]).unwrap();
        assert_eq!(args.expressions, vec!["-1-1"]);
    }

    #[test]
    fn test_flags_override_config() {
        let args =
            Args::try_parse_from(["keycalc", "--strict-roots", "--details", "1"]).unwrap();
        let mut config = Config::default();
        assert!(config.engine.odd_roots_of_negatives);
        apply_flags(&args, &mut config);
        assert!(!config.engine.odd_roots_of_negatives);
        assert!(config.shell.details);

        let (out, code) = batch_with(&config, &["√(3,-8)", "2+3"]);
        assert_eq!(
            out,
            "√(3, -8) = Error\n2 + 3 = 5\nStep-by-step evaluation:\nStep 1: 2 + 3 = 5\n"
        );
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_batch_details_have_no_timing() {
        let (out, code) = batch(&["details 2+3"]);
        assert_eq!(out, "2 + 3 = 5\nStep-by-step evaluation:\nStep 1: 2 + 3 = 5\n");
        assert_eq!(code, ExitCode::SUCCESS);

        let (out, _) = batch(&["√(3,-8)"]);
        assert_eq!(out, "√(3, -8) = -2\n");
    }
}
