//! The read loop around the reader and evaluator.
//!
//! Input limits live here rather than in the core: overlong lines are refused
//! before the reader ever sees them, and the symbol limit is handed to the
//! reader through [`Cursor::with_symbol_limit`].

use std::io::{self, BufRead, Read, Write};

use tracing::debug;

use crate::error::ErrorKind;
use crate::eval::{evaluate, Outcome};
use crate::lex::is_balanced;
use crate::parse::{Cursor, MAX_SYMBOL_BYTES};
use crate::value::Value;

pub const DEFAULT_PROMPT: &str = "psi> ";

/// Longest accepted line, excluding the newline. The historical input buffer
/// was 1024 bytes including its terminator.
pub const MAX_LINE_BYTES: usize = 1023;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplConfig {
    /// Printed before every read. `None` disables it.
    pub prompt: Option<String>,
    pub max_line_bytes: usize,
    pub max_symbol_bytes: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: Some(DEFAULT_PROMPT.to_string()),
            max_line_bytes: MAX_LINE_BYTES,
            max_symbol_bytes: MAX_SYMBOL_BYTES,
        }
    }
}

/// What the shell does with one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Print(String),
    Quit,
}

fn print_error(kind: ErrorKind, message: impl Into<std::borrow::Cow<'static, str>>) -> Step {
    Step::Print(Value::error(kind, message).render())
}

fn input_too_long(config: &ReplConfig) -> Step {
    print_error(
        ErrorKind::InputError,
        format!("Input exceeds maximum size of {} bytes", config.max_line_bytes),
    )
}

/// Handles one newline-stripped line: checks it, reads the first expression
/// and evaluates it. Anything after the first expression is ignored.
pub fn eval_line(line: &str, config: &ReplConfig) -> Step {
    if line.len() > config.max_line_bytes {
        return input_too_long(config);
    }
    if line.is_empty() {
        return print_error(ErrorKind::SyntaxError, "Empty input");
    }
    if !is_balanced(line) {
        return print_error(ErrorKind::SyntaxError, "Unbalanced parentheses");
    }

    let mut cursor = Cursor::with_symbol_limit(line, config.max_symbol_bytes);
    let expr = match cursor.parse() {
        None => return print_error(ErrorKind::SyntaxError, "Empty input or unparsable"),
        Some(err) if err.is_error() => return Step::Print(err.render()),
        Some(expr) => expr,
    };
    let trailing = cursor.rest().trim();
    if !trailing.is_empty() {
        debug!(ignored = trailing, "ignoring input after first expression");
    }

    match evaluate(&expr) {
        Outcome::Halt => Step::Quit,
        Outcome::Value(value) => Step::Print(value.render()),
    }
}

pub struct Repl<R, W> {
    input: R,
    output: W,
    config: ReplConfig,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W, config: ReplConfig) -> Self {
        Repl {
            input,
            output,
            config,
        }
    }

    pub fn step(&self, line: &str) -> Step {
        eval_line(line, &self.config)
    }

    /// Runs until `quit` or end of input. Only I/O failures are returned;
    /// everything else is printed as an error value and the loop goes on.
    pub fn run(&mut self) -> io::Result<()> {
        // one extra byte leaves room for the newline
        let limit = self.config.max_line_bytes as u64 + 1;
        let mut buf = Vec::new();
        loop {
            if let Some(prompt) = &self.config.prompt {
                write!(self.output, "{}", prompt)?;
                self.output.flush()?;
            }

            buf.clear();
            let read = (&mut self.input).take(limit).read_until(b'\n', &mut buf)?;
            if read == 0 {
                writeln!(self.output, "\nQuitting...")?;
                return Ok(());
            }

            let step = if !buf.ends_with(b"\n") && read as u64 == limit {
                self.discard_rest_of_line()?;
                input_too_long(&self.config)
            } else {
                let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
                match std::str::from_utf8(raw) {
                    Ok(line) => self.step(line),
                    Err(_) => print_error(ErrorKind::IoError, "Input error"),
                }
            };
            debug!(?step, "line handled");

            match step {
                Step::Print(text) => writeln!(self.output, "{}", text)?,
                Step::Quit => {
                    writeln!(self.output, "Quitting...")?;
                    return Ok(());
                },
            }
        }
    }

    fn discard_rest_of_line(&mut self) -> io::Result<()> {
        loop {
            let (found_newline, used) = {
                let available = self.input.fill_buf()?;
                if available.is_empty() {
                    return Ok(());
                }
                match available.iter().position(|&b| b == b'\n') {
                    Some(i) => (true, i + 1),
                    None => (false, available.len()),
                }
            };
            self.input.consume(used);
            if found_newline {
                return Ok(());
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
