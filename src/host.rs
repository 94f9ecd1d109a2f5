//! The two seams this crate never implements itself: getting source text
//! turned into an [`ast::Program`], and talking to the outside world for
//! `print`/`inputi`/`inputs`. Both are traits so a real frontend and a real
//! console/network harness can be plugged in without touching the evaluator.

use std::io::{self, BufRead, Write};

use snafu::Snafu;

use crate::ast::Program;

#[derive(Debug, Snafu, Clone, PartialEq)]
pub enum ParseError {
    #[snafu(display("parse error: {}", message))]
    Syntax { message: String },
}

/// Turns source text into a program tree. Lexing and parsing are out of
/// scope for this crate; callers supply an implementation (or use
/// [`NoParser`] when they already have an `ast::Program` in hand).
pub trait Parser {
    fn parse(&self, source: &str) -> Result<Program, ParseError>;
}

/// A `Parser` that always fails, for callers who drive the evaluator
/// directly from a hand-built `ast::Program` and never call `run_source`.
pub struct NoParser;

impl Parser for NoParser {
    fn parse(&self, _source: &str) -> Result<Program, ParseError> {
        Err(ParseError::Syntax {
            message: "no parser configured".to_string(),
        })
    }
}

/// Everything the evaluator needs from the outside world: `print` writes
/// through `output`, `inputi`/`inputs` read through `get_input`. Reading
/// can fail (a closed pipe, a broken terminal), so `get_input` propagates
/// the I/O error rather than panicking; callers surface it as a fault.
pub trait Host {
    fn output(&mut self, line: &str);
    fn get_input(&mut self) -> io::Result<String>;
}

/// A `Host` backed by process stdin/stdout.
pub struct StdHost;

impl Host for StdHost {
    fn output(&mut self, line: &str) {
        println!("{}", line);
    }

    fn get_input(&mut self) -> io::Result<String> {
        let mut line = String::new();
        io::stdout().flush()?;
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

/// A `Host` driven by a fixed script of canned input lines, recording every
/// line written to it. Used by tests that exercise `print`/`inputi`/`inputs`
/// without touching the real console.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    input: std::collections::VecDeque<String>,
    pub output_lines: Vec<String>,
}

impl ScriptedHost {
    pub fn with_input(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output_lines: Vec::new(),
        }
    }
}

impl Host for ScriptedHost {
    fn output(&mut self, line: &str) {
        self.output_lines.push(line.to_string());
    }

    fn get_input(&mut self) -> io::Result<String> {
        Ok(self.input.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scripted_host_replays_lines_in_order() {
        let mut host = ScriptedHost::with_input(vec!["1", "2"]);
        assert_eq!(host.get_input().unwrap(), "1");
        assert_eq!(host.get_input().unwrap(), "2");
        assert_eq!(host.get_input().unwrap(), "");
    }

    #[test]
    fn scripted_host_records_output() {
        let mut host = ScriptedHost::default();
        host.output("hello");
        assert_eq!(host.output_lines, vec!["hello".to_string()]);
    }
}
