//! Interactive confirmation.
//!
//! The policy executor never reads the terminal directly; it asks a
//! [`Confirmer`]. [`TerminalConfirmer`] prompts on a terminal,
//! [`ScriptedConfirmer`] replays fixed answers.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use yansi::Paint;

/// Yes/no decision source for `ask` mode.
pub trait Confirmer {
    /// Ask whether the described effect should be performed.
    fn confirm(&mut self, description: &str) -> bool;
}

/// Prompts on a line-oriented reader/writer pair (stdin/stdout by default).
///
/// Accepts `y`, `yes`, `n`, `no` (any case) and re-prompts on anything
/// else. End of input or a read error counts as "no".
pub struct TerminalConfirmer<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirmer<io::StdinLock<'static>, io::Stdout> {
    /// Confirmer bound to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConfirmer<R, W> {
    /// Confirmer over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, description: &str) -> io::Result<Option<bool>> {
        let mut line = String::new();
        loop {
            write!(self.output, "{} {} ", description, "(y/n):".bold())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }

            match parse_answer(&line) {
                Some(answer) => return Ok(Some(answer)),
                None => writeln!(self.output, "{}", "Please answer y or n.".yellow())?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Confirmer for TerminalConfirmer<R, W> {
    fn confirm(&mut self, description: &str) -> bool {
        match self.ask(description) {
            Ok(Some(answer)) => answer,
            Ok(None) => {
                log::debug!("End of input, treating as no: {}", description);
                false
            }
            Err(e) => {
                log::warn!("Failed to read confirmation, treating as no: {}", e);
                false
            }
        }
    }
}

/// Parse a yes/no answer. Returns `None` for anything unrecognized.
#[must_use]
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Replays a fixed list of answers and records every prompt.
///
/// Once the answers run out, every further prompt is declined.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirmer {
    answers: VecDeque<bool>,
    prompts: Vec<String>,
}

impl ScriptedConfirmer {
    /// Create a confirmer that gives `answers` in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts seen so far.
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, description: &str) -> bool {
        self.prompts.push(description.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}
