//! Operator console.
//!
//! The shells only talk to the operator through `Console`, so the whole menu
//! flow can be driven from a script in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// ANSI "clear screen, cursor home".
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

/// Line-oriented operator I/O.
pub trait Console {
    /// Show `prompt` and block for one line of input.
    ///
    /// Returns `Ok(None)` once the input is closed.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Print text followed by a newline.
    fn print(&mut self, text: &str);

    /// Clear the screen before a menu is drawn.
    fn clear(&mut self);
}

/// Console bound to the process' stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn print(&mut self, text: &str) {
        println!("{text}");
    }

    fn clear(&mut self) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout
            .write_all(CLEAR_SCREEN.as_bytes())
            .and_then(|()| stdout.flush())
        {
            tracing::debug!(error = %e, "could not clear the screen");
        }
    }
}

/// One thing a `ScriptedConsole` was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A prompt was shown and input read.
    Prompt(String),
    /// A line was printed.
    Print(String),
    /// The screen was cleared.
    Clear,
}

/// Console that replays canned input and records everything shown.
///
/// Once the script runs out, `read_line` reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    output: String,
    events: Vec<ConsoleEvent>,
}

impl ScriptedConsole {
    /// Console that will answer with `inputs`, in order.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything printed or prompted so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Inputs not consumed yet.
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    /// Prompts, prints and clears in the order they happened.
    pub fn events(&self) -> &[ConsoleEvent] {
        &self.events
    }

    /// How often the screen was cleared.
    pub fn clears(&self) -> usize {
        self.events
            .iter()
            .filter(|event| **event == ConsoleEvent::Clear)
            .count()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.output.push_str(prompt);
        self.events.push(ConsoleEvent::Prompt(prompt.to_string()));
        let line = self.inputs.pop_front();
        if let Some(ref line) = line {
            self.output.push_str(line);
            self.output.push('\n');
        }
        Ok(line)
    }

    fn print(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
        self.events.push(ConsoleEvent::Print(text.to_string()));
    }

    fn clear(&mut self) {
        self.events.push(ConsoleEvent::Clear);
    }
}
