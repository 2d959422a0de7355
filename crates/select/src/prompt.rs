//! Interactive choice among ranked candidates

use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use snapfind_errors::SelectionError;
use snapfind_types::{format_rate, Candidate};
use std::fmt;
use std::io::{self, BufRead, Stderr, StdinLock, Write};

/// One line of the ranked list shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct PromptOption {
    /// 1-based position
    pub position: usize,
    pub provider: String,
    pub rate: f64,
}

impl PromptOption {
    #[must_use]
    pub fn from_ranked(ranked: &[Candidate]) -> Vec<Self> {
        ranked
            .iter()
            .enumerate()
            .map(|(index, candidate)| Self {
                position: index + 1,
                provider: candidate.provider.clone(),
                rate: candidate.rate,
            })
            .collect()
    }
}

impl fmt::Display for PromptOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} ({})",
            self.position,
            self.provider,
            format_rate(self.rate)
        )
    }
}

/// Source of manual choices
///
/// The selector calls [`show`](Prompt::show) once, then
/// [`read_choice`](Prompt::read_choice) until the answer is a number in
/// `1..=count`, calling [`reject`](Prompt::reject) after each bad answer.
pub trait Prompt {
    /// Present the ranked options
    ///
    /// # Errors
    ///
    /// Returns an error if the options cannot be displayed.
    fn show(&mut self, options: &[PromptOption]) -> Result<(), SelectionError>;

    /// Read one raw answer; `None` once no more input will arrive
    ///
    /// # Errors
    ///
    /// Returns an error if reading the answer fails.
    fn read_choice(&mut self, count: usize) -> Result<Option<String>, SelectionError>;

    /// Tell the user an answer was not accepted
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be displayed.
    fn reject(&mut self, input: &str, count: usize) -> Result<(), SelectionError>;
}

/// Line-based prompt over any reader and writer
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<StdinLock<'static>, Stderr> {
    /// Prompt on the process's stdin, writing to stderr
    ///
    /// stdout is left to the final result, which may be a JSON document.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, mostly for inspecting what was printed
    pub fn into_output(self) -> W {
        self.output
    }
}

fn prompt_io(e: &io::Error) -> SelectionError {
    SelectionError::PromptFailed {
        message: e.to_string(),
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn show(&mut self, options: &[PromptOption]) -> Result<(), SelectionError> {
        writeln!(self.output, "\nAvailable snapshots:").map_err(|e| prompt_io(&e))?;
        for option in options {
            writeln!(self.output, "{option}").map_err(|e| prompt_io(&e))?;
        }
        Ok(())
    }

    fn read_choice(&mut self, count: usize) -> Result<Option<String>, SelectionError> {
        write!(self.output, "\nSelect snapshot (1-{count}): ").map_err(|e| prompt_io(&e))?;
        self.output.flush().map_err(|e| prompt_io(&e))?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|e| prompt_io(&e))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn reject(&mut self, _input: &str, count: usize) -> Result<(), SelectionError> {
        writeln!(
            self.output,
            "Invalid choice. Please enter a number between 1 and {count}"
        )
        .map_err(|e| prompt_io(&e))
    }
}

/// Arrow-key menu for interactive terminals
#[derive(Default)]
pub struct DialoguerPrompt {
    items: Vec<String>,
}

impl DialoguerPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompt for DialoguerPrompt {
    fn show(&mut self, options: &[PromptOption]) -> Result<(), SelectionError> {
        self.items = options
            .iter()
            .map(|o| format!("{} ({})", o.provider, format_rate(o.rate)))
            .collect();
        Ok(())
    }

    fn read_choice(&mut self, _count: usize) -> Result<Option<String>, SelectionError> {
        let picked = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select snapshot")
            .items(self.items.as_slice())
            .default(0)
            .interact_opt()
            .map_err(|e| SelectionError::PromptFailed {
                message: e.to_string(),
            })?;
        Ok(picked.map(|index| (index + 1).to_string()))
    }

    fn reject(&mut self, _input: &str, _count: usize) -> Result<(), SelectionError> {
        Ok(())
    }
}
