//! User prompts used by the edit and delete flows.

use std::io::{self, BufRead, Write};

/// Typed alone at a prompt, dismisses it.
pub const DISMISS_ANSWER: &str = "-";

/// Blocking prompt / confirm dialogs.
pub trait Interaction {
    /// Ask for a value, pre-filled with `default`. `None` means dismissed.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Terminal dialogs over any reader/writer pair.
///
/// A prompt answer maps as follows:
///
/// - an empty line keeps the default;
/// - [`DISMISS_ANSWER`] (`-`) or end of input dismisses the prompt, which
///   aborts an edit;
/// - anything else is returned as typed.
pub struct TerminalInteraction<R, W> {
    input: R,
    output: W,
}

impl TerminalInteraction<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalInteraction<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Interaction for TerminalInteraction<R, W> {
    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        let _ = write!(self.output, "{message} [{default}] ({DISMISS_ANSWER} to cancel): ");
        let _ = self.output.flush();
        let answer = self.read_line()?;
        match answer.trim() {
            "" => Some(default.to_string()),
            DISMISS_ANSWER => None,
            _ => Some(answer),
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        let _ = write!(self.output, "{message} [y/N]: ");
        let _ = self.output.flush();
        matches!(
            self.read_line().as_deref().map(str::trim),
            Some("y") | Some("Y") | Some("yes") | Some("YES")
        )
    }
}
