//! Asking the user whether a conflicting declaration may be overwritten.

use std::io::{BufRead, Write};

/// What is about to be overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverwritePrompt<'a> {
    /// Source path that will replace the existing one.
    pub relative_path: &'a str,
    /// Target whose declaration will be rewritten.
    pub target_name: &'a str,
}

/// A yes/no decision source for overwrites.
pub trait ConfirmationPort {
    /// Whether the overwrite described by `prompt` may proceed.
    fn confirm(&mut self, prompt: &OverwritePrompt<'_>) -> bool;
}

/// Answers every prompt with the same fixed decision.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(
    /// The decision returned for every prompt.
    pub bool,
);

impl ConfirmationPort for FixedAnswer {
    fn confirm(&mut self, _prompt: &OverwritePrompt<'_>) -> bool {
        return self.0;
    }
}

/// Asks on a terminal-like reader/writer pair. Anything but `y`/`yes`
/// (case-insensitive), including end of input, is a "no".
#[derive(Debug)]
pub struct PromptConfirmation<R, W> {
    /// Where answers are read from.
    input: R,
    /// Where the question is written.
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmation<R, W> {
    /// Prompt over the given streams.
    pub const fn new(input: R, output: W) -> Self {
        return Self { input, output };
    }
}

impl PromptConfirmation<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr, read the answer from stdin.
    pub fn stdio() -> Self {
        return Self::new(std::io::stdin().lock(), std::io::stderr());
    }
}

impl<R: BufRead, W: Write> ConfirmationPort for PromptConfirmation<R, W> {
    fn confirm(&mut self, prompt: &OverwritePrompt<'_>) -> bool {
        let asked = write!(
            self.output,
            "add_executable for `{}` already exists with a different source.\n\
             Overwrite it with `{}`? [y/N] ",
            prompt.target_name, prompt.relative_path
        )
        .and_then(|()| return self.output.flush());
        if asked.is_err() {
            return false;
        }

        let mut answer = String::new();
        return match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        };
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    const PROMPT: OverwritePrompt<'static> = OverwritePrompt {
        relative_path: "src/app.cpp",
        target_name: "app",
    };

    fn answer(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let decision = PromptConfirmation::new(input.as_bytes(), &mut output).confirm(&PROMPT);
        return (decision, String::from_utf8(output).unwrap());
    }

    #[test]
    fn yes_answers_confirm() {
        assert!(answer("y\n").0);
        assert!(answer("YES\n").0);
    }

    #[test]
    fn anything_else_declines() {
        assert!(!answer("n\n").0);
        assert!(!answer("\n").0);
        assert!(!answer("").0);
    }

    #[test]
    fn prompt_names_target_and_source() {
        let (_, shown) = answer("n\n");
        assert!(shown.contains("`app`"));
        assert!(shown.contains("`src/app.cpp`"));
    }
}
