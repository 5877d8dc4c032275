//! The confirmation capability guarding recursive deletion.
//!
//! Operations that can destroy a whole tree never talk to a terminal
//! themselves; they ask whatever [`Confirm`] implementation the caller
//! hands in. Interactive programs pass [`ConsolePrompt`], scripts pass
//! [`AlwaysConfirm`] (or use the `force` option), and tests drive the exact
//! answer sequence with [`Scripted`].

use std::collections::VecDeque;
use std::io;

/// Answers yes/no questions before destructive operations.
pub trait Confirm {
    /// Return `Ok(true)` to let the operation proceed.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Interactive terminal prompt, defaulting to "no".
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl Confirm for ConsolePrompt {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(io::Error::other)
    }
}

/// Says yes to everything. For non-interactive callers that have already
/// made up their mind.
#[derive(Debug, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(true)
    }
}

/// Says no to everything.
#[derive(Debug, Default)]
pub struct AlwaysDeny;

impl Confirm for AlwaysDeny {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(false)
    }
}

/// Replays a fixed sequence of answers, then denies once it runs dry.
#[derive(Debug)]
pub struct Scripted {
    answers: VecDeque<bool>,
}

impl Scripted {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Scripted {
            answers: answers.into_iter().collect(),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}
