use std::fmt;

/// What the runner is about to do, handed to a [`Confirm`] gate before doing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt<'a> {
    /// The pending migration with this version is next in line to be applied
    Apply(&'a str),
    /// The most recently applied migration, with this version, is about to be reverted
    Rollback(&'a str),
}

impl Prompt<'_> {
    pub fn version(&self) -> &str {
        match self {
            Prompt::Apply(version) | Prompt::Rollback(version) => version,
        }
    }
}

impl fmt::Display for Prompt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::Apply(version) => write!(f, "Apply migration {}?", version),
            Prompt::Rollback(version) => write!(f, "Rollback migration {}?", version),
        }
    }
}

/// Gate consulted before each migration is applied or reverted.
///
/// Returning `false` stops the runner without touching the database.
pub trait Confirm {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Prompt<'_>) -> bool,
{
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool {
        self(prompt)
    }
}

/// Accepts everything without asking.
#[derive(Clone, Copy, Debug, Default)]
pub struct NonInteractive;

impl Confirm for NonInteractive {
    fn confirm(&mut self, _prompt: &Prompt<'_>) -> bool {
        true
    }
}
