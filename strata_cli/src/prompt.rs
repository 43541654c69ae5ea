//! Asks on the terminal before each migration step

use std::io::{self, BufRead, Write};

use strata_core::{Confirm, Prompt};

/// Whether `answer` accepts the step: `y` or `yes`, in any case
pub fn accepts(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Reads the answers from stdin, declining when it is closed or unreadable
pub struct Terminal;

impl Terminal {
    fn ask(&self, question: &str) -> bool {
        print!("{} (yes/no): ", question);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => accepts(&answer),
        }
    }
}

impl Confirm for Terminal {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool {
        match prompt {
            Prompt::Apply(version) => {
                println!("Ready to apply migration: {}", version);
                self.ask("Apply this migration?")
            }
            Prompt::Rollback(version) => self.ask(&format!("Rollback migration {}?", version)),
        }
    }
}
