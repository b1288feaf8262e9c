use std::io::{self, BufRead, Write};

use tracing::warn;

/// Surfaces a message to the user (a dialog in a GUI, stderr here).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Yes/no question asked before anything destructive happens.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Default notifier for embedders that have no UI of their own.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{}", message);
    }
}

pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Asks on the terminal. `assume_yes` skips the question entirely.
pub struct TerminalConfirm {
    pub assume_yes: bool,
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", message);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        parse_answer(&answer)
    }
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
