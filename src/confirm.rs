//! Confirmation before state-changing calls
//!
//! Mutating operations ask a [`Confirm`] implementation before any request
//! is sent. The CLI uses [`Prompt`] on stdin/stderr, or [`Force`] when
//! `--force` is given.

use std::io::{BufRead, BufReader, Stderr, Stdin, Write};
use std::sync::Mutex;

/// Capability to approve a state-changing call
pub trait Confirm: Send + Sync {
    /// Return `true` to proceed with `action` on `target`
    fn confirm(&self, action: &str, target: &str) -> bool;
}

/// Always approves
#[derive(Debug, Clone, Copy, Default)]
pub struct Force;

impl Confirm for Force {
    fn confirm(&self, _action: &str, _target: &str) -> bool {
        true
    }
}

/// Always declines
#[derive(Debug, Clone, Copy, Default)]
pub struct Deny;

impl Confirm for Deny {
    fn confirm(&self, _action: &str, _target: &str) -> bool {
        false
    }
}

/// Interactive yes/no prompt
///
/// Anything other than `y` or `yes` (case-insensitive), including EOF or a
/// read error, declines.
pub struct Prompt<R, W> {
    io: Mutex<(R, W)>,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Create a prompt over a reader and writer
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }
}

impl Prompt<BufReader<Stdin>, Stderr> {
    /// Prompt on stdin, writing the question to stderr
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stderr())
    }
}

impl<R, W> Confirm for Prompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&self, action: &str, target: &str) -> bool {
        let Ok(mut guard) = self.io.lock() else {
            return false;
        };
        let (input, output) = &mut *guard;

        let asked = write!(
            output,
            "Are you sure you want to perform this action?\n\
             Performing the operation \"{action}\" on target \"{target}\". [y/N]: "
        )
        .and_then(|()| output.flush());
        if asked.is_err() {
            return false;
        }

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

impl<R, W> std::fmt::Debug for Prompt<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prompt").finish_non_exhaustive()
    }
}
