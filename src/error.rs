//! Error taxonomy for registration and dispatch.

use thiserror::Error;

/// Synchronous failures of [`crate::Registry::register`].
///
/// These are programmer-usage errors, meant to fail fast during setup, and
/// are never delivered through the dispatch channel. (A non-callable handler
/// or a non-string name, the other two registration mistakes, are ruled out
/// by the type system at compile time.)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    /// `register` was called with an empty command name.
    #[error("no command name specified")]
    EmptyName,
}

/// Failure of one dispatched line.
///
/// Every variant formats its own human-readable message through `Display`,
/// so callers can both pattern-match on the kind and print the failure
/// as-is. Dispatch failures never panic and never stop the loop; they are
/// handed to the caller's error callback and discarded.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The input line was empty or blank after tokenization.
    #[error("No command specified")]
    NoCommand,

    /// The first token matched no registered handler; carries the token.
    #[error("Unknown command {0}")]
    UnknownCommand(String),

    /// A matched handler rejected.
    #[error("Command {name} failed with reason: {reason}")]
    CommandFailed {
        /// The command name that was dispatched.
        name: String,
        /// The handler's rejection reason.
        reason: anyhow::Error,
        /// The full token sequence as typed.
        tokens: Vec<String>,
    },
}

impl DispatchError {
    /// Value payload of a failed command: the rejection reason followed by
    /// the original tokens. `None` for the variants that carry no payload
    /// beyond their message.
    pub fn value(&self) -> Option<Vec<String>> {
        match self {
            DispatchError::CommandFailed { reason, tokens, .. } => {
                let mut value = Vec::with_capacity(tokens.len() + 1);
                value.push(reason.to_string());
                value.extend(tokens.iter().cloned());
                Some(value)
            }
            _ => None,
        }
    }
}
