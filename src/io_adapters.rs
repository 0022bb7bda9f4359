//! Line providers: where the loop engine gets its raw input lines.

use std::collections::VecDeque;

use anyhow::{Result, bail};
use async_trait::async_trait;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Source of raw input lines for the loop engine.
///
/// One call corresponds to one prompted line. Returning an error signals
/// that no further input will arrive (end of input, interrupt, closed
/// stream); the engine stops its loop on the first error.
#[async_trait]
pub trait LineProvider: Send {
    /// Display `prompt` and return the next raw line, without a trailing
    /// newline.
    async fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Interactive provider backed by a rustyline editor.
///
/// Accepted lines are fed into rustyline's in-memory history so the arrow
/// keys work within a session; nothing is persisted across sessions.
pub struct EditorLines {
    editor: DefaultEditor,
}

impl EditorLines {
    /// Create an editor attached to the current terminal.
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

#[async_trait]
impl LineProvider for EditorLines {
    async fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(line)
            }
            Err(ReadlineError::Interrupted) => bail!("interrupted"),
            Err(ReadlineError::Eof) => bail!("end of input"),
            Err(err) => Err(err.into()),
        }
    }
}

/// Scripted provider for tests and non-interactive embedding: hands out its
/// pre-loaded lines in order, then reports end of input.
pub struct QueuedLines {
    lines: VecDeque<String>,
}

impl QueuedLines {
    /// Queue up the given lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of lines not yet handed out.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl LineProvider for QueuedLines {
    async fn read_line(&mut self, _prompt: &str) -> Result<String> {
        match self.lines.pop_front() {
            Some(line) => Ok(line),
            None => bail!("end of input"),
        }
    }
}
