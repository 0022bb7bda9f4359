//! The command registry: a mapping from command name to handler.

use std::collections::HashMap;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::RegisterError;

/// Future returned by a command handler: resolves to the handler's value or
/// rejects with a reason.
pub type HandlerFuture = BoxFuture<'static, anyhow::Result<String>>;

/// A registered command handler. Invoked with the positional arguments that
/// followed the command name on the input line, in order.
pub type Handler = Box<dyn Fn(Vec<String>) -> HandlerFuture + Send>;

/// Mapping from command name to [`Handler`].
///
/// Names are exact and case-sensitive. Entries are added only through
/// [`Registry::register`] and are never pruned.
#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, Handler>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register `handler` under `name`.
    ///
    /// Fails synchronously with [`RegisterError::EmptyName`] when `name` is
    /// empty. Otherwise the handler is stored, silently replacing any
    /// existing handler under that name — built-ins included, last
    /// registration wins.
    pub fn register<F, Fut>(&mut self, name: &str, handler: F) -> Result<(), RegisterError>
    where
        F: Fn(Vec<String>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        if name.is_empty() {
            return Err(RegisterError::EmptyName);
        }
        self.insert(name, handler);
        Ok(())
    }

    /// Store a handler without name validation. Used to seed built-ins whose
    /// names are compile-time literals.
    pub(crate) fn insert<F, Fut>(&mut self, name: &str, handler: F)
    where
        F: Fn(Vec<String>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        self.commands
            .insert(name.to_string(), Box::new(move |args| handler(args).boxed()));
    }

    /// Look up the handler for `name`.
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.commands.get(name)
    }

    /// Whether a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}
