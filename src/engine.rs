//! The loop engine: owns the registry and the session flag, dispatches one
//! line at a time, and repeats until the session is terminated.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::BoxFuture;
use log::{debug, warn};

use crate::error::{DispatchError, RegisterError};
use crate::io_adapters::LineProvider;
use crate::lexer;
use crate::registry::Registry;

/// Prompt used when the embedder has no opinion.
pub const DEFAULT_PROMPT: &str = "Enter command: ";

/// Successful result of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Value the handler resolved with.
    pub value: String,
    /// The full token sequence as typed, command name first.
    pub tokens: Vec<String>,
}

impl Outcome {
    /// Value plus provenance: `[value, ...tokens]`, letting a caller inspect
    /// both what happened and what was typed.
    pub fn payload(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.tokens.len() + 1);
        out.push(self.value.clone());
        out.extend(self.tokens.iter().cloned());
        out
    }
}

/// Callback invoked with the outcome of each successful dispatch.
pub type SuccessCallback =
    Box<dyn FnMut(Outcome) -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// Callback invoked with each dispatch failure.
pub type ErrorCallback =
    Box<dyn FnMut(DispatchError) -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// An interactive read-eval loop.
///
/// Each `Repl` owns its own registry and terminated flag, so independent
/// loop instances never share state. The built-in `exit` command is
/// pre-registered; it flips the terminated flag and may be overwritten like
/// any other command.
pub struct Repl {
    registry: Registry,
    terminated: Arc<AtomicBool>,
}

impl Repl {
    /// Create an engine with a fresh session and only `exit` registered.
    pub fn new() -> Self {
        let terminated = Arc::new(AtomicBool::new(false));
        let mut registry = Registry::new();
        let flag = Arc::clone(&terminated);
        registry.insert("exit", move |_args| {
            let flag = Arc::clone(&flag);
            async move {
                flag.store(true, Ordering::SeqCst);
                Ok("true".to_string())
            }
        });
        Self {
            registry,
            terminated,
        }
    }

    /// Register a command handler. See [`Registry::register`].
    pub fn register<F, Fut>(&mut self, name: &str, handler: F) -> Result<(), RegisterError>
    where
        F: Fn(Vec<String>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        self.registry.register(name, handler)
    }

    /// Whether the session has been terminated by the `exit` built-in.
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Tokenize one input line and dispatch it to the matching handler.
    ///
    /// On success the handler's resolved value is returned together with the
    /// original tokens; on failure one of the three [`DispatchError`] kinds
    /// is returned. Never panics on user input.
    pub async fn eval(&self, line: &str) -> Result<Outcome, DispatchError> {
        let tokens = lexer::split_into_words(line);
        if lexer::is_blank(&tokens) {
            return Err(DispatchError::NoCommand);
        }
        debug!("dispatching {tokens:?}");
        let Some(handler) = self.registry.get(&tokens[0]) else {
            return Err(DispatchError::UnknownCommand(tokens[0].clone()));
        };
        let args = tokens[1..].to_vec();
        match handler(args).await {
            Ok(value) => Ok(Outcome { value, tokens }),
            Err(reason) => Err(DispatchError::CommandFailed {
                name: tokens[0].clone(),
                reason,
                tokens,
            }),
        }
    }

    /// Drive the read-eval loop until the session is terminated.
    ///
    /// Each iteration awaits one line from `provider`, dispatches it, and
    /// routes the result to the matching callback (`None` means no-op). A
    /// callback error is logged and swallowed; it neither crashes the
    /// engine nor stops the loop. The loop also stops when the provider
    /// itself fails, since no further input can arrive.
    ///
    /// Exactly one command is in flight at a time: the next prompt is not
    /// issued until the current line's handler and callback have settled.
    /// There is no timeout, so a hung handler stalls the loop.
    pub async fn run(
        &self,
        provider: &mut dyn LineProvider,
        prompt: &str,
        mut on_success: Option<SuccessCallback>,
        mut on_error: Option<ErrorCallback>,
    ) {
        while !self.is_terminated() {
            let line = match provider.read_line(prompt).await {
                Ok(line) => line,
                Err(err) => {
                    debug!("line provider closed: {err}");
                    break;
                }
            };
            match self.eval(&line).await {
                Ok(outcome) => {
                    if let Some(callback) = on_success.as_mut() {
                        if let Err(err) = callback(outcome).await {
                            warn!("success callback failed: {err}");
                        }
                    }
                }
                Err(failure) => {
                    if let Some(callback) = on_error.as_mut() {
                        if let Err(err) = callback(failure).await {
                            warn!("error callback failed: {err}");
                        }
                    }
                }
            }
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::QueuedLines;
    use anyhow::bail;
    use futures::FutureExt;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_blank_line_yields_no_command() {
        let repl = Repl::new();
        assert!(matches!(repl.eval("   ").await, Err(DispatchError::NoCommand)));
        assert!(matches!(repl.eval("").await, Err(DispatchError::NoCommand)));
    }

    #[tokio::test]
    async fn test_unknown_command_carries_the_offending_token() {
        let repl = Repl::new();
        match repl.eval("foo bar").await {
            Err(DispatchError::UnknownCommand(name)) => assert_eq!(name, "foo"),
            other => panic!("expected UnknownCommand, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_payload_is_value_then_tokens() {
        let mut repl = Repl::new();
        repl.register("greet", |_args| async { Ok("hi".to_string()) })
            .unwrap();
        let outcome = repl.eval("greet world").await.unwrap();
        assert_eq!(outcome.payload(), vec!["hi", "greet", "world"]);
    }

    #[tokio::test]
    async fn test_quoted_arguments_reach_the_handler_merged() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut repl = Repl::new();
        let sink = Arc::clone(&seen);
        repl.register("say", move |args| {
            let sink = Arc::clone(&sink);
            async move {
                *sink.lock().unwrap() = args;
                Ok(String::new())
            }
        })
        .unwrap();
        repl.eval(r#"say "a b" c"#).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["a b", "c"]);
    }

    #[tokio::test]
    async fn test_failed_handler_yields_command_failed_with_value() {
        let mut repl = Repl::new();
        repl.register("fail", |_args| async { bail!("boom") }).unwrap();
        match repl.eval("fail now").await {
            Err(err @ DispatchError::CommandFailed { .. }) => {
                assert_eq!(err.value(), Some(vec!["boom".into(), "fail".into(), "now".into()]));
                assert_eq!(err.to_string(), "Command fail failed with reason: boom");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exit_terminates_before_the_next_prompt() {
        let dispatched = Arc::new(AtomicUsize::new(0));
        let mut repl = Repl::new();
        let count = Arc::clone(&dispatched);
        repl.register("ping", move |_args| {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok("pong".to_string())
            }
        })
        .unwrap();

        // The line after `exit` must never be dispatched.
        let mut lines = QueuedLines::new(["exit", "ping"]);
        repl.run(&mut lines, DEFAULT_PROMPT, None, None).await;

        assert!(repl.is_terminated());
        assert_eq!(dispatched.load(Ordering::SeqCst), 0);
        assert_eq!(lines.remaining(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_failures_do_not_stop_the_loop() {
        let failures = Arc::new(AtomicUsize::new(0));
        let repl = Repl::new();
        let count = Arc::clone(&failures);
        let on_error: ErrorCallback = Box::new(move |_failure| {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            .boxed()
        });

        let mut lines = QueuedLines::new(["nope", "   ", "exit"]);
        repl.run(&mut lines, DEFAULT_PROMPT, None, Some(on_error)).await;

        assert!(repl.is_terminated());
        assert_eq!(failures.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_callback_errors_are_swallowed() {
        let mut repl = Repl::new();
        repl.register("ping", |_args| async { Ok("pong".to_string()) })
            .unwrap();
        let on_success: SuccessCallback =
            Box::new(|_outcome| async { bail!("callback down") }.boxed());

        // Both lines dispatch successfully even though the callback rejects
        // every time; the loop must still reach `exit`.
        let mut lines = QueuedLines::new(["ping", "exit"]);
        repl.run(&mut lines, DEFAULT_PROMPT, Some(on_success), None).await;

        assert!(repl.is_terminated());
        assert_eq!(lines.remaining(), 0);
    }

    #[tokio::test]
    async fn test_provider_end_of_input_stops_without_terminating() {
        let repl = Repl::new();
        let mut lines = QueuedLines::new(Vec::<String>::new());
        repl.run(&mut lines, DEFAULT_PROMPT, None, None).await;
        assert!(!repl.is_terminated());
    }

    #[tokio::test]
    async fn test_exit_can_be_overwritten_like_any_command() {
        let mut repl = Repl::new();
        repl.register("exit", |_args| async { Ok("not leaving".to_string()) })
            .unwrap();
        let outcome = repl.eval("exit").await.unwrap();
        assert_eq!(outcome.value, "not leaving");
        assert!(!repl.is_terminated());
    }

    #[tokio::test]
    async fn test_independent_instances_do_not_share_sessions() {
        let first = Repl::new();
        let second = Repl::new();
        first.eval("exit").await.unwrap();
        assert!(first.is_terminated());
        assert!(!second.is_terminated());
    }
}
