//! A tiny, embeddable interactive command loop.
//!
//! This crate provides a read-eval loop over a pluggable line source: each
//! iteration prompts for one line, tokenizes it into a command name and
//! arguments (double-quoted phrases may contain spaces), dispatches to the
//! asynchronous handler registered under that name, and hands the outcome to
//! caller-supplied callbacks before prompting again. The built-in `exit`
//! command ends the session.
//!
//! The engine never touches a terminal itself; line acquisition sits behind
//! the [`LineProvider`] trait, with a rustyline-backed adapter for
//! interactive use and a scripted one for tests.
//!
//! Example
//! ```
//! use lineloop::Repl;
//!
//! let mut repl = Repl::new();
//! repl.register("greet", |args| async move { Ok(format!("hi {}", args.join(" "))) })
//!     .unwrap();
//! let outcome = futures::executor::block_on(repl.eval("greet world")).unwrap();
//! assert_eq!(outcome.payload(), vec!["hi world", "greet", "world"]);
//! ```

mod engine;
mod error;
pub mod io_adapters;
mod lexer;
mod registry;

pub use engine::{DEFAULT_PROMPT, ErrorCallback, Outcome, Repl, SuccessCallback};
pub use error::{DispatchError, RegisterError};
pub use io_adapters::{EditorLines, LineProvider, QueuedLines};
pub use registry::{Handler, HandlerFuture, Registry};
