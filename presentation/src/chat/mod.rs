//! Interactive chat module
//!
//! A reedline-based REPL that deliberates one question per line against a
//! session state that persists across questions.

mod repl;

pub use repl::{ChatRepl, is_exit_command};
