//! Sepia driver: runs the pipeline end to end.
//!
//! ```text
//! source ──► sepia_lexer ──► sepia_parse ──► sepia_types ──► sepia_eval
//!                                  │
//!                                  └──► sepia_fmt
//! ```
//!
//! [`Session`] runs whole programs, [`Repl`] runs submissions against
//! persistent state, and [`commands`] implements the `sepia` binary's
//! subcommands on top of both.

pub mod commands;
mod repl;
mod session;

pub use repl::{Repl, Submission};
pub use session::{exit_code, Checked, Session, SessionError};
