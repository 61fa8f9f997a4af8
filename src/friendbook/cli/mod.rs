//! # CLI Layer
//!
//! One possible client of the friendbook library. This is the only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Parses arguments
//! - Formats output for people (colors, relative times) or for scripts (`--json`)
//!
//! Every invocation opens the data directory, logs in when the command acts on behalf
//! of a user, runs the command and logs out again. Logging out writes every table, so
//! each invocation leaves the files complete.
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: `run()` and the per-command handlers
//! - `print`: output formatting

pub mod commands;
pub mod print;
pub mod setup;
