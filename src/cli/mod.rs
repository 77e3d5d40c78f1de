//! # CLI Module
//!
//! Command-line front end for the `segrouter` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Serve the demo route table over HTTP:
//!
//! ```bash
//! segrouter serve --config config.yaml --bind 0.0.0.0:8080 --workers 8
//! ```
//!
//! Settings come from the YAML file (optional), then `SEGR_*` environment
//! variables, then the flags. `SIGINT`/`SIGTERM` stop the server cleanly.
//!
//! ### `check`
//!
//! Test paths against a pattern template without starting anything:
//!
//! ```bash
//! segrouter check --pattern '/users/{int}' /users/42 /users/42/posts /users/bob
//! ```
//!
//! Prints one line per path with the prefix-match and exact-match results.

mod commands;
pub mod demo;


pub use commands::{check_paths, run_cli, CheckResult, Cli, Commands};
