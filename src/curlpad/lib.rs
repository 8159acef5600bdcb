//! # Curlpad Architecture
//!
//! Curlpad turns a scratch buffer in your editor into curl invocations. The user writes
//! requests in vim or nvim, curlpad pulls them back out, checks them, shows them and runs
//! them. The binary is a thin driver; everything it sequences lives in this library.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses flags, prompts, prints colored output             │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session Layer (deps, workspace, template, editor)          │
//! │  - Finds curl/nvim/vim/jq, owns the private temp files      │
//! │  - Writes the template and editor config, runs the editor   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - extract → format → validate → execute                    │
//! │  - Operates on strings, returns Rust types                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No Shell
//!
//! Commands are tokenized in-process and handed to `curl` as an argument vector. Nothing
//! is ever passed to `sh -c`. The validator's metacharacter blocklist and flag allowlist
//! keep the accepted language small on top of that.
//!
//! ## State
//!
//! There is no global mutable state. Per-run settings travel in [`config::RunContext`],
//! and temp files are owned by [`workspace::TempWorkspace`], which removes them on drop.
//! The Ctrl+C handler shares the workspace's [`workspace::CleanupRegistry`].
//!
//! ## Module Overview
//!
//! - [`commands`]: extraction, validation, JSON payload formatting, execution
//! - [`config`]: user configuration and the per-run context
//! - [`deps`]: dependency lookup and `--install`
//! - [`editor`]: editor config generation and launching
//! - [`error`]: error types
//! - [`signals`]: interrupt handling
//! - [`template`]: the starter script and autocomplete dictionary
//! - [`workspace`]: the private temp-file set
//! - `cli`: flag parsing, printing and the run loop for the binary (not part of the lib API)

pub mod commands;
pub mod config;
pub mod deps;
pub mod editor;
pub mod error;
pub mod signals;
pub mod template;
pub mod workspace;
