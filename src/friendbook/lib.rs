//! # Friendbook Architecture
//!
//! Friendbook is a **UI-agnostic social network library**: users, friendships, posts,
//! comments and direct messages, kept in memory and persisted to flat text files. The
//! CLI that ships with it is one client among possible others.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the session (at most one logged-in user)            │
//! │  - Dispatches to commands, decides when to persist          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic over the in-memory Network           │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Entity & Storage Layers (model/, network.rs, store/)       │
//! │  - User, Post, Comment, Message and their invariants        │
//! │  - DataStore trait: FileStore (production), InMemoryStore   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//!
//! Usernames are the primary key of a user and every relation refers to users by
//! name. Posts and comments get integer ids from two separate counters that only grow,
//! so an id is never reused, not even after a delete.
//!
//! ## Visibility
//!
//! Whether someone may see a post is decided by `Post::can_user_view`, and every query
//! that hands posts to a user goes through it. Only `Friendbook::posts` returns the raw
//! collection.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests of the business logic on a bare
//!    `Network`. This is where most tests live.
//! 2. **API** (`api.rs`): session handling and what gets persisted when, against an
//!    `InMemoryStore`.
//! 3. **Store** (`store/`): line formats and file handling, with `tempfile`.
//! 4. **Integration** (`tests/`): restarts over a real data directory and the binary.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic per concern
//! - [`network`]: The in-memory entity arenas
//! - [`model`]: Core data types (`User`, `Post`, `Comment`, `Message`)
//! - [`store`]: Storage abstraction and implementations
//! - [`codec`]: Escaped `|`-delimited record lines
//! - [`config`]: Configuration management
//! - [`init`]: Data directory resolution
//! - [`error`]: Error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod init;
pub mod model;
pub mod network;
pub mod notifications;
pub mod store;
