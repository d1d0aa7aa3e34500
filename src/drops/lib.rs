//! # Drops Architecture
//!
//! Drops is a **UI-agnostic client library** for a drop service: it uploads
//! files, shortens links and creates notes, each producing a shareable
//! shortlink. The `drops` binary is one client of it.
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
//! │  - Thin facade over commands                                │
//! │  - Fills configured defaults (privacy, board)               │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, reconcile.rs, classify.rs)   │
//! │  - Local validation, create + reconcile, error classifying  │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Layer (service/)                                   │
//! │  - Abstract DropService trait                               │
//! │  - HttpDropService (production), InMemoryService (testing)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Privacy Reconciliation
//!
//! The remote service always creates drops public. Privacy, password and a
//! title the create call dropped are applied afterwards by
//! [`reconcile::reconcile`] in a single update. If that update fails for a
//! drop that was meant to be private, the drop is deleted so nothing stays
//! exposed. See `reconcile.rs` for the full state machine.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** calls `std::process::exit`
//!
//! ## Testing Strategy
//!
//! - **Commands and reconciliation** run against `InMemoryService`, which
//!   records calls and injects failures.
//! - **Classification** is a pure function tested on raw error shapes.
//! - **The binary** is exercised end to end in `tests/` with an isolated
//!   `DROPS_HOME`, limited to paths that fail before any network call.

pub mod api;
pub mod classify;
pub mod commands;
pub mod config;
pub mod content;
pub mod credentials;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod service;
