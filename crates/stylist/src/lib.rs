//! # Stylist
//!
//! Rule-based eyewear shopping assistant backed by SQLite.
//!
//! The pipeline itself (extraction, preference merging, recommendation,
//! response composition) lives in [`stylist_core`]. This crate provides the
//! SQLite storage backend, conversation persistence, and the `stylist` CLI.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool |
//! | [`migrate`] | Idempotent schema creation |
//! | [`sqlite_store`] | `Catalog` and `PreferenceStore` over SQLite |
//! | [`conversation`] | Conversations and their turns |
//! | [`seed`] | Demo catalog |
//! | [`catalog_cmd`] | `stylist catalog` subcommands |
//! | [`chat_cmd`] | `stylist chat`, `preferences`, `history` |
//! | [`logging`] | Tracing subscriber setup |

pub mod catalog_cmd;
pub mod chat_cmd;
pub mod config;
pub mod conversation;
pub mod db;
pub mod logging;
pub mod migrate;
pub mod seed;
pub mod sqlite_store;
