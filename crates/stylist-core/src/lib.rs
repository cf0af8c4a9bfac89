//! # Stylist Core
//!
//! Shared, runtime-agnostic logic for Stylist: data models, the lexicon,
//! preference extraction, preference merging, catalog filtering,
//! recommendation, and response composition.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. Storage is reached only through the
//! [`store::Catalog`] and [`store::PreferenceStore`] traits.
//!
//! ## Pipeline
//!
//! ```text
//! utterance ──▶ extract ──▶ PreferenceDelta ──┬──▶ preferences::upsert ──▶ PreferenceStore
//!                                             └──▶ recommend ──▶ Catalog
//!                                                      │
//!                                                      ▼
//!                                                   compose ──▶ reply text
//! ```
//!
//! [`chat::handle_utterance`] runs the whole pipeline in that fixed order.

pub mod chat;
pub mod compose;
pub mod error;
pub mod extract;
pub mod filter;
pub mod lexicon;
pub mod models;
pub mod preferences;
pub mod recommend;
pub mod store;
