//! The Sovereign Core: a text-command strategy game engine.
//!
//! Players issue free-text (Arabic) orders; the engine classifies each one
//! into a fixed category, derives a resource delta and advisory warnings,
//! and persists the result against a SQLite-backed game session.

pub mod analysis;
pub mod classifier;
pub mod clock;
pub mod command;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod event;
pub mod game;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
