//! Leads Dashboard Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod cache;
pub mod chat;
pub mod config;
pub mod error;
pub mod model;
/// Application state management
///
/// Holds the leads source, the model cache and the chat relay.
pub mod state;
pub mod store;
