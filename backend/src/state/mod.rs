// State management module
// Holds the shared adapters, caches and configuration

pub mod app_state;

pub use app_state::{AppState, SharedState};
