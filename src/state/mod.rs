// State management module
// Handles per-tab data, request status and UI preferences

pub mod app_state;

pub use app_state::{AppState, Tab};
