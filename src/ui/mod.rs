// UI module
// Contains layout, the three tabs and shared components

pub mod chat;
pub mod components;
pub mod dashboard;
pub mod layout;
pub mod prediction;

pub use components::*;
pub use layout::render_app_layout;
