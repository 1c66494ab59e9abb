//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! Widgets here read from `AppState` and the core types; they never mutate
//! state and never touch the network.

pub mod form;
pub mod layout;
pub mod popup;
pub mod spinner;
pub mod theme;
