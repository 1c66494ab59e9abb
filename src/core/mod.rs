//! Core logic — the request, the response filter, and the form state.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod client;
pub mod controller;
pub mod filter;
