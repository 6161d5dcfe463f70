//! Platform abstraction layer
//!
//! Browser bindings for the simulation. The JS front-end owns rendering and
//! audio; it forwards pointer/keyboard events here and reads back events and
//! state snapshots as JSON.

#[cfg(target_arch = "wasm32")]
pub mod web;
