//! Zapflow gateway — the HTTP surface of the conversation orchestration
//! engine.
//!
//! Wires the engine services (presence locks, profile configurator, handoff
//! engine, session registry, humanized delivery) into shared [`state::AppState`],
//! exposes them over an axum API to the dashboard and ticket system, and
//! runs the background sweepers.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod state;
