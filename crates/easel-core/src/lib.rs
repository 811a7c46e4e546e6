//! Client core for the Easel design agent.
//!
//! The centerpiece is the session layer: a pure reducer that folds one
//! ordered stream of agent events into an append-only transcript of
//! messages and tool-call states, plus the confirmation gate that holds
//! sensitive tool calls until a human approves them. Rendering, canvas
//! work and transport live elsewhere; this crate only owns the state.

pub mod api;
pub mod error;
pub mod session;

pub use error::{Error, Result};
