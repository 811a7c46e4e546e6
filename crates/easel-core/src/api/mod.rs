//! Outbound HTTP to the agent backend: confirmation decisions, session
//! cancellation and snapshot fetches. All fire-and-forget relative to
//! the reducer; gate state only moves when the matching stream event
//! comes back.

mod client;
mod error;

pub use client::{AgentApi, ConfirmationRequest};
pub use error::ApiError;
