//! `http` maps the agent to an `axum` handler
pub mod handler;
pub mod types;

pub use handler::{agent_handler, AgentState};
